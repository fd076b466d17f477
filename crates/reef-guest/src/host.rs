use std::sync::{Arc, Mutex};

use crate::abi::{LogBuffer, Progress};

/// Capabilities the embedding environment supplies to the guest.
pub trait Host {
    /// Hand `buf` to the host log sink. The length travels with the buffer;
    /// the host never rescans it.
    fn log(&self, buf: LogBuffer<'_>);

    /// Report how much of the current job is done
    fn progress(&self, done: Progress);
}

impl<H: Host + ?Sized> Host for &H {
    fn log(&self, buf: LogBuffer<'_>) {
        (**self).log(buf)
    }

    fn progress(&self, done: Progress) {
        (**self).progress(done)
    }
}

impl<H: Host + ?Sized> Host for Arc<H> {
    fn log(&self, buf: LogBuffer<'_>) {
        (**self).log(buf)
    }

    fn progress(&self, done: Progress) {
        (**self).progress(done)
    }
}

/// The real reef imports, resolved by the runtime at instantiation
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ReefHost;

#[cfg(target_arch = "wasm32")]
impl Host for ReefHost {
    fn log(&self, buf: LogBuffer<'_>) {
        // SAFETY: the pointer and length come from a live slice that outlives
        // the call, and the host does not retain them.
        unsafe { crate::abi::imports::log(buf.as_ptr(), buf.len()) }
    }

    fn progress(&self, done: Progress) {
        // SAFETY: plain value import.
        unsafe { crate::abi::imports::progress(done.value()) }
    }
}

/// A single call observed by [`RecordingHost`]
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Log { bytes: Vec<u8>, len: i32 },
    Progress(f32),
}

impl HostCall {
    /// Logged text, if this is a log call with valid UTF-8
    pub fn as_log_str(&self) -> Option<&str> {
        match self {
            HostCall::Log { bytes, .. } => std::str::from_utf8(bytes).ok(),
            HostCall::Progress(_) => None,
        }
    }
}

/// In-process host that records every call, for running the guest natively.
///
/// Clones share the same call log.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    calls: Arc<Mutex<Vec<HostCall>>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all calls so far, oldest first
    pub fn calls(&self) -> Vec<HostCall> {
        self.lock().clone()
    }

    /// Logged lines, lossily decoded
    pub fn log_lines(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                HostCall::Log { bytes, .. } => Some(String::from_utf8_lossy(bytes).into_owned()),
                HostCall::Progress(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn record(&self, call: HostCall) {
        self.lock().push(call);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<HostCall>> {
        // A panic while recording leaves the log usable
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Host for RecordingHost {
    fn log(&self, buf: LogBuffer<'_>) {
        self.record(HostCall::Log {
            bytes: buf.as_bytes().to_vec(),
            len: buf.len(),
        });
    }

    fn progress(&self, done: Progress) {
        self.record(HostCall::Progress(done.value()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_host_keeps_order() {
        let host = RecordingHost::new();
        host.log(LogBuffer::new(b"one").unwrap());
        host.progress(Progress::new(0.5).unwrap());
        host.log(LogBuffer::new(b"two").unwrap());

        assert_eq!(
            host.calls(),
            vec![
                HostCall::Log { bytes: b"one".to_vec(), len: 3 },
                HostCall::Progress(0.5),
                HostCall::Log { bytes: b"two".to_vec(), len: 3 },
            ]
        );
        assert_eq!(host.log_lines(), vec!["one", "two"]);
    }

    #[test]
    fn test_clones_share_calls() {
        let host = RecordingHost::new();
        let shared = host.clone();
        shared.log(LogBuffer::new(b"shared").unwrap());

        assert_eq!(host.calls()[0].as_log_str(), Some("shared"));

        host.clear();
        assert!(shared.calls().is_empty());
    }

    #[test]
    fn test_forwarding_impls() {
        let host = Arc::new(RecordingHost::new());
        let by_ref: &dyn Host = &*host;
        by_ref.log(LogBuffer::new(b"ref").unwrap());
        host.clone().log(LogBuffer::new(b"arc").unwrap());

        assert_eq!(host.log_lines(), vec!["ref", "arc"]);
    }
}

use tracing::*;

use crate::abi::{LogBuffer, Progress};
use crate::config::GuestConfig;
use crate::error::ReefResult;
use crate::host::Host;
use crate::strlen::strlen;

/// The guest program, bound to whatever host satisfies its imports
#[derive(Debug, Clone)]
pub struct Guest<H> {
    host: H,
    config: GuestConfig,
}

impl<H: Host> Guest<H> {
    /// Guest with the default message and status
    pub fn new(host: H) -> Self {
        Self {
            host,
            config: GuestConfig::default(),
        }
    }

    /// Guest with a validated configuration
    pub fn with_config(host: H, config: GuestConfig) -> ReefResult<Self> {
        config.validate()?;
        Ok(Self { host, config })
    }

    pub fn config(&self) -> &GuestConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Entry point body: measure the message, log it once, return the status.
    ///
    /// Holds no state between calls, so repeated runs are identical.
    pub fn run(&self) -> i32 {
        let bytes = self.config.message.as_bytes();
        let len = strlen(Some(bytes));
        trace!(len, "logging entry message");

        // The error arm is unreachable: `new` uses the default message and
        // `with_config` rejects messages that do not fit the import's length.
        match LogBuffer::new(&bytes[..len]) {
            Ok(buf) => self.host.log(buf),
            Err(err) => error!(error = %err, "entry message not logged"),
        }

        debug!(status = self.config.status, "entry point finished");
        self.config.status
    }

    /// Report progress of a long-running job to the host
    pub fn report_progress(&self, done: f32) -> ReefResult<()> {
        let progress = Progress::new(done)?;
        self.host.progress(progress);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReefError;
    use crate::host::{HostCall, RecordingHost};

    #[test]
    fn test_run_logs_hello_world_once() {
        let host = RecordingHost::new();
        let status = Guest::new(&host).run();

        assert_eq!(status, 42);
        assert_eq!(
            host.calls(),
            vec![HostCall::Log { bytes: b"Hello World!".to_vec(), len: 12 }]
        );
    }

    #[test]
    fn test_run_is_repeatable() {
        let host = RecordingHost::new();
        let guest = Guest::new(&host);

        let first = guest.run();
        let second = guest.run();

        assert_eq!(first, second);
        let calls = host.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }

    #[test]
    fn test_configured_message_stops_at_terminator() {
        let host = RecordingHost::new();
        let config = GuestConfig {
            message: "abc\0def".to_string(),
            status: 3,
            ..GuestConfig::default()
        };
        let guest = Guest::with_config(&host, config).unwrap();

        assert_eq!(guest.run(), 3);
        assert_eq!(host.calls(), vec![HostCall::Log { bytes: b"abc".to_vec(), len: 3 }]);
    }

    #[test]
    fn test_with_config_validates() {
        let config = GuestConfig {
            log_level: "chatty".to_string(),
            ..GuestConfig::default()
        };
        assert!(matches!(
            Guest::with_config(RecordingHost::new(), config),
            Err(ReefError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_entry_message_never_dropped() {
        use crate::logging;
        use tracing::level_filters::LevelFilter;

        let host = RecordingHost::new();
        let diagnostics = RecordingHost::new();
        let status = tracing::subscriber::with_default(
            logging::subscriber(diagnostics.clone(), LevelFilter::TRACE),
            || Guest::new(&host).run(),
        );

        assert_eq!(status, 42);
        assert_eq!(host.log_lines(), vec!["Hello World!"]);
        let lines = diagnostics.log_lines();
        assert!(lines.iter().all(|line| !line.starts_with("ERROR")), "got {lines:?}");
        assert!(lines.iter().any(|line| line.contains("len=12")), "got {lines:?}");
    }

    #[test]
    fn test_report_progress() {
        let host = RecordingHost::new();
        let guest = Guest::new(&host);

        guest.report_progress(0.5).unwrap();
        assert!(guest.report_progress(2.0).is_err());

        assert_eq!(host.calls(), vec![HostCall::Progress(0.5)]);
    }
}

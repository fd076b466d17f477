/*!
# Reef ABI

Names and value types that cross the guest/host boundary. The host resolves
each import by its `(module, name)` pair when the module is instantiated; a
missing import fails instantiation before any guest code runs.
*/

use crate::error::{ReefError, ReefResult};

/// Import module every reef capability lives under
pub const IMPORT_MODULE: &str = "reef";

/// `reef.log(pointer: i32, length: i32)`
pub const LOG_IMPORT: &str = "log";

/// `reef.progress(percent: f32)`
pub const PROGRESS_IMPORT: &str = "progress";

/// Export the host calls once after instantiation
pub const ENTRY_POINT: &str = "reef_main";

/// Borrowed bytes handed to the log import together with their length.
///
/// The view is only valid for the duration of the host call; the host must
/// copy what it wants to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogBuffer<'a> {
    bytes: &'a [u8],
}

impl<'a> LogBuffer<'a> {
    /// Wrap `bytes`, rejecting anything whose length cannot be expressed as
    /// the import's `i32` count.
    pub fn new(bytes: &'a [u8]) -> ReefResult<Self> {
        if bytes.len() > i32::MAX as usize {
            return Err(ReefError::MessageTooLong { len: bytes.len() });
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }

    /// Byte count as passed to the host
    pub fn len(&self) -> i32 {
        // Checked in `new`
        self.bytes.len() as i32
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Fraction of work completed, reported through `reef.progress`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Progress(f32);

impl Progress {
    pub fn new(done: f32) -> ReefResult<Self> {
        if !(0.0..=1.0).contains(&done) {
            return Err(ReefError::ProgressOutOfRange(done));
        }
        Ok(Self(done))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) mod imports {
    #[link(wasm_import_module = "reef")]
    extern "C" {
        pub fn log(pointer: *const u8, length: i32);
        pub fn progress(percent: f32);
    }
}

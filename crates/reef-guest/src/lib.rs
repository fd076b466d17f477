/*!
# Reef Guest

A minimal guest module for the reef sandbox. It imports the host log sink as
`reef.log`, measures a fixed message, logs it once, and returns a status code
from its `reef_main` export.

Everything that touches the real imports is compiled for `wasm32` only; the
same program runs natively against a [`RecordingHost`] in tests.
*/

use std::sync::Once;

use tracing::{debug, warn};

pub mod abi;
pub mod config;
pub mod error;
pub mod guest;
pub mod host;
pub mod logging;
pub mod panic_hook;
pub mod strlen;

pub use abi::{LogBuffer, Progress};
pub use config::GuestConfig;
pub use error::{ReefError, ReefResult};
pub use guest::Guest;
pub use host::{Host, HostCall, RecordingHost};
pub use strlen::strlen;

#[cfg(target_arch = "wasm32")]
pub use host::ReefHost;

/// Panic hook and log bridge, installed once per module instance
fn init_once<H>(host: &H, config: &GuestConfig)
where
    H: Host + Clone + Send + Sync + 'static,
{
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        panic_hook::install_hook(host.clone());
        match config
            .level_filter()
            .and_then(|level| logging::init(host.clone(), level))
        {
            Ok(()) => {}
            // A subscriber set by the embedder wins
            Err(ReefError::Logging(err)) => debug!(error = %err, "keeping existing subscriber"),
            Err(err) => warn!(error = %err, "log bridge not installed"),
        }
    });
}

/// Run the guest against `host` with the default configuration.
///
/// The first call installs the panic hook and the log bridge; later calls
/// only run the entry algorithm.
pub fn start<H>(host: H) -> i32
where
    H: Host + Clone + Send + Sync + 'static,
{
    let config = GuestConfig::default();
    init_once(&host, &config);
    Guest::new(host).run()
}

/// Entry point invoked by the reef runtime after instantiation
#[cfg(target_arch = "wasm32")]
#[no_mangle]
pub extern "C" fn reef_main() -> i32 {
    start(ReefHost)
}

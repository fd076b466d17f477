use crate::abi::LogBuffer;
use crate::host::Host;

/// Route panics to the host log sink as `PANIC: <info>`.
///
/// Without this a guest panic only shows up as an unexplained trap.
pub fn install_hook<H>(host: H)
where
    H: Host + Send + Sync + 'static,
{
    std::panic::set_hook(Box::new(move |info| {
        let line = format!("PANIC: {}", info);
        if let Ok(buf) = LogBuffer::new(line.as_bytes()) {
            host.log(buf);
        }
    }));
}

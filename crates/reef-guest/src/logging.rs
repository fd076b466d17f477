/*!
Bridge from `tracing` to the host log sink.

Guest code logs with the usual `tracing` macros; [`HostLogLayer`] renders each
event on one line and hands it to [`Host::log`].
*/

use std::fmt::{self, Write};

use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry;

use crate::abi::LogBuffer;
use crate::error::ReefResult;
use crate::host::Host;

/// Layer that writes every event it sees to the host log sink
#[derive(Debug, Clone)]
pub struct HostLogLayer<H> {
    host: H,
}

impl<H> HostLogLayer<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }
}

impl<S, H> Layer<S> for HostLogLayer<H>
where
    S: Subscriber,
    H: Host + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let line = format_event(event);
        if let Ok(buf) = LogBuffer::new(line.as_bytes()) {
            self.host.log(buf);
        }
    }
}

/// Render `event` as `LEVEL target: message key=value ...`
fn format_event(event: &Event<'_>) -> String {
    let meta = event.metadata();
    let mut visitor = LineVisitor::default();
    event.record(&mut visitor);

    let mut line = format!("{} {}: {}", meta.level(), meta.target(), visitor.message);
    line.push_str(&visitor.fields);
    line
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// Subscriber that forwards events at or above `level` to `host`
pub fn subscriber<H>(host: H, level: LevelFilter) -> impl Subscriber + Send + Sync
where
    H: Host + Send + Sync + 'static,
{
    registry().with(level).with(HostLogLayer::new(host))
}

/// Install the host bridge as the global default subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init<H>(host: H, level: LevelFilter) -> ReefResult<()>
where
    H: Host + Send + Sync + 'static,
{
    tracing::subscriber::set_global_default(subscriber(host, level))?;
    Ok(())
}

//! Plugin log protocol.
//!
//! The host reads plugin stderr line by line. A line of the form
//! `\x01{level}\x02{message}` is shown in the host log at that level; anything
//! else is logged as plain error output. This module renders `tracing`
//! events in that shape.

use std::fmt;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const START_OF_HEADING: char = '\u{1}';
const START_OF_TEXT: char = '\u{2}';

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "markertag_engine=debug,markertag_domain=debug";

fn level_marker(level: Level) -> char {
    match level {
        Level::TRACE => 't',
        Level::DEBUG => 'd',
        Level::INFO => 'i',
        Level::WARN => 'w',
        _ => 'e',
    }
}

/// Formats each event as one host log line per message line.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostLogFormat;

impl<S, N> FormatEvent<S, N> for HostLogFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut message = String::new();
        ctx.field_format()
            .format_fields(format::Writer::new(&mut message), event)?;

        let marker = level_marker(*event.metadata().level());
        for line in message.lines() {
            writeln!(writer, "{START_OF_HEADING}{marker}{START_OF_TEXT}{line}")?;
        }
        Ok(())
    }
}

/// Install the global subscriber: host log lines on stderr, filtered by
/// `RUST_LOG`.
pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(HostLogFormat)
                .with_writer(std::io::stderr),
        )
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(emit: impl FnOnce()) -> String {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .event_format(HostLogFormat)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, emit);

        let bytes = buf.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn debug_event_gets_debug_marker() {
        let out = capture(|| tracing::debug!("No new tag added"));
        assert_eq!(out, "\u{1}d\u{2}No new tag added\n");
    }

    #[test]
    fn every_level_maps_to_its_marker() {
        let out = capture(|| {
            tracing::trace!("t");
            tracing::info!("i");
            tracing::warn!("w");
            tracing::error!("e");
        });
        assert_eq!(out, "\u{1}t\u{2}t\n\u{1}i\u{2}i\n\u{1}w\u{2}w\n\u{1}e\u{2}e\n");
    }

    #[test]
    fn multi_line_messages_are_prefixed_per_line() {
        let out = capture(|| tracing::warn!("first\nsecond"));
        assert_eq!(out, "\u{1}w\u{2}first\n\u{1}w\u{2}second\n");
    }

    #[test]
    fn structured_fields_stay_on_the_line() {
        let out = capture(|| tracing::info!(scene_id = "123", "Added new tags"));
        assert!(out.starts_with("\u{1}i\u{2}Added new tags"));
        assert!(out.contains("scene_id=\"123\""));
    }
}

//! Log mirroring.
//!
//! [`LogMirrorLayer`] is a `tracing_subscriber` layer that copies every event
//! at or above a configured level into a [`LogEvent`] and pushes it onto an
//! unbounded channel. The bridge drains that channel into
//! [`EventDispatcher::on_logged`](crate::dispatcher::EventDispatcher::on_logged).
//!
//! Events under [`MIRROR_TARGET`] are never copied.

use crate::dispatcher::MIRROR_TARGET;
use crate::types::LogEvent;
use chrono::Local;
use std::fmt;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Creates the layer together with the receiver the bridge drains.
pub fn log_mirror(max_level: Level) -> (LogMirrorLayer, mpsc::UnboundedReceiver<LogEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (LogMirrorLayer { sender, max_level }, receiver)
}

/// Copies tracing events into [`LogEvent`]s.
#[derive(Debug, Clone)]
pub struct LogMirrorLayer {
    sender: mpsc::UnboundedSender<LogEvent>,
    max_level: Level,
}

impl<S: Subscriber> Layer<S> for LogMirrorLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // more verbose levels compare greater
        if *metadata.level() > self.max_level || metadata.target().starts_with(MIRROR_TARGET) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        // a closed receiver just means mirroring has shut down
        let _ = self.sender.send(LogEvent {
            prefix: metadata.level().to_string(),
            message: visitor.finish(),
            time: Local::now(),
        });
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else {
            format!("{} ({})", self.message, self.fields.join(", "))
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::prelude::*;

    #[test]
    fn test_events_are_mirrored() {
        let (layer, mut receiver) = log_mirror(Level::INFO);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("RCON client connected");
            tracing::error!(id = 4, "Command timed out");
        });

        let first = receiver.try_recv().expect("info event mirrored");
        assert_eq!(first.prefix, "INFO");
        assert_eq!(first.message, "RCON client connected");

        let second = receiver.try_recv().expect("error event mirrored");
        assert_eq!(second.prefix, "ERROR");
        assert_eq!(second.message, "Command timed out (id=4)");

        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_level_filter() {
        let (layer, mut receiver) = log_mirror(Level::WARN);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("noise");
            tracing::info!("still noise");
            tracing::warn!("kept");
        });

        assert_eq!(receiver.try_recv().unwrap().message, "kept");
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_mirror_target_is_skipped() {
        let (layer, mut receiver) = log_mirror(Level::TRACE);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: MIRROR_TARGET, "System log destination not found");
        });

        assert!(receiver.try_recv().is_err());
    }
}

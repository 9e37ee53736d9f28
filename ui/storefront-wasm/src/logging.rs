//! `tracing` → browser console.
//!
//! A registry with an `EnvFilter` built from the configured level and a layer
//! that formats each event on one line and hands it to `gloo-console`.

use std::fmt::{self, Write as _};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

const FALLBACK_DIRECTIVE: &str = "info";

/// Install the console subscriber. A second call (hot reload) is ignored.
pub fn init(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|err| {
        gloo_console::warn!(format!("invalid log level {level:?}: {err}"));
        EnvFilter::new(FALLBACK_DIRECTIVE)
    });
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(ConsoleLayer)
        .try_init();
}

pub struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut line = LineVisitor::default();
        event.record(&mut line);
        let text = format!("{} {}: {}", meta.level(), meta.target(), line.finish());

        match *meta.level() {
            Level::ERROR => gloo_console::error!(text),
            Level::WARN => gloo_console::warn!(text),
            Level::INFO => gloo_console::info!(text),
            _ => gloo_console::debug!(text),
        }
    }
}

/// Message first, then `key=value` pairs in recording order.
#[derive(Default)]
pub struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    pub fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            format!("{}{}", self.message, self.fields)
        }
    }
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
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

//! JSON Event Sink
//!
//! Outputs fill events as NDJSON for scripting and automation.

use crate::domain::ports::{FillEvent, FillEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events
pub struct JsonEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl FillEventSink for JsonEventSink {
    fn on_event(&self, event: FillEvent) {
        let json = match event {
            FillEvent::Started { form, field_count } => {
                serde_json::json!({
                    "event": "start",
                    "command": "fill",
                    "form": form,
                    "field_count": field_count,
                })
            }

            FillEvent::FieldChanged {
                field,
                value,
                recomputed,
                error,
            } => {
                serde_json::json!({
                    "event": "field_changed",
                    "command": "fill",
                    "field": field,
                    "value": value,
                    "recomputed": recomputed,
                    "error": error,
                })
            }

            FillEvent::ExpressionFailed {
                field,
                expression,
                message,
            } => {
                serde_json::json!({
                    "event": "expression_failed",
                    "command": "fill",
                    "field": field,
                    "expression": expression,
                    "message": message,
                })
            }

            FillEvent::Submitted {
                accepted,
                error_count,
            } => {
                let status = if accepted { "success" } else { "rejected" };
                serde_json::json!({
                    "event": "complete",
                    "command": "fill",
                    "status": status,
                    "errors": error_count,
                })
            }
        };

        self.write_event(json);
    }
}

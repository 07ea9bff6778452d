//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Typed events with stable names
//! - Pluggable sinks (log output, in-memory capture)
//!
//! # Usage
//!
//! ```ignore
//! use strongparams::observability::{Event, EventRecord, EventSink, LogSink};
//!
//! LogSink.emit(EventRecord::new(Event::RecordCreated).with_field("model", "Article"));
//! ```

mod events;
mod logger;
mod sink;

pub use events::{Event, EventRecord};
pub use logger::{Logger, Severity};
pub use sink::{EventSink, LogSink, MemorySink};

use std::sync::Arc;

/// Shared handle to the default sink
pub fn default_sink() -> Arc<dyn EventSink> {
    Arc::new(LogSink)
}

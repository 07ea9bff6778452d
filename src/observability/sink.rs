//! Event sinks
//!
//! Subsystems never log directly; they hand records to an `EventSink`
//! so callers decide where events go.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use super::events::{Event, EventRecord};
use super::logger::Logger;

/// Destination for emitted events.
///
/// Emission is synchronous and must not fail the caller.
pub trait EventSink: Send + Sync + fmt::Debug {
    fn emit(&self, record: EventRecord);
}

/// Writes every event as a JSON line on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, record: EventRecord) {
        let fields: Vec<(&str, &str)> = record
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        Logger::log_stderr(record.severity, record.event.as_str(), &fields);
    }
}

/// Keeps events in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<EventRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records emitted so far
    pub fn records(&self) -> Vec<EventRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records of a single event kind
    pub fn of(&self, event: Event) -> Vec<EventRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.event == event)
            .collect()
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl EventSink for MemorySink {
    fn emit(&self, record: EventRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}

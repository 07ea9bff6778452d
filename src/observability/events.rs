//! Observable events
//!
//! Events are explicit and typed. Their string names are stable and
//! appear verbatim in log output.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Parameter filtering
    /// `permit` dropped at least one key
    UnpermittedParameters,
    /// `require` found no usable value
    ParameterMissing,

    // Persistence
    /// Migration applied to the schema
    MigrationApplied,
    /// Record inserted
    RecordCreated,
    /// Record updated
    RecordUpdated,
    /// Write rejected by a mass-assignment guard or lookup
    RecordRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::UnpermittedParameters => "UNPERMITTED_PARAMETERS",
            Event::ParameterMissing => "PARAMETER_MISSING",
            Event::MigrationApplied => "MIGRATION_APPLIED",
            Event::RecordCreated => "RECORD_CREATED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordRejected => "RECORD_REJECTED",
        }
    }

    /// Default severity used when the event is logged
    pub fn severity(&self) -> Severity {
        match self {
            Event::UnpermittedParameters => Severity::Warn,
            Event::ParameterMissing | Event::RecordRejected => Severity::Error,
            Event::MigrationApplied => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single emitted event with its fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub event: Event,
    pub severity: Severity,
    pub fields: Vec<(String, String)>,
}

impl EventRecord {
    /// Create a record at the event's default severity
    pub fn new(event: Event) -> Self {
        Self {
            event,
            severity: event.severity(),
            fields: Vec::new(),
        }
    }

    /// Attach a field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// Look up a field value by key
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_stable() {
        assert_eq!(Event::UnpermittedParameters.as_str(), "UNPERMITTED_PARAMETERS");
        assert_eq!(Event::RecordCreated.to_string(), "RECORD_CREATED");
    }

    #[test]
    fn test_record_fields() {
        let record = EventRecord::new(Event::RecordCreated)
            .with_field("model", "Article")
            .with_field("id", "1");

        assert_eq!(record.severity, Severity::Info);
        assert_eq!(record.field("model"), Some("Article"));
        assert_eq!(record.field("missing"), None);
    }
}

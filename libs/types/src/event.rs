//! Event ingestion types
//!
//! An Event is an immutable record of something that happened on a monitored
//! source. Its severity decides whether an Alert is derived from it.

use crate::errors::ValidationError;
use crate::ids::EventId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of the `source` and `event_type` fields, in characters
pub const MAX_SHORT_TEXT: usize = 50;

/// Ordinal severity scale
///
/// Serialized as its integer value on the wire and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Severity {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Integer value used on the wire and in storage
    pub fn value(&self) -> i64 {
        *self as i64
    }

    /// Whether an event of this severity escalates into an alert
    pub fn escalates(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

impl TryFrom<i64> for Severity {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Severity::Low),
            2 => Ok(Severity::Medium),
            3 => Ok(Severity::High),
            4 => Ok(Severity::Critical),
            _ => Err(ValidationError::OutOfDomain {
                field: "severity",
                value,
            }),
        }
    }
}

impl From<Severity> for i64 {
    fn from(severity: Severity) -> Self {
        severity.value()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated ingestion payload, before an id and timestamp are assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub source: String,
    pub event_type: String,
    pub severity: Severity,
    pub description: String,
}

impl NewEvent {
    /// Build and validate an ingestion payload
    pub fn new(
        source: impl Into<String>,
        event_type: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let event = Self {
            source: source.into(),
            event_type: event_type.into(),
            severity,
            description: description.into(),
        };
        event.validate()?;
        Ok(event)
    }

    /// Check field constraints
    ///
    /// `source` and `event_type` must be non-blank and at most
    /// [`MAX_SHORT_TEXT`] characters. `description` is free text.
    pub fn validate(&self) -> Result<(), ValidationError> {
        short_text("source", &self.source)?;
        short_text("event_type", &self.event_type)?;
        Ok(())
    }
}

fn short_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    let len = value.chars().count();
    if len > MAX_SHORT_TEXT {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_SHORT_TEXT,
            len,
        });
    }
    Ok(())
}

/// Persisted event
///
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub source: String,
    pub event_type: String,
    pub severity: Severity,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Assign identity and creation time to a validated payload
    pub fn from_new(new: NewEvent, created_at: DateTime<Utc>) -> Self {
        Self {
            id: EventId::new(),
            source: new.source,
            event_type: new.event_type,
            severity: new.severity,
            description: new.description,
            created_at,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.source, self.severity.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_labels() {
        let labels: Vec<_> = Severity::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["Low", "Medium", "High", "Critical"]);
    }

    #[test]
    fn test_severity_values_are_ordinal() {
        for (i, severity) in Severity::ALL.iter().enumerate() {
            assert_eq!(severity.value(), i as i64 + 1);
            assert_eq!(Severity::try_from(severity.value()).unwrap(), *severity);
        }
    }

    #[test]
    fn test_severity_out_of_domain() {
        for value in [0, 5, -1, 300] {
            assert_eq!(
                Severity::try_from(value),
                Err(ValidationError::OutOfDomain {
                    field: "severity",
                    value
                })
            );
        }
    }

    #[test]
    fn test_only_high_and_critical_escalate() {
        assert!(!Severity::Low.escalates());
        assert!(!Severity::Medium.escalates());
        assert!(Severity::High.escalates());
        assert!(Severity::Critical.escalates());
    }

    #[test]
    fn test_severity_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "4");
        let parsed: Severity = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, Severity::Medium);
        assert!(serde_json::from_str::<Severity>("7").is_err());
    }

    #[test]
    fn test_new_event_rejects_blank_source() {
        let err = NewEvent::new("  ", "intrusion", Severity::Low, "x").unwrap_err();
        assert_eq!(err, ValidationError::Blank { field: "source" });
    }

    #[test]
    fn test_new_event_length_limit() {
        let at_limit = "a".repeat(MAX_SHORT_TEXT);
        assert!(NewEvent::new(at_limit.clone(), "t", Severity::Low, "").is_ok());

        let over = "a".repeat(MAX_SHORT_TEXT + 1);
        let err = NewEvent::new("sensor", over, Severity::Low, "").unwrap_err();
        assert_eq!(err.field(), "event_type");
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let accented = "é".repeat(MAX_SHORT_TEXT);
        assert!(NewEvent::new(accented, "t", Severity::Low, "").is_ok());
    }

    #[test]
    fn test_event_display() {
        let new = NewEvent::new("sensor-7", "intrusion", Severity::Critical, "breach").unwrap();
        let event = Event::from_new(new, Utc::now());
        assert_eq!(event.to_string(), "sensor-7 - Critical");
    }
}

//! Alert lifecycle types
//!
//! An Alert is derived from exactly one escalating Event and tracks the human
//! response to it. Only its status ever changes.

use crate::errors::ValidationError;
use crate::event::Event;
use crate::ids::{AlertId, EventId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Alert lifecycle state
///
/// No transition table applies: any state may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum AlertStatus {
    #[default]
    Open = 1,
    Acknowledged = 2,
    Resolved = 3,
}

impl AlertStatus {
    pub const ALL: [AlertStatus; 3] = [
        AlertStatus::Open,
        AlertStatus::Acknowledged,
        AlertStatus::Resolved,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            AlertStatus::Open => "Open",
            AlertStatus::Acknowledged => "Acknowledged",
            AlertStatus::Resolved => "Resolved",
        }
    }

    pub fn value(&self) -> i64 {
        *self as i64
    }
}

impl TryFrom<i64> for AlertStatus {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AlertStatus::Open),
            2 => Ok(AlertStatus::Acknowledged),
            3 => Ok(AlertStatus::Resolved),
            _ => Err(ValidationError::OutOfDomain {
                field: "status",
                value,
            }),
        }
    }
}

impl From<AlertStatus> for i64 {
    fn from(status: AlertStatus) -> Self {
        status.value()
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Alert record, owned by its event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub event_id: EventId,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Fresh Open alert referencing `event`
    pub fn open_for(event: &Event, created_at: DateTime<Utc>) -> Self {
        Self {
            id: AlertId::new(),
            event_id: event.id,
            status: AlertStatus::Open,
            created_at,
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status.label())
    }
}

/// Read model: an alert together with the full event it was derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertWithEvent {
    pub alert: Alert,
    pub event: Event,
}

impl fmt::Display for AlertWithEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.alert.status.label(), self.event)
    }
}

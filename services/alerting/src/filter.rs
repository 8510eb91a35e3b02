//! Alert listing criteria
//!
//! Absent fields place no constraint. `severity` applies to the related
//! event, not the alert.

use serde::{Deserialize, Serialize};
use types::alert::{AlertStatus, AlertWithEvent};
use types::event::Severity;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertFilter {
    pub status: Option<AlertStatus>,
    pub severity: Option<Severity>,
}

impl AlertFilter {
    pub fn with_status(mut self, status: AlertStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.severity.is_none()
    }

    /// In-memory equivalent of the SQL predicate built by the store.
    pub fn matches(&self, item: &AlertWithEvent) -> bool {
        self.status.map_or(true, |s| item.alert.status == s)
            && self.severity.map_or(true, |s| item.event.severity == s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use types::alert::Alert;
    use types::event::{Event, NewEvent};

    fn item(severity: Severity, status: AlertStatus) -> AlertWithEvent {
        let new = NewEvent::new("sensor-7", "intrusion", severity, "").unwrap();
        let event = Event::from_new(new, Utc::now());
        let mut alert = Alert::open_for(&event, Utc::now());
        alert.status = status;
        AlertWithEvent { alert, event }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = AlertFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&item(Severity::High, AlertStatus::Resolved)));
    }

    #[test]
    fn test_status_filter_ignores_severity() {
        let filter = AlertFilter::default().with_status(AlertStatus::Open);
        assert!(filter.matches(&item(Severity::High, AlertStatus::Open)));
        assert!(filter.matches(&item(Severity::Critical, AlertStatus::Open)));
        assert!(!filter.matches(&item(Severity::Critical, AlertStatus::Acknowledged)));
    }

    #[test]
    fn test_combined_filter_requires_both() {
        let filter = AlertFilter::default()
            .with_status(AlertStatus::Open)
            .with_severity(Severity::Critical);
        assert!(filter.matches(&item(Severity::Critical, AlertStatus::Open)));
        assert!(!filter.matches(&item(Severity::High, AlertStatus::Open)));
        assert!(!filter.matches(&item(Severity::Critical, AlertStatus::Resolved)));
    }
}

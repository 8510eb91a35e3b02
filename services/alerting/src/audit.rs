//! Audit records
//!
//! Operations receive an [`AuditSink`] instead of reaching for a global
//! logger. [`TracingAuditSink`] is the production sink.

use std::sync::Mutex;

use types::event::Severity;
use types::ids::{AlertId, EventId};

use crate::transition::StatusChange;

/// Log target for every audit record
pub const AUDIT_TARGET: &str = "audit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditRecord {
    /// An event was persisted
    EventIngested { event_id: EventId, severity: Severity },
    /// An alert was raised automatically from an escalating event
    AlertRaised { alert_id: AlertId, event_id: EventId },
    /// An alert's status was replaced
    AlertStatusChanged(StatusChange),
}

/// Destination for audit records.
///
/// Object safe so it can be shared as `Arc<dyn AuditSink>`.
pub trait AuditSink: Send + Sync {
    fn record(&self, record: &AuditRecord);
}

/// Emits each record as a structured `tracing` event on the `audit` target.
///
/// Automatic escalations are logged at `WARN`, everything else at `INFO`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: &AuditRecord) {
        match record {
            AuditRecord::EventIngested { event_id, severity } => {
                tracing::info!(
                    target: AUDIT_TARGET,
                    event_id = %event_id,
                    severity = severity.label(),
                    "event created"
                );
            }
            AuditRecord::AlertRaised { alert_id, event_id } => {
                tracing::warn!(
                    target: AUDIT_TARGET,
                    alert_id = %alert_id,
                    event_id = %event_id,
                    "alert auto-created"
                );
            }
            AuditRecord::AlertStatusChanged(change) => {
                tracing::info!(
                    target: AUDIT_TARGET,
                    alert_id = %change.alert_id,
                    old_status = change.from.label(),
                    new_status = change.to.label(),
                    "alert status updated"
                );
            }
        }
    }
}

/// Keeps records in memory; used by tests to assert on side effects.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, record: &AuditRecord) {
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        records.push(record.clone());
    }
}

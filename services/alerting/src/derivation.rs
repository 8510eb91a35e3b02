//! Event → Alert derivation rule
//!
//! Runs synchronously inside the same transaction that persists the event,
//! so a client that sees the event created can rely on its alert existing.

use chrono::{DateTime, Utc};
use types::alert::Alert;
use types::event::Event;

/// Decide whether `event` materializes an alert.
///
/// High and Critical events yield a fresh Open alert referencing the event;
/// Low and Medium yield nothing.
pub fn derive_alert(event: &Event) -> Option<Alert> {
    derive_alert_at(event, Utc::now())
}

/// Same as [`derive_alert`] with an explicit creation time.
pub fn derive_alert_at(event: &Event, created_at: DateTime<Utc>) -> Option<Alert> {
    if event.severity.escalates() {
        Some(Alert::open_for(event, created_at))
    } else {
        None
    }
}

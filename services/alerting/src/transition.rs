//! Alert status transition
//!
//! Any status may follow any other, including itself. Only `status` is
//! touched; id, event reference and creation time are fixed.

use serde::Serialize;
use types::alert::{Alert, AlertStatus};
use types::ids::AlertId;

/// Before/after record of a status update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub alert_id: AlertId,
    pub from: AlertStatus,
    pub to: AlertStatus,
}

/// Replace the alert's status and report what changed.
pub fn apply_status(alert: &mut Alert, new_status: AlertStatus) -> StatusChange {
    let from = alert.status;
    alert.status = new_status;
    StatusChange {
        alert_id: alert.id,
        from,
        to: new_status,
    }
}

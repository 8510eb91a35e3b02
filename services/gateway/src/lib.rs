//! HTTP surface of the threat monitoring service
//!
//! | Route | Capability |
//! |---|---|
//! | `POST /create-event/` | elevated |
//! | `GET /list-alerts/` | authenticated |
//! | `PATCH /update-alert/{id}/` | elevated (partial) |
//! | `PUT /update-alert/{id}/` | elevated |

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod router;
pub mod state;

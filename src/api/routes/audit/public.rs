//! Public types for the audit API
use serde::Deserialize;

pub use crate::audit::AuditRecord;

/// Exactly one of the two filters is expected; `doctor_email` wins
/// when both are present.
#[derive(Deserialize)]
pub struct AuditQuery {
    pub doctor_email: Option<String>,
    pub patient_email: Option<String>,
}

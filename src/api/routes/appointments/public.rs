//! Public types for the appointments API
use serde::Deserialize;

pub use crate::scheduling::booking::AppointmentRequest;
pub use crate::scheduling::cancel::CancelRequest;
pub use crate::scheduling::upcoming::AppointmentSummary;

#[derive(Deserialize)]
pub struct UpcomingQuery {
    pub doctor_email: String,
}

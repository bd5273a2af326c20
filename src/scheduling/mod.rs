//! The scheduling and booking engine: slot rules, availability checks
//! against the remote calendar, and the booking/cancellation workflows
//! with their audit and notification side effects.

pub mod availability;
pub mod booking;
pub mod cancel;
pub mod error;
pub mod identity;
pub mod lock;
pub mod slot;
pub mod upcoming;

pub use error::SchedulerError;
pub use lock::SlotLocks;

/// Bookings always target the account's primary calendar.
pub const PRIMARY_CALENDAR_ID: &str = "primary";

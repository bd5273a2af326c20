use thiserror::Error;

/// Failure classes for the booking and cancellation workflows.
///
/// Outcomes the caller is expected to act on (slot invalid, slot
/// unavailable, appointment not found) are not errors; they are
/// variants of the workflow outcome enums. Everything here aborts the
/// request.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Malformed input, rejected before any remote call.
    #[error("invalid start time: {0}")]
    InvalidStartTime(#[from] chrono::ParseError),

    /// A required field is blank or otherwise unusable.
    #[error("{0}")]
    Validation(String),

    /// No credential stored for the requested doctor.
    #[error("Doctor not registered or calendar access missing: {email}")]
    NotRegistered { email: String },

    /// A calendar, token, or mail call failed. Never retried here;
    /// retry is caller policy.
    #[error("{context}: {source}")]
    Upstream {
        context: String,
        #[source]
        source: anyhow::Error,
    },
}

impl SchedulerError {
    pub fn upstream(context: impl Into<String>, source: anyhow::Error) -> Self {
        SchedulerError::Upstream {
            context: context.into(),
            source,
        }
    }
}

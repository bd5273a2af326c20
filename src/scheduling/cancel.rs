//! The cancellation workflow: look up the event, recover the patient's
//! identity from it, delete, then notify whoever can still be reached.

use std::fmt;

use chrono::DateTime;
use serde::Deserialize;
use tokio_rusqlite::Connection;

use crate::core::AppConfig;
use crate::credentials;
use crate::google::calendar::CalendarClient;
use crate::notify::{self, EmailNotification};
use crate::scheduling::PRIMARY_CALENDAR_ID;
use crate::scheduling::error::SchedulerError;
use crate::scheduling::identity;

#[derive(Debug, Clone, Deserialize)]
pub struct CancelRequest {
    pub doctor_email: String,
    pub event_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CancellationOutcome {
    /// Event deleted. `notified_email` is `None` when no patient email
    /// could be recovered from the event text.
    Cancelled { notified_email: Option<String> },
    /// Event deleted but the notification to the recovered address
    /// failed; the deletion is not reversed.
    CancelledNotificationFailed { email: String },
    /// The calendar has no such event.
    NotFound,
}

impl fmt::Display for CancellationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancellationOutcome::Cancelled {
                notified_email: Some(email),
            } => {
                write!(f, "✅ Appointment cancelled and notification sent to {}", email)
            }
            CancellationOutcome::Cancelled {
                notified_email: None,
            } => {
                write!(
                    f,
                    "✅ Appointment cancelled but patient email not found for notification."
                )
            }
            CancellationOutcome::CancelledNotificationFailed { email } => {
                write!(
                    f,
                    "✅ Appointment cancelled but notification to {} failed.",
                    email
                )
            }
            CancellationOutcome::NotFound => {
                write!(f, "❌ Appointment not found in calendar.")
            }
        }
    }
}

/// Cancel a booked appointment by event id.
///
/// The delete is the commit point and happens before any notification.
/// Identity parsing is best-effort: an event this engine didn't write
/// cancels fine, just without an email going out.
pub async fn cancel_appointment(
    db: &Connection,
    config: &AppConfig,
    request: &CancelRequest,
) -> Result<CancellationOutcome, SchedulerError> {
    if request.event_id.trim().is_empty() {
        return Err(SchedulerError::Validation(String::from(
            "Event ID is required to cancel an appointment.",
        )));
    }

    let credential = credentials::find_by_email(db, &request.doctor_email)
        .await
        .map_err(|e| SchedulerError::upstream("Credential lookup failed", e))?
        .ok_or_else(|| SchedulerError::NotRegistered {
            email: request.doctor_email.clone(),
        })?;
    let access_token = credentials::ensure_fresh(db, config, &credential)
        .await
        .map_err(|e| SchedulerError::upstream("Persisting refreshed token failed", e))?;

    let calendar = CalendarClient::new(&config.calendar_api_url, &access_token);

    let Some(event) = calendar
        .get_event(PRIMARY_CALENDAR_ID, &request.event_id)
        .await
        .map_err(|e| {
            SchedulerError::upstream(format!("Event fetch failed for {}", request.event_id), e)
        })?
    else {
        return Ok(CancellationOutcome::NotFound);
    };

    let who = identity::decode_event(event.summary.as_deref(), event.description.as_deref());

    let start = event
        .start
        .as_ref()
        .and_then(|s| s.date_time.as_ref())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok());
    let end = event
        .end
        .as_ref()
        .and_then(|e| e.date_time.as_ref())
        .and_then(|e| DateTime::parse_from_rfc3339(e).ok());

    let deleted = calendar
        .delete_event(PRIMARY_CALENDAR_ID, &request.event_id)
        .await
        .map_err(|e| {
            SchedulerError::upstream(format!("Event delete failed for {}", request.event_id), e)
        })?;
    if !deleted {
        return Ok(CancellationOutcome::NotFound);
    }

    let Some(patient_email) = who.patient_email else {
        tracing::info!(
            "Cancelled event {} for {} with no recoverable patient email",
            request.event_id,
            request.doctor_email
        );
        return Ok(CancellationOutcome::Cancelled {
            notified_email: None,
        });
    };

    let (Some(start), Some(end)) = (start, end) else {
        // Deleted, but without a parseable window there is nothing to
        // put in an ICS cancellation.
        tracing::warn!(
            "Cancelled event {} but its start/end were unparseable; skipping notification",
            request.event_id
        );
        return Ok(CancellationOutcome::Cancelled {
            notified_email: None,
        });
    };

    let first_name = who.first_name.unwrap_or_default();
    let notice = EmailNotification {
        to: patient_email.clone(),
        from: request.doctor_email.clone(),
        subject: String::from("Appointment Cancelled"),
        body: format!(
            "Dear {}, your appointment scheduled for {} has been cancelled.",
            first_name,
            start.to_rfc3339()
        ),
        start,
        end,
    };
    match notify::send_cancellation_notice(&config.gmail_api_url, &access_token, &notice).await {
        Ok(_) => Ok(CancellationOutcome::Cancelled {
            notified_email: Some(patient_email),
        }),
        Err(e) => {
            tracing::warn!(
                "Cancellation notice to {} failed for event {} ({}): {}",
                patient_email,
                request.event_id,
                request.doctor_email,
                e
            );
            Ok(CancellationOutcome::CancelledNotificationFailed {
                email: patient_email,
            })
        }
    }
}

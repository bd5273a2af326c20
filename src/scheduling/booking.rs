//! The booking workflow: validate, check availability, insert the
//! event, then notify and audit.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use tokio_rusqlite::Connection;

use crate::audit::{self, AuditStatus, NewAuditRecord};
use crate::core::AppConfig;
use crate::credentials;
use crate::google::calendar::{CalendarClient, EventDateTime, EventInput};
use crate::notify::{self, EmailNotification};
use crate::scheduling::PRIMARY_CALENDAR_ID;
use crate::scheduling::availability::{find_next_available_slot, is_slot_available};
use crate::scheduling::error::SchedulerError;
use crate::scheduling::identity;
use crate::scheduling::lock::SlotLocks;
use crate::scheduling::slot::{APPOINTMENT_TIME_ZONE, is_valid_slot, slot_end};

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentRequest {
    pub first_name: String,
    pub last_name: String,
    pub doctor_email: String,
    pub patient_email: String,
    /// RFC 3339 zoned timestamp, e.g. `2025-03-28T13:00:00+05:30`.
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    /// Event inserted, confirmation sent, audit row written.
    Booked { event_id: String },
    /// Event inserted (the commit point), but a post-commit side
    /// effect failed. The booking stands; `detail` says what is
    /// missing so it can be reconciled by hand.
    BookedIncomplete { event_id: String, detail: String },
    /// Outside business hours; no remote call was made.
    SlotInvalid,
    /// The window is taken. `next_available` is report-only; the
    /// engine never books the alternative itself.
    SlotUnavailable {
        next_available: Option<DateTime<FixedOffset>>,
    },
}

impl fmt::Display for BookingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingOutcome::Booked { event_id } => {
                write!(f, "✅ Appointment booked successfully. Event ID: {}", event_id)
            }
            BookingOutcome::BookedIncomplete { event_id, detail } => {
                write!(
                    f,
                    "✅ Appointment booked successfully. Event ID: {} ({})",
                    event_id, detail
                )
            }
            BookingOutcome::SlotInvalid => {
                write!(f, "❌ Slot must be between 9 AM to 5 PM, Monday to Friday.")
            }
            BookingOutcome::SlotUnavailable {
                next_available: Some(next),
            } => {
                write!(f, "❌ Slot unavailable. Next available: {}", next.to_rfc3339())
            }
            BookingOutcome::SlotUnavailable {
                next_available: None,
            } => {
                write!(f, "❌ No available slots within the next week.")
            }
        }
    }
}

/// Book a one-hour appointment on the doctor's primary calendar.
///
/// Each step gates the next: parse, business-hour check, credential
/// lookup and token refresh, free/busy check, insert. The insert is
/// the commit point; the confirmation email and the audit row are
/// best-effort after it and their failure surfaces as
/// [`BookingOutcome::BookedIncomplete`], never as a rollback.
pub async fn book_appointment(
    db: &Connection,
    config: &AppConfig,
    locks: &SlotLocks,
    request: &AppointmentRequest,
) -> Result<BookingOutcome, SchedulerError> {
    let start = DateTime::parse_from_rfc3339(&request.start_time)?;
    let end = slot_end(start);

    if !is_valid_slot(&start) {
        return Ok(BookingOutcome::SlotInvalid);
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

    // Hold the window lock across check-then-insert so in-process
    // rivals for the same slot serialize.
    let guard = locks.acquire(&request.doctor_email, start).await;

    if !is_slot_available(&calendar, PRIMARY_CALENDAR_ID, start, end).await? {
        drop(guard);
        let next_available =
            find_next_available_slot(&calendar, PRIMARY_CALENDAR_ID, start).await?;
        return Ok(BookingOutcome::SlotUnavailable { next_available });
    }

    let event = EventInput {
        summary: identity::encode_summary(&request.first_name, &request.last_name),
        description: identity::encode_description(&request.patient_email),
        start: EventDateTime::zoned(start, APPOINTMENT_TIME_ZONE),
        end: EventDateTime::zoned(end, APPOINTMENT_TIME_ZONE),
    };
    let created = calendar
        .insert_event(PRIMARY_CALENDAR_ID, &event)
        .await
        .map_err(|e| {
            SchedulerError::upstream(
                format!(
                    "Event insert failed for {} at [{}, {})",
                    request.doctor_email, start, end
                ),
                e,
            )
        })?;
    drop(guard);

    // Committed. Everything below is reported, not rolled back.
    let mut missing = Vec::new();

    let confirmation = EmailNotification {
        to: request.patient_email.clone(),
        from: request.doctor_email.clone(),
        subject: String::from("Appointment Confirmation"),
        body: format!(
            "Your appointment with {} has been scheduled.",
            request.doctor_email
        ),
        start,
        end,
    };
    if let Err(e) =
        notify::send_booking_confirmation(&config.gmail_api_url, &access_token, &confirmation)
            .await
    {
        tracing::warn!(
            "Confirmation email failed for event {} ({} at {}): {}",
            created.id,
            request.doctor_email,
            start,
            e
        );
        missing.push("confirmation email could not be sent");
    }

    let record = NewAuditRecord {
        doctor_email: request.doctor_email.clone(),
        patient_email: request.patient_email.clone(),
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        slot_start: start,
        slot_end: end,
        event_id: created.id.clone(),
        status: AuditStatus::Booked,
    };
    if let Err(e) = audit::append(db, record).await {
        tracing::warn!(
            "Audit append failed for event {} ({} at {}): {}",
            created.id,
            request.doctor_email,
            start,
            e
        );
        missing.push("audit record could not be written");
    }

    if missing.is_empty() {
        Ok(BookingOutcome::Booked {
            event_id: created.id,
        })
    } else {
        Ok(BookingOutcome::BookedIncomplete {
            event_id: created.id,
            detail: missing.join("; "),
        })
    }
}

//! Availability checks against the remote calendar's free/busy data.

use chrono::{DateTime, Duration, FixedOffset};

use crate::google::calendar::CalendarClient;
use crate::scheduling::error::SchedulerError;
use crate::scheduling::slot::{is_valid_slot, slot_end};

/// The next-slot search gives up one week out.
pub const SEARCH_HORIZON_DAYS: i64 = 7;

/// Whether `[start, end)` is open on the calendar: a single free/busy
/// query for exactly that window, available iff the returned busy list
/// is empty. No finer-grained overlap math; the window query's answer
/// is the answer.
pub async fn is_slot_available(
    calendar: &CalendarClient,
    calendar_id: &str,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> Result<bool, SchedulerError> {
    let busy = calendar
        .query_free_busy(calendar_id, start, end)
        .await
        .map_err(|e| {
            SchedulerError::upstream(
                format!("Free/busy check failed for [{}, {})", start, end),
                e,
            )
        })?;
    Ok(busy.is_empty())
}

/// Walk forward from `from` in one-hour steps and return the first
/// business-valid, available slot start, or `None` once the scan
/// passes `from + 7 days`.
///
/// Strictly sequential: one free/busy probe per candidate hour, up to
/// 168 calls in the worst case. Invalid hours are skipped without a
/// remote call.
pub async fn find_next_available_slot(
    calendar: &CalendarClient,
    calendar_id: &str,
    from: DateTime<FixedOffset>,
) -> Result<Option<DateTime<FixedOffset>>, SchedulerError> {
    let horizon = from + Duration::days(SEARCH_HORIZON_DAYS);
    let mut slot = from;

    while slot < horizon {
        if is_valid_slot(&slot)
            && is_slot_available(calendar, calendar_id, slot, slot_end(slot)).await?
        {
            return Ok(Some(slot));
        }
        slot += Duration::hours(1);
    }
    Ok(None)
}

//! Read-side listing of the week ahead on a doctor's calendar.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::google::calendar::CalendarClient;
use crate::scheduling::PRIMARY_CALENDAR_ID;
use crate::scheduling::availability::SEARCH_HORIZON_DAYS;
use crate::scheduling::error::SchedulerError;
use crate::scheduling::identity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSummary {
    pub event_id: String,
    pub start_time: String,
    pub end_time: String,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub patient_email: Option<String>,
}

/// Events on the primary calendar for the next week, with whatever
/// identity can be recovered from each event's text. Events this
/// engine didn't write come back with empty identity fields.
pub async fn list_upcoming_appointments(
    calendar: &CalendarClient,
) -> Result<Vec<AppointmentSummary>, SchedulerError> {
    let now: DateTime<FixedOffset> = Utc::now().fixed_offset();
    let horizon = now + Duration::days(SEARCH_HORIZON_DAYS);

    let events = calendar
        .list_events(PRIMARY_CALENDAR_ID, now, horizon)
        .await
        .map_err(|e| SchedulerError::upstream("Event list failed", e))?;

    let summaries = events
        .into_iter()
        .map(|event| {
            let who =
                identity::decode_event(event.summary.as_deref(), event.description.as_deref());
            AppointmentSummary {
                event_id: event.id,
                start_time: event
                    .start
                    .and_then(|s| s.date_time)
                    .unwrap_or_default(),
                end_time: event.end.and_then(|e| e.date_time).unwrap_or_default(),
                title: event.summary,
                first_name: who.first_name,
                last_name: who.last_name,
                patient_email: who.patient_email,
            }
        })
        .collect();
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listing_decodes_engine_written_events() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/calendars/primary/events")
            .match_query(mockito::Matcher::Regex("orderBy=startTime".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "items": [
                        {
                            "id": "evt_1",
                            "summary": "Appointment with Jane Doe",
                            "description": "Auto-scheduled for jane@example.com",
                            "start": {"dateTime": "2025-03-28T13:00:00+05:30"},
                            "end": {"dateTime": "2025-03-28T14:00:00+05:30"}
                        },
                        {
                            "id": "evt_2",
                            "summary": "Dentist conference",
                            "start": {"dateTime": "2025-03-28T15:00:00+05:30"},
                            "end": {"dateTime": "2025-03-28T16:00:00+05:30"}
                        }
                    ]
                }"#,
            )
            .create_async()
            .await;

        let client = CalendarClient::new(&server.url(), "token");
        let summaries = list_upcoming_appointments(&client).await.unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].first_name.as_deref(), Some("Jane"));
        assert_eq!(summaries[0].last_name.as_deref(), Some("Doe"));
        assert_eq!(
            summaries[0].patient_email.as_deref(),
            Some("jane@example.com")
        );
        assert_eq!(summaries[0].start_time, "2025-03-28T13:00:00+05:30");

        // Foreign event: listed, but no identity recovered
        assert_eq!(summaries[1].event_id, "evt_2");
        assert!(summaries[1].first_name.is_none());
        assert!(summaries[1].patient_email.is_none());
    }
}

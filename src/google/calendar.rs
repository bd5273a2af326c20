//! Google Calendar API client for free/busy queries and event CRUD.
//!
//! A `CalendarClient` is a per-request value built from a base URL and a
//! bearer token; construct one from a freshly refreshed credential and
//! pass it down rather than holding a shared client anywhere.

use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct CalendarClient {
    http: Client,
    base_url: String,
    access_token: String,
}

/// One busy window from a free/busy response.
#[derive(Debug, Clone, Deserialize)]
pub struct BusyInterval {
    pub start: String,
    pub end: String,
}

#[derive(Serialize)]
struct FreeBusyRequest {
    #[serde(rename = "timeMin")]
    time_min: String,
    #[serde(rename = "timeMax")]
    time_max: String,
    items: Vec<FreeBusyItem>,
}

#[derive(Serialize)]
struct FreeBusyItem {
    id: String,
}

#[derive(Deserialize)]
struct FreeBusyResponse {
    calendars: HashMap<String, FreeBusyCalendar>,
}

#[derive(Deserialize)]
struct FreeBusyCalendar {
    busy: Vec<BusyInterval>,
}

/// Google's event date-time wrapper. All-day events carry a `date`
/// instead of a `dateTime`, so both fields are optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime", skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    /// An RFC 3339 date-time pinned to a named zone, the shape the
    /// scheduler writes for every appointment.
    pub fn zoned(at: DateTime<FixedOffset>, time_zone: &str) -> Self {
        Self {
            date_time: Some(at.to_rfc3339()),
            time_zone: Some(time_zone.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: Option<EventDateTime>,
    pub end: Option<EventDateTime>,
}

#[derive(Debug, Serialize)]
pub struct EventInput {
    pub summary: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

#[derive(Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<CalendarEvent>,
}

#[derive(Deserialize)]
struct CalendarList {
    #[serde(default)]
    items: Vec<CalendarListEntry>,
}

#[derive(Deserialize)]
struct CalendarListEntry {
    id: String,
}

impl CalendarClient {
    pub fn new(base_url: &str, access_token: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// Query busy intervals for exactly `[time_min, time_max)` on one
    /// calendar. Returns whatever the server reports for that window;
    /// callers decide what "available" means.
    pub async fn query_free_busy(
        &self,
        calendar_id: &str,
        time_min: DateTime<FixedOffset>,
        time_max: DateTime<FixedOffset>,
    ) -> Result<Vec<BusyInterval>, anyhow::Error> {
        let url = format!("{}/freeBusy", self.base_url);
        let body = FreeBusyRequest {
            time_min: time_min.to_rfc3339(),
            time_max: time_max.to_rfc3339(),
            items: vec![FreeBusyItem {
                id: calendar_id.to_string(),
            }],
        };
        let res = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("Free/busy query failed: {} ({})", status, text);
        }
        let mut response: FreeBusyResponse = serde_json::from_str(&text)?;
        let calendar = response
            .calendars
            .remove(calendar_id)
            .ok_or_else(|| anyhow::anyhow!("Calendar {} missing from free/busy response", calendar_id))?;
        Ok(calendar.busy)
    }

    pub async fn insert_event(
        &self,
        calendar_id: &str,
        event: &EventInput,
    ) -> Result<CalendarEvent, anyhow::Error> {
        let url = format!("{}/calendars/{}/events", self.base_url, calendar_id);
        let res = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(event)
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("Event insert failed: {} ({})", status, text);
        }
        let created: CalendarEvent = serde_json::from_str(&text)?;
        Ok(created)
    }

    /// Fetch an event by id. Returns `Ok(None)` when the calendar
    /// reports 404 so callers can distinguish "gone" from a real
    /// upstream failure.
    pub async fn get_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<Option<CalendarEvent>, anyhow::Error> {
        let url = format!(
            "{}/calendars/{}/events/{}",
            self.base_url, calendar_id, event_id
        );
        let res = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let status = res.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        let text = res.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("Event fetch failed: {} ({})", status, text);
        }
        let event: CalendarEvent = serde_json::from_str(&text)?;
        Ok(Some(event))
    }

    /// Delete an event. `Ok(false)` means the calendar reported 404.
    pub async fn delete_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<bool, anyhow::Error> {
        let url = format!(
            "{}/calendars/{}/events/{}",
            self.base_url, calendar_id, event_id
        );
        let res = self
            .http
            .delete(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let status = res.status();
        if status.as_u16() == 404 {
            return Ok(false);
        }
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("Event delete failed: {} ({})", status, text);
        }
        Ok(true)
    }

    /// List events in `[time_min, time_max)` ordered by start time with
    /// recurring events expanded.
    pub async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<FixedOffset>,
        time_max: DateTime<FixedOffset>,
    ) -> Result<Vec<CalendarEvent>, anyhow::Error> {
        let url = format!("{}/calendars/{}/events", self.base_url, calendar_id);
        let res = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("timeMin", time_min.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("Event list failed: {} ({})", status, text);
        }
        let list: EventList = serde_json::from_str(&text)?;
        Ok(list.items)
    }

    /// The account's primary calendar identifier, taken from the first
    /// entry of the calendar list. For Google accounts this is the
    /// account email.
    pub async fn primary_calendar_email(&self) -> Result<String, anyhow::Error> {
        let url = format!("{}/users/me/calendarList", self.base_url);
        let res = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("Calendar list failed: {} ({})", status, text);
        }
        let list: CalendarList = serde_json::from_str(&text)?;
        let first = list
            .items
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Calendar list is empty"))?;
        Ok(first.id)
    }
}

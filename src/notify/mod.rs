//! Email notifications carrying calendar invite/cancellation payloads.
//!
//! Messages are assembled as multipart MIME (a plain-text part plus a
//! `text/calendar` part) and sent through the Gmail API with the same
//! delegated token the calendar calls use.

pub mod ics;

use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::google::gmail;

#[derive(Debug, Clone)]
pub struct EmailNotification {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

fn build_mime_message(note: &EmailNotification, ics_payload: &str, ics_method: &str) -> String {
    let boundary = format!("part_{}", Uuid::new_v4().simple());
    format!(
        "From: {from}\r\n\
         To: {to}\r\n\
         Subject: {subject}\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: multipart/mixed; boundary=\"{boundary}\"\r\n\
         \r\n\
         --{boundary}\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         \r\n\
         {body}\r\n\
         --{boundary}\r\n\
         Content-Type: text/calendar; method={method}; charset=utf-8\r\n\
         Content-Class: urn:content-classes:calendarmessage\r\n\
         \r\n\
         {ics}\r\n\
         --{boundary}--\r\n",
        from = note.from,
        to = note.to,
        subject = note.subject,
        boundary = boundary,
        body = note.body,
        method = ics_method,
        ics = ics_payload,
    )
}

/// Send a confirmation email with a METHOD:REQUEST invite attached.
pub async fn send_booking_confirmation(
    gmail_api_url: &str,
    access_token: &str,
    note: &EmailNotification,
) -> Result<(), anyhow::Error> {
    let ics = ics::booking_invite(note.start, note.end, &note.from, &note.to, &note.subject);
    let mime = build_mime_message(note, &ics, "REQUEST");
    gmail::send_message(gmail_api_url, access_token, &mime).await?;
    Ok(())
}

/// Send a cancellation email with a METHOD:CANCEL payload attached.
pub async fn send_cancellation_notice(
    gmail_api_url: &str,
    access_token: &str,
    note: &EmailNotification,
) -> Result<(), anyhow::Error> {
    let ics =
        ics::cancellation_notice(note.start, note.end, &note.from, &note.to, &note.subject);
    let mime = build_mime_message(note, &ics, "CANCEL");
    gmail::send_message(gmail_api_url, access_token, &mime).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note() -> EmailNotification {
        EmailNotification {
            to: String::from("jane@example.com"),
            from: String::from("doctor@example.com"),
            subject: String::from("Appointment Confirmation"),
            body: String::from("Your appointment with doctor@example.com has been scheduled."),
            start: DateTime::parse_from_rfc3339("2025-03-28T13:00:00+05:30").unwrap(),
            end: DateTime::parse_from_rfc3339("2025-03-28T14:00:00+05:30").unwrap(),
        }
    }

    #[test]
    fn test_mime_message_carries_both_parts() {
        let note = note();
        let ics = ics::booking_invite(note.start, note.end, &note.from, &note.to, &note.subject);
        let mime = build_mime_message(&note, &ics, "REQUEST");

        assert!(mime.starts_with("From: doctor@example.com\r\n"));
        assert!(mime.contains("To: jane@example.com\r\n"));
        assert!(mime.contains("Subject: Appointment Confirmation\r\n"));
        assert!(mime.contains("Content-Type: multipart/mixed; boundary="));
        assert!(mime.contains("Content-Type: text/plain; charset=utf-8"));
        assert!(mime.contains("Content-Type: text/calendar; method=REQUEST; charset=utf-8"));
        assert!(mime.contains("BEGIN:VCALENDAR"));
        assert!(mime.contains("has been scheduled."));
        // The boundary closes the message
        let boundary_line = mime
            .lines()
            .find(|l| l.contains("boundary=\""))
            .unwrap()
            .to_string();
        let boundary = boundary_line
            .split("boundary=\"")
            .nth(1)
            .unwrap()
            .trim_end_matches('"');
        assert!(mime.trim_end().ends_with(&format!("--{}--", boundary)));
    }

    #[tokio::test]
    async fn test_send_booking_confirmation_posts_to_gmail() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/users/me/messages/send")
            .match_body(mockito::Matcher::Regex(r#""raw":"#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "msg_1"}"#)
            .expect(1)
            .create_async()
            .await;

        send_booking_confirmation(&server.url(), "token", &note())
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_cancellation_notice_failure_propagates() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/users/me/messages/send")
            .with_status(500)
            .with_body("mail backend down")
            .create_async()
            .await;

        let result = send_cancellation_notice(&server.url(), "token", &note()).await;
        assert!(result.is_err());
    }
}

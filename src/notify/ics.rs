//! iCalendar payload assembly for booking invites and cancellations.

use chrono::{DateTime, FixedOffset, Utc};
use uuid::Uuid;

/// UTC basic format required by DTSTART/DTEND/DTSTAMP.
fn utc_basic(at: DateTime<FixedOffset>) -> String {
    at.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ").to_string()
}

fn build_ics(
    method: &str,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    organizer_email: &str,
    attendee_email: &str,
    subject: &str,
    description: &str,
) -> String {
    let uid = Uuid::new_v4();
    let stamp = utc_basic(Utc::now().fixed_offset());
    [
        "BEGIN:VCALENDAR".to_string(),
        format!("METHOD:{}", method),
        "PRODID:-//clinic-scheduler//EN".to_string(),
        "VERSION:2.0".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", uid),
        format!("DTSTAMP:{}", stamp),
        format!("DTSTART:{}", utc_basic(start)),
        format!("DTEND:{}", utc_basic(end)),
        format!("ORGANIZER;CN={}:mailto:{}", organizer_email, organizer_email),
        format!(
            "ATTENDEE;ROLE=REQ-PARTICIPANT;RSVP=TRUE;CN={}:mailto:{}",
            attendee_email, attendee_email
        ),
        format!("DESCRIPTION:{}", description),
        format!("SUMMARY:{}", subject),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ]
    .join("\r\n")
}

/// METHOD:REQUEST payload for a freshly booked appointment.
pub fn booking_invite(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    organizer_email: &str,
    attendee_email: &str,
    subject: &str,
) -> String {
    build_ics(
        "REQUEST",
        start,
        end,
        organizer_email,
        attendee_email,
        subject,
        "Appointment Scheduled",
    )
}

/// METHOD:CANCEL payload for a cancelled appointment.
pub fn cancellation_notice(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    organizer_email: &str,
    attendee_email: &str,
    subject: &str,
) -> String {
    build_ics(
        "CANCEL",
        start,
        end,
        organizer_email,
        attendee_email,
        subject,
        "Appointment Cancelled",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_times_are_converted_to_utc_basic_format() {
        // 13:00 +05:30 is 07:30 UTC
        let ics = booking_invite(
            at("2025-03-28T13:00:00+05:30"),
            at("2025-03-28T14:00:00+05:30"),
            "doctor@example.com",
            "jane@example.com",
            "Appointment Confirmation",
        );
        assert!(ics.contains("DTSTART:20250328T073000Z"));
        assert!(ics.contains("DTEND:20250328T083000Z"));
        assert!(ics.contains("DTSTAMP:"));
    }

    #[test]
    fn test_booking_invite_fields() {
        let ics = booking_invite(
            at("2025-03-28T13:00:00+05:30"),
            at("2025-03-28T14:00:00+05:30"),
            "doctor@example.com",
            "jane@example.com",
            "Appointment Confirmation",
        );
        assert!(ics.starts_with("BEGIN:VCALENDAR"));
        assert!(ics.ends_with("END:VCALENDAR"));
        assert!(ics.contains("METHOD:REQUEST"));
        assert!(ics.contains("ORGANIZER;CN=doctor@example.com:mailto:doctor@example.com"));
        assert!(ics.contains(
            "ATTENDEE;ROLE=REQ-PARTICIPANT;RSVP=TRUE;CN=jane@example.com:mailto:jane@example.com"
        ));
        assert!(ics.contains("SUMMARY:Appointment Confirmation"));
        assert!(ics.contains("UID:"));
    }

    #[test]
    fn test_cancellation_uses_cancel_method() {
        let ics = cancellation_notice(
            at("2025-03-28T13:00:00+05:30"),
            at("2025-03-28T14:00:00+05:30"),
            "doctor@example.com",
            "jane@example.com",
            "Appointment Cancelled",
        );
        assert!(ics.contains("METHOD:CANCEL"));
        assert!(!ics.contains("METHOD:REQUEST"));
    }

    #[test]
    fn test_each_payload_gets_a_unique_uid() {
        let args = (
            at("2025-03-28T13:00:00+05:30"),
            at("2025-03-28T14:00:00+05:30"),
        );
        let a = booking_invite(args.0, args.1, "d@e.com", "p@e.com", "Subject");
        let b = booking_invite(args.0, args.1, "d@e.com", "p@e.com", "Subject");
        let uid = |ics: &str| {
            ics.lines()
                .find(|l| l.starts_with("UID:"))
                .unwrap()
                .to_string()
        };
        assert_ne!(uid(&a), uid(&b));
    }
}

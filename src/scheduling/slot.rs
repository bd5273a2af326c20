//! Business-hour rules for appointment slots.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Timelike, Weekday};

/// The zone name written into calendar event payloads. Validation
/// itself runs in the timestamp's own offset as given by the caller.
pub const APPOINTMENT_TIME_ZONE: &str = "Asia/Kolkata";

/// Every appointment is exactly one hour.
pub fn slot_end(start: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    start + Duration::hours(1)
}

/// Whether `start` is an eligible appointment start: a weekday, with
/// the start hour in 9..=16. A slot starting at 16:00 runs to 17:00
/// and is the last bookable one of the day; 17:00 itself is rejected.
pub fn is_valid_slot(start: &DateTime<FixedOffset>) -> bool {
    !matches!(start.weekday(), Weekday::Sat | Weekday::Sun)
        && start.hour() >= 9
        && start.hour() <= 16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_weekday_business_hours_are_valid() {
        // 2025-03-28 is a Friday
        assert!(is_valid_slot(&at("2025-03-28T09:00:00+05:30")));
        assert!(is_valid_slot(&at("2025-03-28T13:00:00+05:30")));
        // 2025-03-24 is a Monday
        assert!(is_valid_slot(&at("2025-03-24T12:30:00+05:30")));
    }

    #[test]
    fn test_weekends_are_rejected() {
        // 2025-03-29 is a Saturday, 2025-03-30 a Sunday
        assert!(!is_valid_slot(&at("2025-03-29T13:00:00+05:30")));
        assert!(!is_valid_slot(&at("2025-03-30T13:00:00+05:30")));
    }

    #[test]
    fn test_hour_boundaries() {
        // 16:00 starts the last slot of the day; 17:00 is past close
        assert!(is_valid_slot(&at("2025-03-28T16:00:00+05:30")));
        assert!(!is_valid_slot(&at("2025-03-28T17:00:00+05:30")));
        // 08:xx is before opening, 09:00 is the first slot
        assert!(!is_valid_slot(&at("2025-03-28T08:59:00+05:30")));
        assert!(is_valid_slot(&at("2025-03-28T09:00:00+05:30")));
        // the hour component decides, so 16:59 still passes
        assert!(is_valid_slot(&at("2025-03-28T16:59:00+05:30")));
    }

    #[test]
    fn test_validation_uses_the_timestamps_own_offset() {
        // Same instant as 2025-03-28T13:00+05:30 expressed in UTC is
        // 07:30; the hour component of the offset the caller supplied
        // is what counts, so this rendering lands before opening.
        assert!(!is_valid_slot(&at("2025-03-28T07:30:00+00:00")));
    }

    #[test]
    fn test_slot_end_is_one_hour_later() {
        let start = at("2025-03-28T16:00:00+05:30");
        assert_eq!(slot_end(start), at("2025-03-28T17:00:00+05:30"));
    }
}

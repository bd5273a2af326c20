//! Participant identity carried inside calendar event text.
//!
//! The remote event's summary and description are the only place the
//! engine persists who an appointment is for, so the encoding and its
//! inverse live together here and nowhere else. Decoding is
//! best-effort: events that were not written by this engine yield
//! empty identity fields instead of errors.

/// Summary format: `Appointment with {first} {last}`.
pub const SUMMARY_PREFIX: &str = "Appointment with ";

/// Description format: `Auto-scheduled for {email}`.
pub const DESCRIPTION_PREFIX: &str = "Auto-scheduled for ";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantIdentity {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub patient_email: Option<String>,
}

pub fn encode_summary(first_name: &str, last_name: &str) -> String {
    format!("{}{} {}", SUMMARY_PREFIX, first_name, last_name)
}

pub fn encode_description(patient_email: &str) -> String {
    format!("{}{}", DESCRIPTION_PREFIX, patient_email)
}

/// Recover `(first, last)` from a summary. Requires the fixed prefix
/// and exactly a first token before the rest of the name.
pub fn decode_summary(summary: &str) -> Option<(String, String)> {
    let name_part = summary.strip_prefix(SUMMARY_PREFIX)?;
    let (first, last) = name_part.split_once(' ')?;
    if first.is_empty() || last.is_empty() {
        return None;
    }
    Some((first.to_string(), last.to_string()))
}

/// Recover the patient email from a description. Anything without an
/// `@` is treated as not ours.
pub fn decode_description(description: &str) -> Option<String> {
    if !description.contains('@') {
        return None;
    }
    Some(description.replace(DESCRIPTION_PREFIX, "").trim().to_string())
}

/// Decode both fields of an event, tolerating either being absent or
/// unrecognized.
pub fn decode_event(summary: Option<&str>, description: Option<&str>) -> ParticipantIdentity {
    let names = summary.and_then(decode_summary);
    let patient_email = description.and_then(decode_description);
    ParticipantIdentity {
        first_name: names.as_ref().map(|(first, _)| first.clone()),
        last_name: names.map(|(_, last)| last),
        patient_email,
    }
}

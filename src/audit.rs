//! Append-only audit trail of booking outcomes.

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStatus {
    Booked,
    Cancelled,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Booked => "BOOKED",
            AuditStatus::Cancelled => "CANCELLED",
        }
    }
}

/// A booking outcome to append. Timestamps are stored as RFC 3339
/// strings in the slot's own offset.
#[derive(Debug, Clone)]
pub struct NewAuditRecord {
    pub doctor_email: String,
    pub patient_email: String,
    pub first_name: String,
    pub last_name: String,
    pub slot_start: DateTime<FixedOffset>,
    pub slot_end: DateTime<FixedOffset>,
    pub event_id: String,
    pub status: AuditStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    pub doctor_email: String,
    pub patient_email: String,
    pub first_name: String,
    pub last_name: String,
    pub slot_start: String,
    pub slot_end: String,
    pub event_id: String,
    pub status: String,
    pub created_at: String,
}

pub async fn append(db: &Connection, record: NewAuditRecord) -> Result<(), anyhow::Error> {
    db.call(move |conn| {
        conn.execute(
            "INSERT INTO appointment_audit
               (doctor_email, patient_email, first_name, last_name,
                slot_start, slot_end, event_id, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            (
                &record.doctor_email,
                &record.patient_email,
                &record.first_name,
                &record.last_name,
                record.slot_start.to_rfc3339(),
                record.slot_end.to_rfc3339(),
                &record.event_id,
                record.status.as_str(),
                Utc::now().to_rfc3339(),
            ),
        )?;
        Ok(())
    })
    .await?;
    Ok(())
}

pub async fn find_by_doctor_email(
    db: &Connection,
    doctor_email: &str,
) -> Result<Vec<AuditRecord>, anyhow::Error> {
    find_by_column(db, "doctor_email", doctor_email).await
}

pub async fn find_by_patient_email(
    db: &Connection,
    patient_email: &str,
) -> Result<Vec<AuditRecord>, anyhow::Error> {
    find_by_column(db, "patient_email", patient_email).await
}

async fn find_by_column(
    db: &Connection,
    column: &'static str,
    value: &str,
) -> Result<Vec<AuditRecord>, anyhow::Error> {
    let value = value.to_string();
    let records = db
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT id, doctor_email, patient_email, first_name, last_name,
                        slot_start, slot_end, event_id, status, created_at
                 FROM appointment_audit WHERE {} = ?1 ORDER BY id",
                column
            ))?;
            let rows = stmt
                .query_map([&value], |i| {
                    Ok(AuditRecord {
                        id: i.get(0)?,
                        doctor_email: i.get(1)?,
                        patient_email: i.get(2)?,
                        first_name: i.get(3)?,
                        last_name: i.get(4)?,
                        slot_start: i.get(5)?,
                        slot_end: i.get(6)?,
                        event_id: i.get(7)?,
                        status: i.get(8)?,
                        created_at: i.get(9)?,
                    })
                })?
                .filter_map(Result::ok)
                .collect::<Vec<_>>();
            Ok(rows)
        })
        .await?;
    Ok(records)
}

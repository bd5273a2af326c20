//! SQLite connection handling and schema setup
use std::fs;

use anyhow::Result;
use tokio_rusqlite::Connection;

/// Open the scheduler database, creating the storage directory if needed.
pub async fn async_db(db_path: &str) -> Result<Connection, anyhow::Error> {
    fs::create_dir_all(db_path)?;
    let conn = Connection::open(format!("{}/scheduler.db3", db_path)).await?;
    Ok(conn)
}

/// Create tables if they don't already exist. Safe to run on every
/// startup.
pub fn initialize_db(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS doctor_credential (
          email TEXT PRIMARY KEY,
          doctor_id TEXT NOT NULL,
          access_token TEXT NOT NULL,
          refresh_token TEXT NOT NULL,
          token_expiry INTEGER NOT NULL,
          created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS appointment_audit (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          doctor_email TEXT NOT NULL,
          patient_email TEXT NOT NULL,
          first_name TEXT NOT NULL,
          last_name TEXT NOT NULL,
          slot_start TEXT NOT NULL,
          slot_end TEXT NOT NULL,
          event_id TEXT NOT NULL,
          status TEXT NOT NULL,
          created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_audit_doctor_email
          ON appointment_audit (doctor_email);
        CREATE INDEX IF NOT EXISTS idx_audit_patient_email
          ON appointment_audit (patient_email);
        ",
    )
}

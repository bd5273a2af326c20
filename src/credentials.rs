//! Doctor credential store and access-token lifecycle.
//!
//! One row per registered doctor, keyed by the account email derived at
//! registration time. Rows are upserted on re-authorization and never
//! deleted here.

use anyhow::{Result, anyhow};
use chrono::Utc;
use tokio_rusqlite::Connection;

use crate::core::AppConfig;
use crate::google::calendar::CalendarClient;
use crate::google::oauth::{exchange_code_for_token, refresh_access_token};

/// Refresh the access token when its remaining lifetime drops to this
/// many seconds or fewer.
pub const REFRESH_THRESHOLD_SECS: i64 = 60;

#[derive(Debug, Clone)]
pub struct DoctorCredential {
    pub doctor_id: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) at which the access token expires.
    pub token_expiry: i64,
}

pub async fn find_by_email(
    db: &Connection,
    email: &str,
) -> Result<Option<DoctorCredential>, anyhow::Error> {
    let email = email.to_string();
    let credential = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT doctor_id, email, access_token, refresh_token, token_expiry
                 FROM doctor_credential WHERE email = ?1",
            )?;
            let rows = stmt
                .query_map([&email], |i| {
                    Ok(DoctorCredential {
                        doctor_id: i.get(0)?,
                        email: i.get(1)?,
                        access_token: i.get(2)?,
                        refresh_token: i.get(3)?,
                        token_expiry: i.get(4)?,
                    })
                })?
                .filter_map(Result::ok)
                .collect::<Vec<_>>();
            Ok(rows.into_iter().next())
        })
        .await?;
    Ok(credential)
}

/// Insert or update the credential row for an email. Re-authorization
/// by the same account replaces the stored tokens in place.
pub async fn upsert(db: &Connection, credential: DoctorCredential) -> Result<(), anyhow::Error> {
    db.call(move |conn| {
        conn.execute(
            "INSERT INTO doctor_credential (email, doctor_id, access_token, refresh_token, token_expiry)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(email) DO UPDATE SET
               doctor_id = excluded.doctor_id,
               access_token = excluded.access_token,
               refresh_token = excluded.refresh_token,
               token_expiry = excluded.token_expiry",
            (
                &credential.email,
                &credential.doctor_id,
                &credential.access_token,
                &credential.refresh_token,
                credential.token_expiry,
            ),
        )?;
        Ok(())
    })
    .await?;
    Ok(())
}

async fn update_access_token(
    db: &Connection,
    email: &str,
    access_token: &str,
    token_expiry: i64,
) -> Result<(), anyhow::Error> {
    let email = email.to_string();
    let access_token = access_token.to_string();
    db.call(move |conn| {
        conn.execute(
            "UPDATE doctor_credential SET access_token = ?1, token_expiry = ?2 WHERE email = ?3",
            (&access_token, token_expiry, &email),
        )?;
        Ok(())
    })
    .await?;
    Ok(())
}

/// Return a usable access token for the credential, refreshing first
/// when the stored one is within [`REFRESH_THRESHOLD_SECS`] of expiry.
///
/// A refresh that the token endpoint rejects is logged and the stale
/// token returned anyway; the next calendar call then fails visibly
/// instead of this path deciding the request's fate. A new token is
/// only returned after it has been persisted.
pub async fn ensure_fresh(
    db: &Connection,
    config: &AppConfig,
    credential: &DoctorCredential,
) -> Result<String, anyhow::Error> {
    let remaining = credential.token_expiry - Utc::now().timestamp();
    if remaining > REFRESH_THRESHOLD_SECS {
        return Ok(credential.access_token.clone());
    }

    match refresh_access_token(
        &config.oauth_token_url,
        &config.google_client_id,
        &config.google_client_secret,
        &credential.refresh_token,
    )
    .await
    {
        Ok(token) => {
            let token_expiry = Utc::now().timestamp() + token.expires_in;
            update_access_token(db, &credential.email, &token.access_token, token_expiry).await?;
            tracing::info!(
                "Token refreshed successfully for doctor: {}",
                credential.doctor_id
            );
            Ok(token.access_token)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to refresh token for doctor {}: {}",
                credential.doctor_id,
                e
            );
            Ok(credential.access_token.clone())
        }
    }
}

/// Exchange an OAuth authorization code and persist a credential for
/// the doctor. The account email comes from the first entry of the
/// authorized account's calendar list.
pub async fn register_doctor(
    db: &Connection,
    config: &AppConfig,
    auth_code: &str,
    doctor_id: &str,
) -> Result<DoctorCredential, anyhow::Error> {
    let token = exchange_code_for_token(
        &config.oauth_token_url,
        &config.google_client_id,
        &config.google_client_secret,
        auth_code,
        &config.google_redirect_uri,
    )
    .await?;

    let refresh_token = token
        .refresh_token
        .clone()
        .ok_or(anyhow!("No refresh token in response"))?;

    let calendar = CalendarClient::new(&config.calendar_api_url, &token.access_token);
    let email = calendar.primary_calendar_email().await?;

    let credential = DoctorCredential {
        doctor_id: doctor_id.to_string(),
        email: email.clone(),
        access_token: token.access_token,
        refresh_token,
        token_expiry: Utc::now().timestamp() + token.expires_in,
    };
    upsert(db, credential.clone()).await?;

    tracing::info!(
        "Doctor {} successfully registered with email {}",
        doctor_id,
        email
    );
    Ok(credential)
}

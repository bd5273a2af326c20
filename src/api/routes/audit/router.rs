//! Router for the audit trail API

use std::sync::{Arc, RwLock};

use axum::{Json, Router, extract::State};
use axum_extra::extract::Query;
use http::StatusCode;

use super::public;
use crate::api::state::AppState;
use crate::audit::{find_by_doctor_email, find_by_patient_email};

type SharedState = Arc<RwLock<AppState>>;

async fn audit_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::AuditQuery>,
) -> Result<Json<Vec<public::AuditRecord>>, (StatusCode, String)> {
    let db = {
        let shared_state = state.read().expect("Unable to read shared state");
        shared_state.db.clone()
    };

    let records = if let Some(doctor_email) = &params.doctor_email {
        find_by_doctor_email(&db, doctor_email).await
    } else if let Some(patient_email) = &params.patient_email {
        find_by_patient_email(&db, patient_email).await
    } else {
        return Err((
            StatusCode::BAD_REQUEST,
            String::from("Either doctor_email or patient_email is required"),
        ));
    };

    let records = records.map_err(|e| {
        tracing::error!("Audit query failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Something went wrong: {}", e),
        )
    })?;
    Ok(Json(records))
}

/// Create the audit router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::get(audit_handler))
}

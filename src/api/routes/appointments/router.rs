//! Router for the appointments API

use std::sync::{Arc, RwLock};

use axum::{Json, Router, extract::State};
use axum_extra::extract::Query;
use http::StatusCode;

use super::public;
use crate::api::state::AppState;
use crate::credentials;
use crate::google::calendar::CalendarClient;
use crate::scheduling::SchedulerError;
use crate::scheduling::booking::{BookingOutcome, book_appointment};
use crate::scheduling::cancel::cancel_appointment;
use crate::scheduling::upcoming::list_upcoming_appointments;

type SharedState = Arc<RwLock<AppState>>;

/// Response bodies keep the original wire convention: `✅` marks
/// success and maps to 200, `❌` marks failure and maps to a 4xx.
async fn book_appointment_handler(
    State(state): State<SharedState>,
    Json(request): Json<public::AppointmentRequest>,
) -> (StatusCode, String) {
    let (db, config, locks) = {
        let shared_state = state.read().expect("Unable to read shared state");
        (
            shared_state.db.clone(),
            shared_state.config.clone(),
            shared_state.slot_locks.clone(),
        )
    };

    match book_appointment(&db, &config, &locks, &request).await {
        Ok(outcome) => {
            let status = match outcome {
                BookingOutcome::Booked { .. } | BookingOutcome::BookedIncomplete { .. } => {
                    StatusCode::OK
                }
                BookingOutcome::SlotInvalid | BookingOutcome::SlotUnavailable { .. } => {
                    StatusCode::CONFLICT
                }
            };
            (status, outcome.to_string())
        }
        Err(e) => {
            tracing::error!("Error while booking appointment: {:#}", e);
            (
                StatusCode::CONFLICT,
                format!("❌ Error while booking appointment: {}", e),
            )
        }
    }
}

async fn cancel_appointment_handler(
    State(state): State<SharedState>,
    Json(request): Json<public::CancelRequest>,
) -> (StatusCode, String) {
    let (db, config) = {
        let shared_state = state.read().expect("Unable to read shared state");
        (shared_state.db.clone(), shared_state.config.clone())
    };

    match cancel_appointment(&db, &config, &request).await {
        Ok(outcome) => {
            let status = match outcome {
                crate::scheduling::cancel::CancellationOutcome::NotFound => {
                    StatusCode::BAD_REQUEST
                }
                _ => StatusCode::OK,
            };
            (status, outcome.to_string())
        }
        Err(SchedulerError::Validation(msg)) => {
            (StatusCode::BAD_REQUEST, format!("❌ {}", msg))
        }
        Err(e) => {
            tracing::error!("Error while cancelling appointment: {:#}", e);
            (
                StatusCode::BAD_REQUEST,
                format!("❌ Error while cancelling appointment: {}", e),
            )
        }
    }
}

async fn upcoming_appointments_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::UpcomingQuery>,
) -> Result<Json<Vec<public::AppointmentSummary>>, crate::api::public::ApiError> {
    let (db, config) = {
        let shared_state = state.read().expect("Unable to read shared state");
        (shared_state.db.clone(), shared_state.config.clone())
    };

    let credential = credentials::find_by_email(&db, &params.doctor_email)
        .await?
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Doctor not registered or calendar access missing: {}",
                params.doctor_email
            )
        })?;
    let access_token = credentials::ensure_fresh(&db, &config, &credential).await?;
    let calendar = CalendarClient::new(&config.calendar_api_url, &access_token);

    let summaries = list_upcoming_appointments(&calendar).await?;
    Ok(Json(summaries))
}

/// Create the appointments router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/book-appointment",
            axum::routing::post(book_appointment_handler),
        )
        .route(
            "/cancel-appointment",
            axum::routing::post(cancel_appointment_handler),
        )
        .route(
            "/appointments",
            axum::routing::get(upcoming_appointments_handler),
        )
}

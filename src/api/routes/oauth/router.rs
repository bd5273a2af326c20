//! Router for doctor OAuth registration

use std::sync::{Arc, RwLock};

use axum::{Router, extract::State};
use axum_extra::extract::Query;

use super::public;
use crate::api::state::AppState;
use crate::core::AppConfig;
use crate::credentials::register_doctor;

type SharedState = Arc<RwLock<AppState>>;

const AUTH_BASE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const SCOPE: &str =
    "https://www.googleapis.com/auth/calendar https://www.googleapis.com/auth/gmail.send";

/// Build the Google consent URL for a doctor. `state` round-trips the
/// doctor id to the callback.
pub fn consent_url(config: &AppConfig, doctor_id: &str) -> String {
    format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent&state={}",
        AUTH_BASE_URL,
        urlencoding::encode(&config.google_client_id),
        urlencoding::encode(&config.google_redirect_uri),
        urlencoding::encode(SCOPE),
        urlencoding::encode(doctor_id)
    )
}

async fn login_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::LoginQuery>,
) -> String {
    let config = {
        let shared_state = state.read().expect("Unable to read shared state");
        shared_state.config.clone()
    };
    consent_url(&config, &params.doctor_id)
}

async fn callback_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::CallbackQuery>,
) -> String {
    let (db, config) = {
        let shared_state = state.read().expect("Unable to read shared state");
        (shared_state.db.clone(), shared_state.config.clone())
    };

    // `state` holds the doctor id
    match register_doctor(&db, &config, &params.code, &params.state).await {
        Ok(_) => String::from("✅ Doctor registered successfully"),
        Err(e) => {
            tracing::error!("Error registering doctor {}: {:#}", params.state, e);
            format!("❌ Failed to register doctor: {}", e)
        }
    }
}

/// Create the OAuth router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/login", axum::routing::get(login_handler))
        .route("/callback", axum::routing::get(callback_handler))
}

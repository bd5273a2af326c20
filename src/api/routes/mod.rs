//! API routes module

pub mod appointments;
pub mod audit;
pub mod oauth;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Booking, cancellation and upcoming appointments
        .nest("/api", appointments::router())
        // Audit trail queries
        .nest("/api/audit", audit::router())
        // OAuth registration for doctors
        .nest("/auth/google", oauth::router())
}

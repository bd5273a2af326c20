//! Test utilities for integration tests
use std::sync::{Arc, RwLock};

use axum::Router;

use clinic_scheduler::api::{AppState, app};
use clinic_scheduler::core::AppConfig;
use clinic_scheduler::core::db::{async_db, initialize_db};

/// Creates a test application router backed by a fresh database in a
/// temporary directory. Remote API base URLs point at an unroutable
/// port so any unexpected network call fails fast instead of hitting
/// Google.
pub async fn test_app() -> Router {
    // Keep the directory alive past this function; the SQLite file
    // must outlive the returned router.
    let dir = tempfile::tempdir()
        .expect("Failed to create temp dir")
        .keep();
    let db_path = dir.join("db");
    let db_path = db_path.to_str().unwrap();

    let db = async_db(db_path)
        .await
        .expect("Failed to connect to async db");
    db.call(|conn| {
        initialize_db(conn).expect("Failed to migrate db");
        Ok(())
    })
    .await
    .unwrap();

    let app_config = AppConfig {
        db_path: db_path.to_string(),
        google_client_id: String::from("test_client_id"),
        google_client_secret: String::from("test_client_secret"),
        google_redirect_uri: String::from("http://localhost:8080/auth/google/callback"),
        oauth_token_url: String::from("http://127.0.0.1:1/token"),
        calendar_api_url: String::from("http://127.0.0.1:1"),
        gmail_api_url: String::from("http://127.0.0.1:1"),
    };
    let app_state = AppState::new(db, app_config);
    app(Arc::new(RwLock::new(app_state)))
}

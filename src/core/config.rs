use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_uri: String,
    pub oauth_token_url: String,
    pub calendar_api_url: String,
    pub gmail_api_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("SCHED_STORAGE_PATH").unwrap_or("./".to_string());
        let db_path = format!("{}/db", storage_path);
        let google_client_id =
            env::var("SCHED_GOOGLE_CLIENT_ID").expect("Missing SCHED_GOOGLE_CLIENT_ID");
        let google_client_secret =
            env::var("SCHED_GOOGLE_CLIENT_SECRET").expect("Missing SCHED_GOOGLE_CLIENT_SECRET");
        let google_redirect_uri = env::var("SCHED_GOOGLE_REDIRECT_URI")
            .unwrap_or_else(|_| "http://localhost:8080/auth/google/callback".to_string());
        let oauth_token_url = env::var("SCHED_OAUTH_TOKEN_URL")
            .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string());
        let calendar_api_url = env::var("SCHED_CALENDAR_API_URL")
            .unwrap_or_else(|_| "https://www.googleapis.com/calendar/v3".to_string());
        let gmail_api_url = env::var("SCHED_GMAIL_API_URL")
            .unwrap_or_else(|_| "https://gmail.googleapis.com/gmail/v1".to_string());

        Self {
            db_path,
            google_client_id,
            google_client_secret,
            google_redirect_uri,
            oauth_token_url,
            calendar_api_url,
            gmail_api_url,
        }
    }
}

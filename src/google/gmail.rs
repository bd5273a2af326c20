//! Gmail API client for sending raw RFC 822 messages on behalf of the
//! authenticated account. MIME assembly lives in `crate::notify`; this
//! module only speaks the wire protocol.

use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct SendMessageRequest {
    raw: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageResponse {
    pub id: String,
    #[serde(rename = "threadId")]
    pub thread_id: Option<String>,
}

/// Send a fully assembled RFC 822 message as the authenticated user
/// (`users/me`). The message is base64url-encoded here.
pub async fn send_message(
    gmail_api_url: &str,
    access_token: &str,
    mime_message: &str,
) -> Result<SendMessageResponse, anyhow::Error> {
    let client = Client::new();
    let url = format!("{}/users/me/messages/send", gmail_api_url);
    let body = SendMessageRequest {
        raw: URL_SAFE.encode(mime_message.as_bytes()),
    };
    let res = client
        .post(&url)
        .bearer_auth(access_token)
        .json(&body)
        .send()
        .await?;
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    if !status.is_success() {
        anyhow::bail!("Send mail failed: {} ({})", status, text);
    }
    let sent: SendMessageResponse = serde_json::from_str(&text)?;
    Ok(sent)
}

//! Google OAuth token endpoint calls: authorization-code exchange and
//! access-token refresh. Both are single-shot, no retry; retry policy
//! belongs to the caller.

use reqwest::Client;
use serde::Deserialize;

/// Token endpoint response for both the code exchange and the refresh
/// grant. `refresh_token` is only present on the initial exchange.
#[derive(Debug, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
}

/// Exchange an authorization code for an access/refresh token pair.
pub async fn exchange_code_for_token(
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    code: &str,
    redirect_uri: &str,
) -> Result<OAuthToken, anyhow::Error> {
    let client = Client::new();
    let res = client
        .post(token_url)
        .form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri),
        ])
        .send()
        .await?;
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    if !status.is_success() {
        anyhow::bail!("Code exchange failed: {} ({})", status, text);
    }
    let token: OAuthToken = serde_json::from_str(&text)?;
    Ok(token)
}

/// Trade a stored refresh token for a new access token.
pub async fn refresh_access_token(
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<OAuthToken, anyhow::Error> {
    let client = Client::new();
    let res = client
        .post(token_url)
        .form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .send()
        .await?;
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    if !status.is_success() {
        anyhow::bail!("Token refresh failed: {} ({})", status, text);
    }
    let token: OAuthToken = serde_json::from_str(&text)?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exchange_code_for_token() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "access_token": "ya29.test",
                    "expires_in": 3599,
                    "refresh_token": "1//refresh",
                    "token_type": "Bearer",
                    "scope": "https://www.googleapis.com/auth/calendar"
                }"#,
            )
            .create_async()
            .await;

        let token = exchange_code_for_token(
            &format!("{}/token", server.url()),
            "client-id",
            "client-secret",
            "auth-code",
            "http://localhost:8080/auth/google/callback",
        )
        .await
        .unwrap();

        assert_eq!(token.access_token, "ya29.test");
        assert_eq!(token.expires_in, 3599);
        assert_eq!(token.refresh_token.as_deref(), Some("1//refresh"));
    }

    #[tokio::test]
    async fn test_refresh_access_token() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "ya29.fresh", "expires_in": 3600}"#)
            .create_async()
            .await;

        let token = refresh_access_token(
            &format!("{}/token", server.url()),
            "client-id",
            "client-secret",
            "1//refresh",
        )
        .await
        .unwrap();

        assert_eq!(token.access_token, "ya29.fresh");
        assert!(token.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_refresh_access_token_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error": "invalid_grant"}"#)
            .create_async()
            .await;

        let result = refresh_access_token(
            &format!("{}/token", server.url()),
            "client-id",
            "client-secret",
            "revoked",
        )
        .await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("invalid_grant"));
    }
}

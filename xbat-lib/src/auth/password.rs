//! Password flow (Resource Owner Password Credentials)

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::AccessToken;
use super::AuthFlow;
use crate::error::AuthError;

/// Timeout for the token exchange and the identity probe.
const AUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// OAuth2 Resource Owner Password Credentials flow against an XBAT
/// instance.
///
/// Issues tokens via `POST <base>/oauth/token` and probes them via
/// `GET <base>/api/v1/current_user`.
///
/// # Example
///
/// ```ignore
/// use xbat_lib::auth::{AuthFlow, PasswordFlow};
///
/// let flow = PasswordFlow::new("https://demo.xbat.dev", "demo", "demo", "demo");
/// let token = flow.authenticate().await?;
/// ```
#[derive(Clone)]
pub struct PasswordFlow {
    api_base: String,
    username: String,
    password: String,
    client_id: String,
    http_client: reqwest::Client,
}

impl PasswordFlow {
    /// Creates a new password flow.
    ///
    /// # Arguments
    ///
    /// * `api_base` - Base URL of the XBAT instance (a trailing slash is
    ///   stripped)
    /// * `username` - Username for the password grant
    /// * `password` - Corresponding password
    /// * `client_id` - OAuth client ID
    pub fn new(
        api_base: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            client_id: client_id.into(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Returns the base URL this flow talks to.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

#[async_trait]
impl AuthFlow for PasswordFlow {
    async fn authenticate(&self) -> Result<AccessToken, AuthError> {
        let params = [
            ("grant_type", "password"),
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
            ("client_id", self.client_id.as_str()),
        ];

        let response = self
            .http_client
            .post(format!("{}/oauth/token", self.api_base))
            .form(&params)
            .timeout(AUTH_TIMEOUT)
            .send()
            .await?;

        // The raw body is kept around: on a failed exchange it is the only
        // diagnostic signal the operator gets.
        let body = response.text().await?;

        let token = serde_json::from_str::<TokenResponse>(&body)
            .ok()
            .and_then(|parsed| parsed.access_token)
            .filter(|token| !token.is_empty());

        match token {
            Some(token) => {
                tracing::debug!("obtained a new access token");
                Ok(AccessToken::new(token))
            }
            None => Err(AuthError::TokenExchangeFailed { response: body }),
        }
    }

    async fn probe(&self, token: &AccessToken) -> bool {
        let result = self
            .http_client
            .get(format!("{}/api/v1/current_user", self.api_base))
            .bearer_auth(&token.access_token)
            .timeout(AUTH_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(err) => {
                tracing::debug!("token probe failed: {err}");
                false
            }
        }
    }
}

impl std::fmt::Debug for PasswordFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordFlow")
            .field("api_base", &self.api_base)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("client_id", &self.client_id)
            .finish()
    }
}

/// Token response from the XBAT authorization server.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

//! Authentication error types

/// Errors that can occur while obtaining an access token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token endpoint answered without a usable `access_token` field.
    ///
    /// Carries the raw response body so a misconfigured credential or an
    /// unreachable authorization server can be diagnosed by the operator.
    #[error("failed to obtain an access token; server response: {response}")]
    TokenExchangeFailed { response: String },

    /// Network error during the token exchange.
    #[error("network error during auth: {0}")]
    Network(#[from] reqwest::Error),
}

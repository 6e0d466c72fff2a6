//! AccessToken

/// An OAuth2 access token.
///
/// The XBAT token endpoint returns an opaque bearer token without
/// expiration metadata; validity is established by probing the identity
/// endpoint, not by inspecting the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The bearer token used for API authentication.
    pub access_token: String,
}

impl AccessToken {
    /// Creates a new access token from the raw token string.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    /// Returns the token as a bearer authorization header value.
    pub fn as_bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

//! AuthFlow trait

use async_trait::async_trait;

use super::AccessToken;
use crate::error::AuthError;

/// Trait for obtaining and probing access tokens.
///
/// Implemented by [`super::PasswordFlow`] for the real service; the
/// [`super::CredentialManager`] is generic over this seam so the token
/// lifecycle can be exercised without a network.
#[async_trait]
pub trait AuthFlow: Send + Sync {
    /// Obtains a fresh access token from the authorization server.
    ///
    /// This is a fatal, non-retried operation: a rejected credential will
    /// not fix itself.
    async fn authenticate(&self) -> Result<AccessToken, AuthError>;

    /// Returns `true` iff the server currently accepts `token`.
    ///
    /// Degrades to `false` on any non-200 response or transport failure;
    /// never raises.
    async fn probe(&self, token: &AccessToken) -> bool;
}

//! Credential lifecycle management.

use tracing::debug;
use tracing::warn;

use super::AccessToken;
use super::AuthFlow;
use crate::error::AuthError;
use crate::store::TokenStore;

/// Produces one usable credential per run.
///
/// Combines the token cache, the identity probe and the password grant
/// into a single operation:
/// - a cached token that still passes the probe is reused as-is
/// - otherwise exactly one token exchange is attempted
/// - a fresh token is written back to the cache before being returned;
///   the cache is advisory, so a failed write is logged, not fatal
///
/// Worst case per run is two round-trips: one probe, one exchange.
pub struct CredentialManager<F> {
    flow: F,
    store: TokenStore,
}

impl<F: AuthFlow> CredentialManager<F> {
    /// Creates a new credential manager over `flow`, caching in `store`.
    pub fn new(flow: F, store: TokenStore) -> Self {
        Self { flow, store }
    }

    /// Returns a credential the server currently accepts.
    ///
    /// Fails only when the token exchange itself fails; that failure is
    /// fatal for the run and is never retried.
    pub async fn get_token(&self) -> Result<AccessToken, AuthError> {
        let cached = match self.store.load().await {
            Ok(cached) => cached,
            Err(err) => {
                warn!("ignoring unreadable token cache: {err}");
                None
            }
        };

        if let Some(cached) = cached {
            if self.flow.probe(&cached).await {
                debug!("reusing cached access token");
                return Ok(cached);
            }
            debug!("cached access token rejected by server, requesting a new one");
        } else {
            debug!("no cached access token, requesting a new one");
        }

        let token = self.flow.authenticate().await?;

        if let Err(err) = self.store.save(&token).await {
            warn!("could not cache access token, continuing with in-memory token: {err}");
        }

        Ok(token)
    }
}

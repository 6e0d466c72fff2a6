//! XBAT measurement export client library
//!
//! Downloads CSV measurement exports for HPC jobs from an XBAT monitoring
//! service, handling the OAuth2 password-grant token lifecycle (cache,
//! probe, reissue) and an atomic temp-then-rename file download.

pub mod auth;
pub mod download;
pub mod error;
pub mod request;
pub mod store;

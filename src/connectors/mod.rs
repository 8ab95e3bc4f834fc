//! Connectors for the zbet backend.
//!
//! This module provides the low-level REST client and the bearer-token
//! storage it authenticates with. All data fetched here is raw and is
//! normalized through the session/events layers before use.

mod auth;
mod zbet;

pub use auth::{AuthToken, SessionToken, TokenStore, TokenStoreError};
pub use zbet::{ApiError, BalanceInfo, TokenStatus, ZbetApiClient};

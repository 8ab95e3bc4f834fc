//! Session ownership: the current user and the auth-token lifecycle.
//!
//! At most one user is materialized at a time. The user is present exactly
//! when the most recent backend check confirmed a valid token.

mod store;

pub use store::{SessionError, SessionHandle, SessionState, SessionStore};

use serde::{Deserialize, Serialize};

/// The authenticated user.
///
/// Replaced wholesale on login and session restore; cleared on logout.
/// Balance fields are merged in place by a balance refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    #[serde(default)]
    pub zcash_account: Option<String>,
    #[serde(default)]
    pub zcash_address: Option<String>,
    #[serde(default)]
    pub zcash_transparent_address: Option<String>,
    #[serde(default)]
    pub balance: Option<String>,
    #[serde(default)]
    pub transparent_balance: Option<f64>,
    #[serde(default)]
    pub shielded_balance: Option<f64>,
}

/// Payload for `POST /register/`.
#[derive(Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Payload for `POST /login/`.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for UserCreate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCreate")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

//! REST API client for the zbet backend.
//!
//! Provides access to:
//! - Auth endpoints: login, registration, token status, current user
//! - Events feed: betting events with their system payloads
//! - Wallet: balance refresh for the signed-in user

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::events::SportEvent;
use crate::session::{LoginCredentials, User, UserCreate};

use super::auth::{AuthToken, SessionToken};

/// Default API endpoint.
const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Authentication rejected: {0}")]
    Unauthorized(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// zbet API client for REST operations.
#[derive(Clone)]
pub struct ZbetApiClient {
    client: Client,
    base_url: String,
}

impl ZbetApiClient {
    /// Creates a new API client with the default endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_URL.to_string())
    }

    /// Creates a new API client with a custom endpoint.
    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchanges credentials for an access token via `POST /login/`.
    ///
    /// The endpoint takes an OAuth2 password form, not JSON.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthToken, ApiError> {
        debug!("Logging in as {}", credentials.username);

        let url = format!("{}/login/", self.base_url);
        let form = [
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];

        let response = self.client.post(&url).form(&form).send().await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            let message = response.text().await.unwrap_or_default();
            warn!("Login rejected for {}", credentials.username);
            return Err(ApiError::Unauthorized(message));
        }

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::ParseError(format!("Failed to parse login response: {}", e)))
    }

    /// Checks whether a stored token is still accepted by the backend.
    ///
    /// Returns `Ok(false)` for an expired or rejected token; transport
    /// failures are `Err`.
    pub async fn token_status(&self, token: &SessionToken) -> Result<bool, ApiError> {
        let url = format!("{}/token_status/", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token.secret())
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(false);
        }

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let status: TokenStatus = response.json().await.map_err(|e| {
            ApiError::ParseError(format!("Failed to parse token status: {}", e))
        })?;

        Ok(status.is_valid())
    }

    /// Fetches the user the token belongs to via `GET /users/me/`.
    pub async fn me(&self, token: &SessionToken) -> Result<User, ApiError> {
        let url = format!("{}/users/me/", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token.secret())
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Unauthorized(message));
        }

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::ParseError(format!("Failed to parse user: {}", e)))
    }

    /// Creates a new account via `POST /register/`.
    pub async fn register(&self, new_user: &UserCreate) -> Result<User, ApiError> {
        debug!("Registering {}", new_user.username);

        let url = format!("{}/register/", self.base_url);
        let response = self.client.post(&url).json(new_user).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::ParseError(format!("Failed to parse created user: {}", e)))
    }

    /// Fetches the betting-event feed via `GET /api/events`.
    pub async fn events(&self) -> Result<Vec<SportEvent>, ApiError> {
        let url = format!("{}/api/events", self.base_url);

        debug!("Fetching events feed");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::ParseError(format!("Failed to parse events feed: {}", e)))
    }

    /// Asks the wallet backend to recompute the user's balances.
    pub async fn refresh_balance(&self, token: &SessionToken) -> Result<BalanceInfo, ApiError> {
        let url = format!("{}/zcash/refresh-balance/", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token.secret())
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Unauthorized(message));
        }

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::ParseError(format!("Failed to parse balance: {}", e)))
    }
}

impl Default for ZbetApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Drains a failed response into an `ApiError::Api`.
async fn error_from_response(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    ApiError::Api { status, message }
}

// ============ Response Types ============

/// Body of `GET /token_status/`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenStatus {
    pub status: String,
}

impl TokenStatus {
    /// The backend reports `"valid"` or `"expired"`.
    pub fn is_valid(&self) -> bool {
        self.status == "valid"
    }
}

/// Balance fields returned by the wallet refresh endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceInfo {
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub transparent_balance: f64,
    #[serde(default)]
    pub shielded_balance: f64,
}

impl std::fmt::Debug for ZbetApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZbetApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_status_parsing() {
        let valid: TokenStatus = serde_json::from_str(r#"{"status": "valid"}"#).unwrap();
        assert!(valid.is_valid());

        let expired: TokenStatus = serde_json::from_str(r#"{"status": "expired"}"#).unwrap();
        assert!(!expired.is_valid());
    }

    #[test]
    fn test_balance_info_defaults_missing_fields() {
        let info: BalanceInfo = serde_json::from_str(r#"{"balance": 12.5}"#).unwrap();
        assert_eq!(info.balance, 12.5);
        assert_eq!(info.transparent_balance, 0.0);
        assert_eq!(info.shielded_balance, 0.0);
    }

    #[test]
    fn test_auth_token_parsing() {
        let token: AuthToken =
            serde_json::from_str(r#"{"access_token": "abc", "token_type": "bearer"}"#).unwrap();
        assert_eq!(token.session_token().secret(), "abc");
        assert_eq!(token.token_type, "bearer");
    }

    #[test]
    fn test_client_debug_omits_internals() {
        let client = ZbetApiClient::with_base_url("http://example.invalid".to_string());
        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("http://example.invalid"));
    }
}

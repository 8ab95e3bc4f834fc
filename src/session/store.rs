//! Session store: the client-side authentication state machine.
//!
//! States: `Unchecked` -> `Checking` -> {`Authenticated`, `Unauthenticated`};
//! `Authenticated` -> `Unauthenticated` on logout or a failed restore.
//!
//! Auth failures during a restore resolve to `Unauthenticated` with a
//! logged diagnostic; they never surface as errors and never take the
//! process down. Every other failure is terminal for its operation: the
//! caller re-invokes explicitly, there is no retry.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::connectors::{ApiError, SessionToken, TokenStore, TokenStoreError, ZbetApiClient};

use super::{LoginCredentials, User, UserCreate};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("API call failed: {0}")]
    Api(#[from] ApiError),

    #[error("Token storage failed: {0}")]
    Token(#[from] TokenStoreError),

    #[error("No user logged in")]
    NoUser,

    #[error("Another session operation is in flight")]
    OperationInFlight,
}

/// Authentication state of the session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No restore attempt has run yet.
    Unchecked,
    /// A stored token is being validated against the backend.
    Checking,
    Authenticated,
    Unauthenticated,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated)
    }
}

/// Owns the current user and drives the auth state machine.
///
/// Constructed explicitly with its connector and token slot and passed to
/// whoever needs it; there is no global instance. Invariant: `user` is
/// `Some` exactly when `state` is `Authenticated`.
pub struct SessionStore {
    api: ZbetApiClient,
    tokens: TokenStore,
    user: Option<User>,
    state: SessionState,
    initialized: bool,
}

impl SessionStore {
    /// Creates a store in the `Unchecked` state.
    pub fn new(api: ZbetApiClient, tokens: TokenStore) -> Self {
        Self {
            api,
            tokens,
            user: None,
            state: SessionState::Unchecked,
            initialized: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// Restores a persisted session, at most once per store lifetime.
    ///
    /// No stored token: resolves to `Unauthenticated` without touching the
    /// network. Stored token: validates it and fetches the user; on any
    /// failure the token is discarded and the store resolves to
    /// `Unauthenticated`. Subsequent calls are no-ops.
    pub async fn initialize(&mut self) -> Result<(), SessionError> {
        if self.initialized {
            debug!("Session already initialized, skipping restore");
            return Ok(());
        }
        self.initialized = true;

        let token = match self.tokens.load() {
            Ok(token) => token,
            Err(e) => {
                warn!("Stored token unreadable: {}", e);
                self.discard_token();
                self.state = SessionState::Unauthenticated;
                return Ok(());
            }
        };

        let Some(token) = token else {
            debug!("No stored token, starting unauthenticated");
            self.state = SessionState::Unauthenticated;
            return Ok(());
        };

        self.state = SessionState::Checking;
        info!("Validating stored session token");

        match self.validate_and_fetch(&token).await {
            Ok(user) => {
                info!("Session restored for {}", user.username);
                self.user = Some(user);
                self.state = SessionState::Authenticated;
            }
            Err(e) => {
                warn!("Stored session rejected: {}", e);
                self.discard_token();
                self.state = SessionState::Unauthenticated;
            }
        }

        Ok(())
    }

    /// Exchanges credentials for a session.
    ///
    /// On success the token is persisted and the user is fetched and
    /// stored. On failure the state is left unchanged and the error is
    /// returned to the caller.
    pub async fn login(&mut self, credentials: &LoginCredentials) -> Result<(), SessionError> {
        let auth = self.api.login(credentials).await?;
        self.tokens.store(&auth)?;

        let user = self.api.me(&auth.session_token()).await?;
        info!("Logged in as {}", user.username);

        self.user = Some(user);
        self.state = SessionState::Authenticated;
        Ok(())
    }

    /// Creates an account, then logs in with the same credentials.
    ///
    /// Failure of either step surfaces to the caller; no partial session
    /// state is retained.
    pub async fn register(&mut self, new_user: &UserCreate) -> Result<(), SessionError> {
        let created = self.api.register(new_user).await?;
        info!("Registered {}", created.username);

        let credentials = LoginCredentials {
            username: new_user.username.clone(),
            password: new_user.password.clone(),
        };
        self.login(&credentials).await
    }

    /// Drops the session synchronously: clears the token slot and the
    /// in-memory user. No backend call.
    pub fn logout(&mut self) {
        self.discard_token();
        self.user = None;
        self.state = SessionState::Unauthenticated;
        info!("Logged out");
    }

    /// Re-reads wallet balances and merges them into the current user.
    ///
    /// Partial update: identity fields are untouched. Fails with `NoUser`
    /// when nobody is logged in, leaving the state as it was.
    pub async fn refresh_balance(&mut self) -> Result<(), SessionError> {
        if self.user.is_none() {
            return Err(SessionError::NoUser);
        }

        let token = self.tokens.load()?.ok_or(SessionError::NoUser)?;
        let balances = self.api.refresh_balance(&token).await?;

        if let Some(user) = self.user.as_mut() {
            user.balance = Some(format!("{}", balances.balance));
            user.transparent_balance = Some(balances.transparent_balance);
            user.shielded_balance = Some(balances.shielded_balance);
            debug!(
                "Balance refreshed for {}: {} ZEC",
                user.username, balances.balance
            );
        }

        Ok(())
    }

    async fn validate_and_fetch(&self, token: &SessionToken) -> Result<User, SessionError> {
        let valid = self.api.token_status(token).await?;
        if !valid {
            return Err(SessionError::Api(ApiError::Unauthorized(
                "token expired".to_string(),
            )));
        }
        Ok(self.api.me(token).await?)
    }

    fn discard_token(&mut self) {
        if let Err(e) = self.tokens.clear() {
            warn!("Failed to clear token slot: {}", e);
        }
    }
}

/// Cloneable handle sharing one session store across call sites.
///
/// Operations reach the store through `try_lock`: a second call arriving
/// while one is still in flight fails fast with `OperationInFlight`
/// instead of interleaving with it. The slot is released when the pending
/// operation resolves (or its future is dropped); nothing queues.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionStore>>,
}

impl SessionHandle {
    pub fn new(store: SessionStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub async fn initialize(&self) -> Result<(), SessionError> {
        let mut store = self.claim()?;
        store.initialize().await
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<(), SessionError> {
        let mut store = self.claim()?;
        store.login(credentials).await
    }

    pub async fn register(&self, new_user: &UserCreate) -> Result<(), SessionError> {
        let mut store = self.claim()?;
        store.register(new_user).await
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        let mut store = self.claim()?;
        store.logout();
        Ok(())
    }

    pub async fn refresh_balance(&self) -> Result<(), SessionError> {
        let mut store = self.claim()?;
        store.refresh_balance().await
    }

    /// Snapshot of the current state; fails while an operation holds the slot.
    pub fn state(&self) -> Result<SessionState, SessionError> {
        Ok(self.claim()?.state())
    }

    /// Clone of the current user, if any; fails while an operation holds
    /// the slot.
    pub fn current_user(&self) -> Result<Option<User>, SessionError> {
        Ok(self.claim()?.user().cloned())
    }

    pub fn is_authenticated(&self) -> Result<bool, SessionError> {
        Ok(self.claim()?.is_authenticated())
    }

    fn claim(&self) -> Result<tokio::sync::MutexGuard<'_, SessionStore>, SessionError> {
        self.inner
            .try_lock()
            .map_err(|_| SessionError::OperationInFlight)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state)
            .field("has_user", &self.user.is_some())
            .field("initialized", &self.initialized)
            .finish()
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::AuthToken;

    fn unreachable_api() -> ZbetApiClient {
        // Nothing listens on port 1; requests fail fast with a connect error.
        ZbetApiClient::with_base_url("http://127.0.0.1:1".to_string())
    }

    fn store_in(dir: &tempfile::TempDir) -> TokenStore {
        TokenStore::new(dir.path().join("session-token.json"))
    }

    fn seeded_token() -> AuthToken {
        AuthToken {
            access_token: "stale-token".to_string(),
            token_type: "bearer".to_string(),
        }
    }

    #[tokio::test]
    async fn test_initialize_without_token_is_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionStore::new(unreachable_api(), store_in(&dir));

        assert_eq!(session.state(), SessionState::Unchecked);
        session.initialize().await.unwrap();
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert!(session.user().is_none());
    }

    #[tokio::test]
    async fn test_initialize_runs_at_most_once() {
        let dir = tempfile::tempdir().unwrap();
        let tokens = store_in(&dir);
        let mut session = SessionStore::new(unreachable_api(), tokens.clone());

        session.initialize().await.unwrap();
        assert_eq!(session.state(), SessionState::Unauthenticated);

        // A token appearing later must not be picked up by a re-run.
        tokens.store(&seeded_token()).unwrap();
        session.initialize().await.unwrap();
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert!(session.user().is_none());
    }

    #[tokio::test]
    async fn test_initialize_discards_unvalidatable_token() {
        let dir = tempfile::tempdir().unwrap();
        let tokens = store_in(&dir);
        tokens.store(&seeded_token()).unwrap();

        let mut session = SessionStore::new(unreachable_api(), tokens.clone());
        session.initialize().await.unwrap();

        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert!(tokens.load().unwrap().is_none(), "token slot should be cleared");
    }

    #[tokio::test]
    async fn test_initialize_discards_corrupt_slot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session-token.json");
        std::fs::write(&path, "not json").unwrap();

        let tokens = TokenStore::new(&path);
        let mut session = SessionStore::new(unreachable_api(), tokens.clone());
        session.initialize().await.unwrap();

        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert!(tokens.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_token_and_user() {
        let dir = tempfile::tempdir().unwrap();
        let tokens = store_in(&dir);
        tokens.store(&seeded_token()).unwrap();

        let mut session = SessionStore::new(unreachable_api(), tokens.clone());
        session.logout();

        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert!(session.user().is_none());
        assert!(tokens.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_refresh_balance_without_user_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionStore::new(unreachable_api(), store_in(&dir));

        let err = session.refresh_balance().await.unwrap_err();
        assert!(matches!(err, SessionError::NoUser));
        // State is untouched by the failed call.
        assert_eq!(session.state(), SessionState::Unchecked);
    }

    #[tokio::test]
    async fn test_handle_rejects_overlapping_operations() {
        // A listener that accepts connections but never answers keeps the
        // first operation in flight while the second one arrives.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let api = ZbetApiClient::with_base_url(format!("http://{}", addr));
        let handle = SessionHandle::new(SessionStore::new(api, store_in(&dir)));

        let pending = {
            let handle = handle.clone();
            tokio::spawn(async move {
                let credentials = LoginCredentials {
                    username: "peely".to_string(),
                    password: "hunter2".to_string(),
                };
                let _ = handle.login(&credentials).await;
            })
        };

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let err = handle.refresh_balance().await.unwrap_err();
        assert!(matches!(err, SessionError::OperationInFlight));
        assert!(matches!(
            handle.state(),
            Err(SessionError::OperationInFlight)
        ));

        pending.abort();
        drop(listener);
    }

    #[tokio::test]
    async fn test_handle_snapshot_accessors() {
        let dir = tempfile::tempdir().unwrap();
        let handle = SessionHandle::new(SessionStore::new(unreachable_api(), store_in(&dir)));

        handle.initialize().await.unwrap();
        assert_eq!(handle.state().unwrap(), SessionState::Unauthenticated);
        assert!(!handle.is_authenticated().unwrap());
        assert!(handle.current_user().unwrap().is_none());

        handle.logout().unwrap();
        assert_eq!(handle.state().unwrap(), SessionState::Unauthenticated);
    }
}

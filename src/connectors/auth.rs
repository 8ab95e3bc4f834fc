//! Bearer-token handling for the zbet API.
//!
//! The backend issues an opaque access token on login; the client keeps it
//! in a single named slot on disk so a session survives process restarts.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("Failed to read token slot: {0}")]
    Read(std::io::Error),
    #[error("Failed to write token slot: {0}")]
    Write(std::io::Error),
    #[error("Token slot contents are invalid: {0}")]
    Invalid(serde_json::Error),
}

/// Access token as returned by `POST /login/`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
}

impl AuthToken {
    /// Wraps the access token as a bearer credential for requests.
    pub fn session_token(&self) -> SessionToken {
        SessionToken::new(self.access_token.clone())
    }
}

/// Opaque bearer credential proving an authenticated session.
#[derive(Clone)]
pub struct SessionToken {
    secret: String,
}

impl SessionToken {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Returns the raw token for the Authorization header.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

/// Persistent storage for the session token.
///
/// One named slot (a file path); a missing slot means no stored session.
#[derive(Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store backed by the given slot path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the slot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored token, if any.
    ///
    /// A missing slot is not an error; a slot that exists but cannot be
    /// parsed is.
    pub fn load(&self) -> Result<Option<SessionToken>, TokenStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(TokenStoreError::Read)?;
        let token: AuthToken =
            serde_json::from_str(&contents).map_err(TokenStoreError::Invalid)?;
        Ok(Some(token.session_token()))
    }

    /// Persists the token, replacing any previous one.
    pub fn store(&self, token: &AuthToken) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(TokenStoreError::Write)?;
            }
        }

        let json = serde_json::to_string_pretty(token).map_err(TokenStoreError::Invalid)?;
        self.write_slot(json.as_bytes())
    }

    /// Removes the stored token. A missing slot is a no-op.
    pub fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TokenStoreError::Write(e)),
        }
    }

    #[cfg(unix)]
    fn write_slot(&self, contents: &[u8]) -> Result<(), TokenStoreError> {
        use std::io::Write as _;
        use std::os::unix::fs::OpenOptionsExt;

        // The slot holds a live credential; keep it owner-readable only.
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(&self.path)
            .map_err(TokenStoreError::Write)?;
        file.write_all(contents).map_err(TokenStoreError::Write)
    }

    #[cfg(not(unix))]
    fn write_slot(&self, contents: &[u8]) -> Result<(), TokenStoreError> {
        fs::write(&self.path, contents).map_err(TokenStoreError::Write)
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .finish()
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_token() -> AuthToken {
        AuthToken {
            access_token: "eyJhbGciOiJIUzI1NiJ9.secret-payload".to_string(),
            token_type: "bearer".to_string(),
        }
    }

    #[test]
    fn test_token_debug_redacts() {
        let token = sample_token();
        let debug_str = format!("{:?}", token);
        assert!(!debug_str.contains("secret-payload"));
        assert!(debug_str.contains("[REDACTED]"));

        let session = token.session_token();
        let debug_str = format!("{:?}", session);
        assert!(!debug_str.contains("secret-payload"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_store_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("session-token.json"));

        assert!(store.load().unwrap().is_none());

        store.store(&sample_token()).unwrap();
        let loaded = store.load().unwrap().expect("token should be stored");
        assert_eq!(loaded.secret(), "eyJhbGciOiJIUzI1NiJ9.secret-payload");
    }

    #[test]
    fn test_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested/slots/token.json"));

        store.store(&sample_token()).unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn test_clear_removes_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("session-token.json"));

        store.store(&sample_token()).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        // Clearing an already-empty slot is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_slot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session-token.json");
        std::fs::write(&path, "not json").unwrap();

        let store = TokenStore::new(path);
        assert!(matches!(store.load(), Err(TokenStoreError::Invalid(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_slot_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session-token.json");
        let store = TokenStore::new(&path);

        store.store(&sample_token()).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

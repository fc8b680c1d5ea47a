use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaffUser {
    pub username: String,
    pub role: String,
}

/// What `/api/auth/login` answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: StaffUser,
}

/// Holds the bearer token for the session and mirrors it to a file so it
/// survives console restarts, the way the browser build kept it in local
/// storage. Login writes it; logout and any authentication failure clear it.
#[derive(Debug)]
pub struct TokenStore {
    path: Option<PathBuf>,
    token: RwLock<Option<String>>,
}

impl TokenStore {
    /// A store with no persistence; used by tests and one-shot commands.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            token: RwLock::new(None),
        }
    }

    /// A store backed by a token file, loading any token already on disk.
    pub fn at_path(path: PathBuf) -> Self {
        let existing = fs::read_to_string(&path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self {
            path: Some(path),
            token: RwLock::new(existing),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().expect("token lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn set(&self, token: &str) {
        *self.token.write().expect("token lock poisoned") = Some(token.to_string());
        if let Some(path) = &self.path {
            if let Err(err) = fs::write(path, token) {
                tracing::warn!(?path, %err, "failed to persist token");
            }
        }
    }

    /// Drop the token from memory and disk. Called on logout and whenever
    /// the backend answers with an authentication failure.
    pub fn clear(&self) {
        *self.token.write().expect("token lock poisoned") = None;
        if let Some(path) = &self.path {
            if path.exists() {
                if let Err(err) = fs::remove_file(path) {
                    tracing::warn!(?path, %err, "failed to remove token file");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_roundtrip() {
        let store = TokenStore::in_memory();
        assert!(!store.is_authenticated());

        store.set("abc123");
        assert_eq!(store.token().as_deref(), Some("abc123"));

        store.clear();
        assert!(store.token().is_none());
    }

    #[test]
    fn file_backed_store_persists_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");

        let store = TokenStore::at_path(path.clone());
        assert!(!store.is_authenticated());

        store.set("jwt-value");
        assert_eq!(fs::read_to_string(&path).unwrap(), "jwt-value");

        // A fresh store picks the token back up.
        let reopened = TokenStore::at_path(path.clone());
        assert_eq!(reopened.token().as_deref(), Some("jwt-value"));

        reopened.clear();
        assert!(!path.exists());
        assert!(TokenStore::at_path(path).token().is_none());
    }
}

//! Credential and session store
//!
//! File-backed port of the demo's client-side role gate: a hardcoded seed
//! table merged with a persisted user table, plaintext password checks, and
//! a session file holding the current role. This gates UI navigation only,
//! never the transform service, and must not be reproduced in a real
//! system (no hashing, no rate limiting, no expiry).

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const USERS_FILE: &str = "users.json";
const SESSION_FILE: &str = "session.json";

/// Error types for credential operations
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Username/Email already exists")]
    AlreadyExists,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Credential store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize credential data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Role gating which UI views are reachable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

/// One stored credential record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub password: String,
    pub role: Role,
}

/// Hardcoded seed accounts (demo admin and test user)
fn seed_users() -> HashMap<String, UserRecord> {
    HashMap::from([
        (
            "admin@gmail.com".to_string(),
            UserRecord { password: "1204".to_string(), role: Role::Admin },
        ),
        (
            "usha@gmail.com".to_string(),
            UserRecord { password: "1234".to_string(), role: Role::User },
        ),
    ])
}

/// Session state persisted between CLI invocations
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionState {
    role: Option<Role>,
}

/// Store rooted at a state directory
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    /// Open a store at the given state directory (created on first write).
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Platform-default state directory
    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("srcveil")
    }

    /// Seed table merged with persisted registrations.
    ///
    /// Persisted entries take precedence over seed duplicates. An unreadable
    /// or corrupt user file degrades to the seed table alone.
    pub fn all_users(&self) -> HashMap<String, UserRecord> {
        let mut users = seed_users();
        let path = self.dir.join(USERS_FILE);
        if let Ok(content) = fs::read_to_string(&path) {
            match serde_json::from_str::<HashMap<String, UserRecord>>(&content) {
                Ok(stored) => users.extend(stored),
                Err(e) => tracing::warn!("Ignoring corrupt user file {}: {}", path.display(), e),
            }
        }
        users
    }

    /// Register a new user with the default `user` role.
    ///
    /// Usernames are compared case-insensitively against the merged table;
    /// a duplicate is rejected and the table is left unchanged.
    pub fn register(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let mut users = self.all_users();
        let key = username.to_lowercase();

        if users.contains_key(&key) {
            return Err(AuthError::AlreadyExists);
        }

        users.insert(
            key,
            UserRecord { password: password.to_string(), role: Role::User },
        );

        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(USERS_FILE), serde_json::to_string_pretty(&users)?)?;
        Ok(())
    }

    /// Validate a username/password pair, returning the stored role.
    pub fn validate(&self, username: &str, password: &str) -> Result<Role, AuthError> {
        let users = self.all_users();
        match users.get(&username.to_lowercase()) {
            Some(record) if record.password == password => Ok(record.role),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    /// Persist the current session role.
    pub fn set_role(&self, role: Role) -> Result<(), AuthError> {
        fs::create_dir_all(&self.dir)?;
        let state = SessionState { role: Some(role) };
        fs::write(self.dir.join(SESSION_FILE), serde_json::to_string_pretty(&state)?)?;
        Ok(())
    }

    /// Clear the current session role.
    pub fn clear_role(&self) -> Result<(), AuthError> {
        let path = self.dir.join(SESSION_FILE);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Read the current session role, if any.
    pub fn current_role(&self) -> Result<Option<Role>, AuthError> {
        let path = self.dir.join(SESSION_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let state: SessionState = serde_json::from_str(&fs::read_to_string(path)?)?;
        Ok(state.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, CredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::open(dir.path().join("state"));
        (dir, store)
    }

    #[test]
    fn test_seed_users_present() {
        let (_tmp, store) = store();
        let users = store.all_users();
        assert_eq!(users.len(), 2);
        assert_eq!(users["admin@gmail.com"].role, Role::Admin);
        assert_eq!(users["usha@gmail.com"].role, Role::User);
    }

    #[test]
    fn test_validate_seed_credentials() {
        let (_tmp, store) = store();
        assert_eq!(store.validate("admin@gmail.com", "1204").unwrap(), Role::Admin);
        assert_eq!(store.validate("ADMIN@GMAIL.COM", "1204").unwrap(), Role::Admin);
        assert!(matches!(
            store.validate("admin@gmail.com", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            store.validate("nobody@gmail.com", "1204"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_register_then_validate() {
        let (_tmp, store) = store();
        store.register("New@Example.com", "secret").unwrap();
        assert_eq!(store.validate("new@example.com", "secret").unwrap(), Role::User);
    }

    #[test]
    fn test_register_rejects_duplicates_case_insensitively() {
        let (_tmp, store) = store();
        let err = store.register("Admin@Gmail.com", "other").unwrap_err();
        assert!(matches!(err, AuthError::AlreadyExists));
        // rejection leaves the table unchanged
        assert_eq!(store.all_users().len(), 2);
        assert_eq!(store.validate("admin@gmail.com", "1204").unwrap(), Role::Admin);
    }

    #[test]
    fn test_persisted_entry_overrides_seed() {
        let (_tmp, store) = store();
        std::fs::create_dir_all(&store.dir).unwrap();
        let overridden = HashMap::from([(
            "usha@gmail.com".to_string(),
            UserRecord { password: "changed".to_string(), role: Role::User },
        )]);
        std::fs::write(
            store.dir.join(USERS_FILE),
            serde_json::to_string(&overridden).unwrap(),
        )
        .unwrap();

        assert!(store.validate("usha@gmail.com", "1234").is_err());
        assert_eq!(store.validate("usha@gmail.com", "changed").unwrap(), Role::User);
    }

    #[test]
    fn test_corrupt_user_file_degrades_to_seed() {
        let (_tmp, store) = store();
        std::fs::create_dir_all(&store.dir).unwrap();
        std::fs::write(store.dir.join(USERS_FILE), "not json").unwrap();
        assert_eq!(store.all_users().len(), 2);
    }

    #[test]
    fn test_session_role_lifecycle() {
        let (_tmp, store) = store();
        assert_eq!(store.current_role().unwrap(), None);
        store.set_role(Role::Admin).unwrap();
        assert_eq!(store.current_role().unwrap(), Some(Role::Admin));
        store.clear_role().unwrap();
        assert_eq!(store.current_role().unwrap(), None);
        // clearing an already-clear session is fine
        store.clear_role().unwrap();
    }
}

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::app::{BylineError, Result};
use crate::domain::{Avatar, Email, Profile, Username};
use crate::session::{Credential, LoggedInUser};

/// The persisted session blob: `{email, username, bio, avatar, token}`.
///
/// Written on every successful auth-affecting action, erased on logout,
/// read once at startup. The token stays private to the session module.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUser {
    email: Email,
    bio: Option<String>,
    avatar: Option<String>,
    // Flattened to {username, token}; the secret never leaves Credential.
    #[serde(flatten)]
    credential: Credential,
}

impl StoredUser {
    /// Decode the raw blob. Corrupt persisted state degrades to `None`
    /// (logged out) rather than surfacing an error; it is not actionable
    /// by the user.
    pub fn decode(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(stored) => Some(stored),
            Err(e) => {
                tracing::warn!(error = %e, "discarding corrupt persisted session");
                None
            }
        }
    }

    pub fn username(&self) -> &Username {
        self.credential.username()
    }
}

impl From<&LoggedInUser> for StoredUser {
    fn from(user: &LoggedInUser) -> Self {
        Self {
            email: user.email().clone(),
            bio: user.profile().bio().map(String::from),
            avatar: user.profile().avatar().custom_url().map(String::from),
            credential: user.credential().clone(),
        }
    }
}

impl From<StoredUser> for LoggedInUser {
    fn from(stored: StoredUser) -> Self {
        let profile = Profile::new(
            stored.credential.username().clone(),
            stored.bio,
            Avatar::new(stored.avatar),
        );
        LoggedInUser::new(stored.credential, stored.email, profile)
    }
}

impl fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredUser")
            .field("email", &self.email)
            .field("credential", &self.credential)
            .finish()
    }
}

/// File-backed durable storage for the session blob.
///
/// Exactly one writer per client instance; other instances observe external
/// writes through [`subscribe`](SessionStore::subscribe) and re-derive their
/// session from the new value as a full replacement, never a merge.
pub struct SessionStore {
    path: PathBuf,
    tx: watch::Sender<Option<StoredUser>>,
}

impl SessionStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            path: path.into(),
            tx,
        }
    }

    pub fn at_default_path() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| BylineError::Config("Could not find data directory".into()))?;
        let byline_dir = data_dir.join("byline");
        std::fs::create_dir_all(&byline_dir)?;
        Ok(Self::open(byline_dir.join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the blob once at startup. Missing or corrupt ⇒ `None`.
    pub fn load(&self) -> Option<StoredUser> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        StoredUser::decode(&raw)
    }

    /// Write-through on every successful login/register/profile update.
    pub fn store(&self, user: &LoggedInUser) -> Result<()> {
        let stored = StoredUser::from(user);
        let raw = serde_json::to_string(&stored)
            .map_err(|e| BylineError::decode("session blob", e))?;
        std::fs::write(&self.path, raw)?;
        self.tx.send_replace(Some(stored));
        Ok(())
    }

    /// Erase the blob and notify subscribers.
    pub fn logout(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.tx.send_replace(None);
        Ok(())
    }

    /// Observe storage changes. Receivers fold each new value into their
    /// session on their own event loop; they never read the file directly.
    pub fn subscribe(&self) -> watch::Receiver<Option<StoredUser>> {
        self.tx.subscribe()
    }

    /// Re-read the blob and broadcast it, for folding in writes made by
    /// another client instance.
    pub fn reload(&self) {
        self.tx.send_replace(self.load());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> LoggedInUser {
        let username = Username::parse("jake").unwrap();
        let profile = Profile::new(username.clone(), Some("bio".into()), Avatar::new(None));
        LoggedInUser::new(
            Credential::new(username, "tok-123".into()),
            Email::parse("jake@statefarm.com").unwrap(),
            profile,
        )
    }

    fn temp_store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("session.json"));
        (dir, store)
    }

    #[test]
    fn test_load_missing_file_is_logged_out() {
        let (_dir, store) = temp_store();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_store_then_load_round_trips() {
        let (_dir, store) = temp_store();
        store.store(&sample_user()).unwrap();

        let stored = store.load().unwrap();
        assert_eq!(stored.username().as_str(), "jake");
    }

    #[test]
    fn test_corrupt_blob_degrades_to_logged_out() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_logout_erases_blob() {
        let (_dir, store) = temp_store();
        store.store(&sample_user()).unwrap();
        store.logout().unwrap();
        assert!(store.load().is_none());
        // Idempotent when nothing is stored.
        store.logout().unwrap();
    }

    #[test]
    fn test_subscribers_observe_store_and_logout() {
        let (_dir, store) = temp_store();
        let mut rx = store.subscribe();
        assert!(rx.borrow().is_none());

        store.store(&sample_user()).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update()
                .as_ref()
                .map(|s| s.username().as_str().to_string()),
            Some("jake".to_string())
        );

        store.logout().unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_none());
    }

    #[test]
    fn test_reload_broadcasts_external_writes() {
        let (_dir, store) = temp_store();
        let mut rx = store.subscribe();

        // Another client instance wrote the blob behind our back.
        let raw = serde_json::json!({
            "email": "jake@statefarm.com",
            "username": "jake",
            "bio": null,
            "avatar": null,
            "token": "tok-456",
        })
        .to_string();
        std::fs::write(store.path(), raw).unwrap();

        store.reload();
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update()
                .as_ref()
                .map(|s| s.username().as_str().to_string()),
            Some("jake".to_string())
        );
    }

    #[test]
    fn test_stored_user_debug_redacts_token() {
        let stored = StoredUser::from(&sample_user());
        let rendered = format!("{:?}", stored);
        assert!(!rendered.contains("tok-123"));
    }
}

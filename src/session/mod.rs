pub mod credential;
pub mod storage;

use chrono::FixedOffset;
use serde_json::Value;

use crate::app::{BylineError, Result};
use crate::domain::{Avatar, Email, Profile, Username};

pub use credential::Credential;
pub use storage::{SessionStore, StoredUser};

/// The active authenticated identity: credential plus the profile and email
/// the server reported for it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedInUser {
    credential: Credential,
    email: Email,
    profile: Profile,
}

impl LoggedInUser {
    pub fn new(credential: Credential, email: Email, profile: Profile) -> Self {
        Self {
            credential,
            email,
            profile,
        }
    }

    /// Decode the `user` resource returned by login/register/settings:
    /// `{email, token, username, bio, image}`.
    pub fn decode(value: &Value) -> Result<Self> {
        #[derive(serde::Deserialize)]
        struct UserDto {
            email: Email,
            token: String,
            username: Username,
            bio: Option<String>,
            image: Option<String>,
        }

        let dto: UserDto =
            serde_json::from_value(value.clone()).map_err(|e| BylineError::decode("user", e))?;
        let profile = Profile::new(dto.username.clone(), dto.bio, Avatar::new(dto.image));
        Ok(Self {
            credential: Credential::new(dto.username, dto.token),
            email: dto.email,
            profile,
        })
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn username(&self) -> &Username {
        self.credential.username()
    }
}

/// What an externally observed storage change did to the session. A
/// `SignedOut` transition is the caller's cue to redirect home.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    SignedIn,
    SignedOut,
    Updated,
    Unchanged,
}

/// Process-wide holder of the viewer's time zone and, when signed in, the
/// logged-in user. One live instance per running client, threaded through
/// the event loop; every transition replaces the user wholesale.
#[derive(Debug, Clone)]
pub struct Session {
    time_zone: FixedOffset,
    user: Option<LoggedInUser>,
}

impl Session {
    pub fn new(time_zone: FixedOffset, user: Option<LoggedInUser>) -> Self {
        Self { time_zone, user }
    }

    /// Build a session from the raw persisted blob. Any decode failure
    /// degrades to a logged-out session; it never propagates.
    pub fn restore(time_zone: FixedOffset, raw: Option<&str>) -> Self {
        let user = raw
            .and_then(StoredUser::decode)
            .map(LoggedInUser::from);
        Self { time_zone, user }
    }

    pub fn time_zone(&self) -> FixedOffset {
        self.time_zone
    }

    pub fn user(&self) -> Option<&LoggedInUser> {
        self.user.as_ref()
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.user.as_ref().map(LoggedInUser::credential)
    }

    pub fn username(&self) -> Option<&Username> {
        self.user.as_ref().map(LoggedInUser::username)
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Drop the logged-in user, keeping the time zone.
    pub fn cleared(self) -> Self {
        Self {
            time_zone: self.time_zone,
            user: None,
        }
    }

    /// Replace the logged-in user after a successful login, registration or
    /// settings update.
    pub fn with_user(self, user: LoggedInUser) -> Self {
        Self {
            time_zone: self.time_zone,
            user: Some(user),
        }
    }

    /// The gate in front of every authenticated action: runs `f` with the
    /// live credential, or fails with "Please sign in to {action}." before
    /// any network call is attempted.
    pub fn attempt<T>(
        &self,
        action: &str,
        f: impl FnOnce(&Credential) -> T,
    ) -> Result<T> {
        match &self.user {
            Some(user) => Ok(f(user.credential())),
            None => Err(BylineError::Unauthenticated {
                action: action.to_string(),
            }),
        }
    }

    /// Fold an externally observed storage value back in. The new value is
    /// a full replacement; the returned transition tells the caller whether
    /// a redirect is due.
    pub fn absorb(&mut self, stored: Option<StoredUser>) -> SessionChange {
        let incoming = stored.map(LoggedInUser::from);
        let change = match (&self.user, &incoming) {
            (None, None) => SessionChange::Unchanged,
            (None, Some(_)) => SessionChange::SignedIn,
            (Some(_), None) => SessionChange::SignedOut,
            (Some(old), Some(new)) if old == new => SessionChange::Unchanged,
            (Some(_), Some(_)) => SessionChange::Updated,
        };
        self.user = incoming;
        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn raw_blob() -> String {
        serde_json::json!({
            "email": "jake@statefarm.com",
            "username": "jake",
            "bio": "I work at statefarm",
            "avatar": null,
            "token": "tok-123",
        })
        .to_string()
    }

    #[test]
    fn test_restore_valid_blob_is_logged_in() {
        let session = Session::restore(utc(), Some(&raw_blob()));
        assert!(session.is_logged_in());
        assert_eq!(session.username().unwrap().as_str(), "jake");
    }

    #[test]
    fn test_restore_corrupt_blob_is_logged_out() {
        let session = Session::restore(utc(), Some("{definitely not json"));
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_restore_absent_blob_is_logged_out() {
        let session = Session::restore(utc(), None);
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_cleared_preserves_time_zone() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let session = Session::restore(tz, Some(&raw_blob())).cleared();
        assert!(!session.is_logged_in());
        assert_eq!(session.time_zone(), tz);
    }

    #[test]
    fn test_attempt_while_logged_out_names_the_action() {
        let session = Session::restore(utc(), None);
        let mut calls = 0;
        let err = session
            .attempt("follow", |_| {
                calls += 1;
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "Please sign in to follow.");
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_attempt_while_logged_in_passes_credential() {
        let session = Session::restore(utc(), Some(&raw_blob()));
        let username = session
            .attempt("favorite", |credential| credential.username().clone())
            .unwrap();
        assert_eq!(username.as_str(), "jake");
    }

    #[test]
    fn test_with_user_replaces_identity_wholesale() {
        let session = Session::restore(utc(), None);
        let stored = StoredUser::decode(&raw_blob()).unwrap();
        let session = session.with_user(LoggedInUser::from(stored));
        assert!(session.is_logged_in());
        assert_eq!(session.username().unwrap().as_str(), "jake");
    }

    #[test]
    fn test_absorb_classifies_transitions() {
        let mut session = Session::restore(utc(), None);
        let stored = StoredUser::decode(&raw_blob());

        assert_eq!(session.absorb(stored.clone()), SessionChange::SignedIn);
        assert_eq!(session.absorb(stored), SessionChange::Unchanged);
        assert_eq!(session.absorb(None), SessionChange::SignedOut);
        assert_eq!(session.absorb(None), SessionChange::Unchanged);
    }

    #[test]
    fn test_decode_user_resource() {
        let value = serde_json::json!({
            "email": "jake@statefarm.com",
            "token": "tok-123",
            "username": "jake",
            "bio": null,
            "image": null,
        });
        let user = LoggedInUser::decode(&value).unwrap();
        assert_eq!(user.username().as_str(), "jake");
        assert_eq!(user.email().as_str(), "jake@statefarm.com");
    }
}

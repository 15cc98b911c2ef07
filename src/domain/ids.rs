use std::fmt;

use serde::{Deserialize, Serialize};

use crate::app::{BylineError, Result};

/// Fallback shown when a profile has no avatar of its own.
pub const DEFAULT_AVATAR: &str = "https://static.productionready.io/images/smiley-cyrus.jpg";

/// Unique identity of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BylineError::Identity {
                what: "username",
                value: raw.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = BylineError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-assigned article identifier, stable across edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BylineError::Identity {
                what: "slug",
                value: raw.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = BylineError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-assigned comment identifier, used to correlate delete responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(i64);

impl CommentId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.contains('@') {
            return Err(BylineError::Identity {
                what: "email",
                value: raw.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = BylineError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional avatar image with a guaranteed displayable URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Avatar(Option<String>);

impl Avatar {
    /// Empty strings from the server count as "no avatar".
    pub fn new(raw: Option<String>) -> Self {
        Self(raw.filter(|s| !s.trim().is_empty()))
    }

    pub fn url(&self) -> &str {
        self.0.as_deref().unwrap_or(DEFAULT_AVATAR)
    }

    pub fn custom_url(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rejects_blank() {
        assert!(Username::parse("").is_err());
        assert!(Username::parse("   ").is_err());
    }

    #[test]
    fn test_username_trims() {
        let username = Username::parse(" cyrus ").unwrap();
        assert_eq!(username.as_str(), "cyrus");
    }

    #[test]
    fn test_slug_round_trips_through_serde() {
        let slug: Slug = serde_json::from_str("\"how-to-train-your-dragon\"").unwrap();
        assert_eq!(slug.as_str(), "how-to-train-your-dragon");
        assert_eq!(
            serde_json::to_string(&slug).unwrap(),
            "\"how-to-train-your-dragon\""
        );
    }

    #[test]
    fn test_slug_rejects_empty_on_deserialize() {
        let result: std::result::Result<Slug, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_email_requires_at_sign() {
        assert!(Email::parse("a@b.com").is_ok());
        assert!(Email::parse("not-an-email").is_err());
    }

    #[test]
    fn test_avatar_falls_back_to_default() {
        assert_eq!(Avatar::new(None).url(), DEFAULT_AVATAR);
        assert_eq!(Avatar::new(Some("".into())).url(), DEFAULT_AVATAR);
        assert_eq!(
            Avatar::new(Some("https://example.com/me.png".into())).url(),
            "https://example.com/me.png"
        );
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Username;

/// Opaque authentication proof bound to a username.
///
/// The secret has no accessor: the only things a credential can do are
/// attach itself to an outgoing request and serialize itself for persisted
/// storage. `Debug` redacts the secret so it never reaches logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    username: Username,
    #[serde(rename = "token")]
    secret: String,
}

impl Credential {
    pub(crate) fn new(username: Username, secret: String) -> Self {
        Self { username, secret }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Attach `Authorization: Token {secret}` to an outgoing request.
    pub fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(
            reqwest::header::AUTHORIZATION,
            format!("Token {}", self.secret),
        )
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let credential = Credential::new(
            Username::parse("jake").unwrap(),
            "jwt.token.value".to_string(),
        );
        let rendered = format!("{:?}", credential);
        assert!(rendered.contains("jake"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("jwt.token.value"));
    }

    #[test]
    fn test_serializes_for_persistence() {
        let credential = Credential::new(Username::parse("jake").unwrap(), "abc".to_string());
        let value = serde_json::to_value(&credential).unwrap();
        assert_eq!(value["username"], "jake");
        assert_eq!(value["token"], "abc");
    }
}

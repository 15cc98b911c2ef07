use thiserror::Error;

#[derive(Error, Debug)]
pub enum BylineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed server payload at `{field}`: {reason}")]
    Decode { field: String, reason: String },

    #[error("Please sign in to {action}.")]
    Unauthenticated { action: String },

    #[error("Server rejected the request (status {status})")]
    Api { status: u16, messages: Vec<String> },

    #[error("Invalid {what}: {value:?}")]
    Identity { what: &'static str, value: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BylineError>;

impl BylineError {
    pub(crate) fn decode(field: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    /// Messages suitable for appending to a page-local error list, phrased
    /// against the action the user was attempting.
    ///
    /// Field errors reported by the server are surfaced verbatim; malformed
    /// payloads and transport failures collapse to a per-action server-error
    /// line so internals never leak to the user.
    pub fn user_messages(&self, action: &str) -> Vec<String> {
        match self {
            Self::Unauthenticated { .. } => vec![self.to_string()],
            Self::Api { messages, .. } if !messages.is_empty() => messages.clone(),
            Self::Identity { .. } | Self::Config(_) => vec![self.to_string()],
            _ => vec![format!("Server error while trying to {}.", action)],
        }
    }
}

use reqwest::StatusCode;

/// Keywords that mark a 403 as an authentication problem rather than a data
/// validation one. A matching 403 is treated like a 401: token invalidated,
/// operator sent back to login.
const AUTH_KEYWORDS: &[&str] = &["token", "auth", "credential", "session", "expired", "login"];

/// Error taxonomy for every backend interaction.
///
/// Nothing here is retried and nothing is fatal to the process; each failure
/// is scoped to the user action that triggered it.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network, timeout, or response-decoding failure.
    #[error("transport failure: {0}")]
    Transport(String),

    /// HTTP 400; the backend's field-level message is surfaced verbatim.
    #[error("validation failed: {0}")]
    Validation(String),

    /// HTTP 401, or a 403 whose message is auth-flavored. The token store
    /// is cleared when this is produced; the console reacts by demanding a
    /// fresh login.
    #[error("authentication required: {0}")]
    Unauthenticated(String),

    /// A 403 that is about data, not identity. Shown to the user; the token
    /// is kept.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// HTTP 404, or a missing flight/service reference during service
    /// create/update.
    #[error("not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Map a non-success HTTP status plus its extracted message onto the
    /// taxonomy. Statuses outside the taxonomy (5xx and friends) degrade to
    /// `Transport` with the backend's message attached.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::Validation(message),
            StatusCode::UNAUTHORIZED => Self::Unauthenticated(message),
            StatusCode::FORBIDDEN => {
                if is_auth_flavored(&message) {
                    Self::Unauthenticated(message)
                } else {
                    Self::Forbidden(message)
                }
            }
            StatusCode::NOT_FOUND => Self::NotFound(message),
            _ => Self::Transport(format!("backend returned {status}: {message}")),
        }
    }

    /// True when the error must invalidate the stored token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthenticated(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

fn is_auth_flavored(message: &str) -> bool {
    let lower = message.to_lowercase();
    AUTH_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Pull a human-readable message out of an error response body. The backend
/// answers with `{"message": ...}` or `{"error": ...}` depending on the
/// controller; anything else is passed through as-is.
pub fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(|m| m.as_str()) {
                return msg.to_string();
            }
        }
    }
    if body.is_empty() {
        "request failed".to_string()
    } else {
        body.to_string()
    }
}

//! Error taxonomy shared by the vote and stat logic.
//!
//! Everything here is synchronous and non-transient, so callers surface
//! errors directly instead of retrying. Hosts map the variants to their
//! own surface (the SpacetimeDB module turns them into reducer error
//! strings through `From<LogicError> for String`).

use std::fmt;

/// Failure of a vote or projection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicError {
    /// The caller is not an identified user.
    AuthenticationRequired,
    /// Malformed input: bad vote direction, level below 1, negative points, etc.
    InvalidArgument(String),
    /// The referenced entity does not exist.
    NotFound(String),
}

impl LogicError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl fmt::Display for LogicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthenticationRequired => write!(f, "authentication required"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
        }
    }
}

impl std::error::Error for LogicError {}

impl From<LogicError> for String {
    fn from(value: LogicError) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            LogicError::AuthenticationRequired.to_string(),
            "authentication required"
        );
        assert_eq!(
            LogicError::invalid("level must be at least 1").to_string(),
            "invalid argument: level must be at least 1"
        );
        assert_eq!(
            LogicError::not_found("build 7").to_string(),
            "not found: build 7"
        );
    }

    #[test]
    fn test_into_string() {
        let s: String = LogicError::not_found("guide 3").into();
        assert_eq!(s, "not found: guide 3");
    }
}

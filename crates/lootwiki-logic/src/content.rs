//! Validation of user-authored text on builds, guides, and accounts.
//!
//! Only lengths and emptiness are checked here. Guide bodies are stored
//! as markdown source; rendering happens in the client.

use crate::constants::limits;
use crate::error::LogicError;

/// Trim a title and check it is non-empty and within `max_len` characters.
pub fn validate_title(title: &str, max_len: usize) -> Result<String, LogicError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(LogicError::invalid("title must not be empty"));
    }
    let len = title.chars().count();
    if len > max_len {
        return Err(LogicError::invalid(format!(
            "title is {len} characters, limit is {max_len}"
        )));
    }
    Ok(title.to_string())
}

/// Build descriptions may be empty.
pub fn validate_description(description: &str) -> Result<String, LogicError> {
    let len = description.chars().count();
    if len > limits::MAX_DESCRIPTION_LEN {
        return Err(LogicError::invalid(format!(
            "description is {len} characters, limit is {}",
            limits::MAX_DESCRIPTION_LEN
        )));
    }
    Ok(description.to_string())
}

pub fn validate_guide_body(body: &str) -> Result<String, LogicError> {
    if body.trim().is_empty() {
        return Err(LogicError::invalid("guide body must not be empty"));
    }
    let len = body.chars().count();
    if len > limits::MAX_GUIDE_BODY_LEN {
        return Err(LogicError::invalid(format!(
            "guide body is {len} characters, limit is {}",
            limits::MAX_GUIDE_BODY_LEN
        )));
    }
    Ok(body.to_string())
}

/// Display names: trimmed, non-empty, no control characters.
pub fn validate_display_name(name: &str) -> Result<String, LogicError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LogicError::invalid("display name must not be empty"));
    }
    if name.chars().count() > limits::MAX_DISPLAY_NAME_LEN {
        return Err(LogicError::invalid(format!(
            "display name longer than {} characters",
            limits::MAX_DISPLAY_NAME_LEN
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(LogicError::invalid("display name contains control characters"));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_trimmed() {
        assert_eq!(validate_title("  Glass Cannon Ninja ", 40).unwrap(), "Glass Cannon Ninja");
    }

    #[test]
    fn test_title_empty_or_long() {
        assert!(validate_title("   ", 40).is_err());
        assert!(validate_title(&"x".repeat(41), 40).is_err());
        assert!(validate_title(&"x".repeat(40), 40).is_ok());
    }

    #[test]
    fn test_title_counts_chars_not_bytes() {
        assert!(validate_title("死霊術師", 4).is_ok());
    }

    #[test]
    fn test_description() {
        assert!(validate_description("").is_ok());
        assert!(validate_description(&"a".repeat(limits::MAX_DESCRIPTION_LEN + 1)).is_err());
    }

    #[test]
    fn test_guide_body() {
        assert!(validate_guide_body("# Leveling\n\nKill slimes.").is_ok());
        assert!(validate_guide_body("\n\n").is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(validate_display_name(" Kira ").unwrap(), "Kira");
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name("bad\u{7}name").is_err());
        assert!(validate_display_name(&"n".repeat(33)).is_err());
    }
}

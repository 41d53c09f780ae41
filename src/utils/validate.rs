//! Field checks for request bodies. Each returns the message for a `Validation` error.

/// Maximum length of short text columns.
pub const MAX_TEXT_LEN: usize = 255;

/// A required, non-blank string of at most `MAX_TEXT_LEN` characters. Returns it trimmed.
///
/// # Errors
///
/// Returns a message naming `field` if the value is blank or too long.
pub fn required_text(field: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("The {field} field is required."));
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(format!(
            "The {field} field must not be longer than {MAX_TEXT_LEN} characters."
        ));
    }
    Ok(trimmed.to_string())
}

/// An optional string of at most `MAX_TEXT_LEN` characters.
///
/// # Errors
///
/// Returns a message naming `field` if the value is too long.
pub fn optional_text(field: &str, value: Option<&str>) -> Result<(), String> {
    match value {
        Some(v) if v.chars().count() > MAX_TEXT_LEN => Err(format!(
            "The {field} field must not be longer than {MAX_TEXT_LEN} characters."
        )),
        _ => Ok(()),
    }
}

/// An optional absolute `http(s)` URL.
///
/// # Errors
///
/// Returns a message naming `field` if the value is not such a URL.
pub fn optional_url(field: &str, value: Option<&str>) -> Result<(), String> {
    optional_text(field, value)?;
    match value {
        Some(v) => {
            let rest = v
                .strip_prefix("https://")
                .or_else(|| v.strip_prefix("http://"))
                .unwrap_or_default();
            if rest.is_empty() || rest.contains(char::is_whitespace) {
                Err(format!("The {field} field must be a valid URL."))
            } else {
                Ok(())
            }
        }
        None => Ok(()),
    }
}

/// An integer that must not be negative.
///
/// # Errors
///
/// Returns a message naming `field` if the value is below zero.
pub fn non_negative(field: &str, value: i32) -> Result<(), String> {
    if value < 0 {
        return Err(format!("The {field} field must be at least 0."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_trims() {
        assert_eq!(required_text("name", "  Rovers "), Ok("Rovers".to_string()));
        assert!(required_text("name", "   ").is_err());
        assert!(required_text("name", &"x".repeat(256)).is_err());
    }

    #[test]
    fn test_optional_url() {
        assert!(optional_url("website", None).is_ok());
        assert!(optional_url("website", Some("https://league.example.com")).is_ok());
        assert!(optional_url("website", Some("ftp://league.example.com")).is_err());
        assert!(optional_url("website", Some("https://")).is_err());
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative("points_for_win", 0).is_ok());
        assert!(non_negative("points_for_win", -1).is_err());
    }
}

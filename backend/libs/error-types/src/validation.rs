//! Input validation helpers
//!
//! All checks run before a mutation is attempted so bad input never causes a
//! partial write.

use crate::{SocialError, SocialResult};

/// Validate that `value` holds between `min` and `max` characters (inclusive).
///
/// Length is counted in Unicode scalar values, not bytes.
pub fn validate_char_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> SocialResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(SocialError::validation(
            field,
            format!("length must be between {} and {} characters, got {}", min, max, len),
        ));
    }
    Ok(())
}

/// Pages are 1-based.
pub fn validate_page(page: u32) -> SocialResult<()> {
    if page == 0 {
        return Err(SocialError::validation("page", "pages start at 1"));
    }
    Ok(())
}

/// Out-of-range limits fall back to `default` (too small) or `max` (too large).
pub fn sanitize_limit(value: u32, max: u32, default: u32) -> u32 {
    if value == 0 {
        default
    } else if value > max {
        max
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_length_bounds() {
        assert!(validate_char_length("body", "a", 1, 1000).is_ok());
        assert!(validate_char_length("body", "", 1, 1000).is_err());
        assert!(validate_char_length("body", &"x".repeat(1000), 1, 1000).is_ok());
        assert!(validate_char_length("body", &"x".repeat(1001), 1, 1000).is_err());
    }

    #[test]
    fn test_char_length_counts_chars_not_bytes() {
        // 1000 two-byte characters is still within bounds
        let body = "é".repeat(1000);
        assert!(body.len() > 1000);
        assert!(validate_char_length("body", &body, 1, 1000).is_ok());
    }

    #[test]
    fn test_page_starts_at_one() {
        assert!(validate_page(1).is_ok());
        assert!(matches!(
            validate_page(0),
            Err(SocialError::Validation { field: "page", .. })
        ));
    }

    #[test]
    fn test_sanitize_limit() {
        assert_eq!(sanitize_limit(0, 100, 20), 20);
        assert_eq!(sanitize_limit(7, 100, 20), 7);
        assert_eq!(sanitize_limit(500, 100, 20), 100);
    }
}

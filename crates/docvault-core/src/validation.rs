//! Input normalization for titles, descriptions, and comments.
//!
//! Limits are counted in characters, not bytes.

use crate::error::{Error, Result};

pub const MAX_TITLE_CHARS: usize = 255;
pub const MAX_DESCRIPTION_CHARS: usize = 1000;
pub const MAX_COMMENT_CHARS: usize = 5000;

/// Trim a document title and reject empty or oversized values.
pub fn normalize_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::Validation(
            "title must not be empty or whitespace".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(Error::Validation(format!(
            "title must be at most {} characters",
            MAX_TITLE_CHARS
        )));
    }
    Ok(title.to_string())
}

/// Trim an optional description; blank descriptions become `None`.
pub fn normalize_description(description: Option<&str>) -> Result<Option<String>> {
    let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(Error::Validation(format!(
            "description must be at most {} characters",
            MAX_DESCRIPTION_CHARS
        )));
    }
    Ok(Some(description.to_string()))
}

/// Trim comment content and reject empty or oversized values.
pub fn normalize_comment_content(content: &str) -> Result<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(Error::Validation(
            "comment must not be empty or whitespace".to_string(),
        ));
    }
    if content.chars().count() > MAX_COMMENT_CHARS {
        return Err(Error::Validation(format!(
            "comment must be at most {} characters",
            MAX_COMMENT_CHARS
        )));
    }
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_trimmed() {
        assert_eq!(normalize_title("  Annual report ").unwrap(), "Annual report");
    }

    #[test]
    fn test_blank_title_rejected() {
        for title in ["", "   ", "\n\t"] {
            assert!(matches!(
                normalize_title(title),
                Err(Error::Validation(_))
            ));
        }
    }

    #[test]
    fn test_title_length_limit_counts_chars() {
        assert!(normalize_title(&"é".repeat(MAX_TITLE_CHARS)).is_ok());
        assert!(normalize_title(&"a".repeat(MAX_TITLE_CHARS + 1)).is_err());
    }

    #[test]
    fn test_description_blank_becomes_none() {
        assert_eq!(normalize_description(None).unwrap(), None);
        assert_eq!(normalize_description(Some("   ")).unwrap(), None);
        assert_eq!(
            normalize_description(Some(" notes ")).unwrap(),
            Some("notes".to_string())
        );
    }

    #[test]
    fn test_description_too_long() {
        let long = "x".repeat(MAX_DESCRIPTION_CHARS + 1);
        assert!(matches!(
            normalize_description(Some(&long)),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_comment_whitespace_only_rejected() {
        assert!(matches!(
            normalize_comment_content("   "),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_comment_trimmed() {
        assert_eq!(normalize_comment_content(" hello ").unwrap(), "hello");
    }

    #[test]
    fn test_comment_length_limit() {
        assert!(normalize_comment_content(&"a".repeat(MAX_COMMENT_CHARS)).is_ok());
        assert!(normalize_comment_content(&"a".repeat(MAX_COMMENT_CHARS + 1)).is_err());
    }
}

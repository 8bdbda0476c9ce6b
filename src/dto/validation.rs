use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;
use validator::ValidationError;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug pattern is valid"));

/// Letters, digits, `-` and `_` only. An empty slug means "derive it".
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() || SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        Err(ValidationError::new("slug").with_message(Cow::from(
            "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
        )))
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message(Cow::from("This field may not be blank.")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_accept_url_safe_characters_only() {
        assert!(validate_slug("smart-phones_2").is_ok());
        assert!(validate_slug("").is_ok());
        assert!(validate_slug("a/b c?").is_err());
        assert!(validate_slug("   ").is_err());
    }

    #[test]
    fn whitespace_is_blank() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("\t\n").is_err());
        assert!(validate_not_blank(" Phones ").is_ok());
    }
}

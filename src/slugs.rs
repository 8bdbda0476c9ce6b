/// URL-safe form of a display name: ASCII transliteration, lowercase,
/// non-alphanumeric runs collapsed into single dashes.
pub fn slugify(name: &str) -> String {
    ::slug::slugify(name)
}

/// The slug to persist on first save: an explicit non-blank slug wins,
/// otherwise it is derived from `name`.
pub fn slug_or_derive(explicit: Option<String>, name: &str) -> String {
    match explicit {
        Some(slug) if !slug.trim().is_empty() => slug,
        _ => slugify(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_dash_separated_lowercase() {
        assert_eq!(slugify("Smart Phones"), "smart-phones");
        assert_eq!(slugify("  TV & Audio!! "), "tv-audio");
        assert_eq!(slugify("Laptops"), "laptops");
    }

    #[test]
    fn transliterates_non_ascii() {
        assert_eq!(slugify("Café Crème"), "cafe-creme");
    }

    #[test]
    fn explicit_slug_is_kept_and_blank_is_derived() {
        assert_eq!(slug_or_derive(Some("custom".into()), "Smart Phones"), "custom");
        assert_eq!(slug_or_derive(Some("".into()), "Smart Phones"), "smart-phones");
        assert_eq!(slug_or_derive(None, "Smart Phones"), "smart-phones");
    }
}

//! Input validation helpers shared by the service crates
//!
//! Every helper returns [`CatalogError::Validation`], which the HTTP layer
//! maps to a 400 with the offending field named in the message.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CatalogError, Result};
use crate::ranking::MIN_SEARCH_TERM_LENGTH;

static COUNTRY_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2}$").expect("valid country code regex"));

static LANGUAGE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2,3}$").expect("valid language code regex"));

/// Longest search term accepted before we refuse to query
pub const MAX_SEARCH_TERM_LENGTH: usize = 100;

const MIN_RELEASE_YEAR: i32 = 1880;
const MAX_RELEASE_YEAR: i32 = 2100;

/// Validate and normalize a search term: trimmed, bounded length
pub fn validate_search_term(term: &str) -> Result<String> {
    let trimmed = term.trim();
    if trimmed.chars().count() < MIN_SEARCH_TERM_LENGTH {
        return Err(CatalogError::validation(format!(
            "search term must be at least {} characters",
            MIN_SEARCH_TERM_LENGTH
        )));
    }
    if trimmed.chars().count() > MAX_SEARCH_TERM_LENGTH {
        return Err(CatalogError::validation(format!(
            "search term must be at most {} characters",
            MAX_SEARCH_TERM_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate an ISO 3166-1 alpha-2 country code, normalizing to uppercase
pub fn validate_country_code(code: &str) -> Result<String> {
    if !COUNTRY_CODE.is_match(code) {
        return Err(CatalogError::validation(format!(
            "'{}' is not a two-letter country code",
            code
        )));
    }
    Ok(code.to_uppercase())
}

/// Validate an ISO 639 language code, normalizing to lowercase
pub fn validate_language_code(code: &str) -> Result<String> {
    if !LANGUAGE_CODE.is_match(code) {
        return Err(CatalogError::validation(format!(
            "'{}' is not a valid language code",
            code
        )));
    }
    Ok(code.to_lowercase())
}

/// Validate a release year bound
pub fn validate_release_year(year: i32) -> Result<i32> {
    if !(MIN_RELEASE_YEAR..=MAX_RELEASE_YEAR).contains(&year) {
        return Err(CatalogError::validation(format!(
            "release year {} is out of range",
            year
        )));
    }
    Ok(year)
}

/// Validate that a release-year range is not inverted
pub fn validate_year_range(min: Option<i32>, max: Option<i32>) -> Result<()> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(CatalogError::validation(
                "release year range is inverted".to_string(),
            ));
        }
    }
    Ok(())
}

/// Validate a non-empty, bounded display name (shelf names, titles)
pub fn validate_display_name(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::validation(format!("{} must not be empty", field)));
    }
    if trimmed.chars().count() > 200 {
        return Err(CatalogError::validation(format!(
            "{} must be at most 200 characters",
            field
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_term_trimmed_and_bounded() {
        assert_eq!(validate_search_term("  batman  ").unwrap(), "batman");
        assert!(validate_search_term("a").is_err());
        assert!(validate_search_term(" x ").is_err());
        assert!(validate_search_term(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_two_character_term_accepted() {
        assert_eq!(validate_search_term("up").unwrap(), "up");
    }

    #[test]
    fn test_country_code() {
        assert_eq!(validate_country_code("us").unwrap(), "US");
        assert!(validate_country_code("USA").is_err());
        assert!(validate_country_code("1A").is_err());
    }

    #[test]
    fn test_language_code() {
        assert_eq!(validate_language_code("EN").unwrap(), "en");
        assert_eq!(validate_language_code("fil").unwrap(), "fil");
        assert!(validate_language_code("e").is_err());
    }

    #[test]
    fn test_release_year_bounds() {
        assert!(validate_release_year(1879).is_err());
        assert!(validate_release_year(1994).is_ok());
        assert!(validate_release_year(2101).is_err());
    }

    #[test]
    fn test_inverted_year_range_rejected() {
        assert!(validate_year_range(Some(2020), Some(2010)).is_err());
        assert!(validate_year_range(Some(2010), Some(2020)).is_ok());
        assert!(validate_year_range(None, Some(2020)).is_ok());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(validate_display_name("name", " Trending ").unwrap(), "Trending");
        assert!(validate_display_name("name", "   ").is_err());
    }
}

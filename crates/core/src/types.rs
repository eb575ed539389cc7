//! Core type definitions shared across the platform

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};

/// Content type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Movie,
    Series,
    Documentary,
    Short,
}

impl ContentType {
    pub fn from_str(s: &str) -> Result<Self, CatalogError> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(ContentType::Movie),
            "series" => Ok(ContentType::Series),
            "documentary" => Ok(ContentType::Documentary),
            "short" => Ok(ContentType::Short),
            _ => Err(CatalogError::validation(format!(
                "Invalid content type: {}",
                s
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Series => "series",
            ContentType::Documentary => "documentary",
            ContentType::Short => "short",
        }
    }
}

/// Age rating hierarchy following MPAA standards
///
/// The ordering is load-bearing: child-safety gating compares against
/// [`MAX_CHILD_RATING`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AgeRating {
    G = 0,
    PG = 1,
    #[serde(rename = "PG-13")]
    PG13 = 2,
    R = 3,
    #[serde(rename = "NC-17")]
    NC17 = 4,
}

impl AgeRating {
    pub fn from_str(s: &str) -> Result<Self, CatalogError> {
        match s.to_uppercase().as_str() {
            "G" => Ok(AgeRating::G),
            "PG" => Ok(AgeRating::PG),
            "PG-13" | "PG13" => Ok(AgeRating::PG13),
            "R" => Ok(AgeRating::R),
            "NC-17" | "NC17" => Ok(AgeRating::NC17),
            _ => Err(CatalogError::validation(format!(
                "Invalid age rating: {}",
                s
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeRating::G => "G",
            AgeRating::PG => "PG",
            AgeRating::PG13 => "PG-13",
            AgeRating::R => "R",
            AgeRating::NC17 => "NC-17",
        }
    }
}

/// Publication lifecycle of a content record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Draft,
    Processing,
    Published,
    Archived,
}

impl ContentStatus {
    pub fn from_str(s: &str) -> Result<Self, CatalogError> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(ContentStatus::Draft),
            "processing" => Ok(ContentStatus::Processing),
            "published" => Ok(ContentStatus::Published),
            "archived" => Ok(ContentStatus::Archived),
            _ => Err(CatalogError::validation(format!(
                "Invalid content status: {}",
                s
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Processing => "processing",
            ContentStatus::Published => "published",
            ContentStatus::Archived => "archived",
        }
    }
}

/// Highest age rating a child profile may see
pub const MAX_CHILD_RATING: AgeRating = AgeRating::PG13;

/// Age ratings permitted on child profiles
pub const CHILD_SAFE_RATINGS: [AgeRating; 3] = [AgeRating::G, AgeRating::PG, AgeRating::PG13];

/// Genre allowlist for child profiles; content must overlap this set
pub const CHILD_SAFE_GENRES: [&str; 5] = ["Family", "Animation", "Comedy", "Adventure", "Fantasy"];

/// True if the genre is on the kid-safe allowlist (case-insensitive)
pub fn is_child_safe_genre(genre: &str) -> bool {
    CHILD_SAFE_GENRES
        .iter()
        .any(|g| g.eq_ignore_ascii_case(genre))
}

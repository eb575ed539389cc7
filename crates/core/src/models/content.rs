//! Content models for the VOD catalog
//!
//! The canonical content record plus the season/episode hierarchy for
//! episodic titles. Episodes carry no age or geo attributes of their own;
//! gating always evaluates the parent series record.
//!
//! ## Database schema
//!
//! ```sql
//! CREATE TABLE content (
//!     id UUID PRIMARY KEY,
//!     title TEXT NOT NULL,
//!     subtitle TEXT,
//!     description TEXT,
//!     content_type TEXT NOT NULL,
//!     genres TEXT[] NOT NULL DEFAULT '{}',
//!     duration_minutes INT,
//!     release_year INT NOT NULL,
//!     age_rating TEXT NOT NULL,
//!     language TEXT,
//!     cast_members TEXT[] NOT NULL DEFAULT '{}',
//!     directors TEXT[] NOT NULL DEFAULT '{}',
//!     characters TEXT[] NOT NULL DEFAULT '{}',
//!     available_countries TEXT[] NOT NULL DEFAULT '{}',
//!     restricted_countries TEXT[] NOT NULL DEFAULT '{}',
//!     globally_available BOOLEAN NOT NULL DEFAULT FALSE,
//!     status TEXT NOT NULL DEFAULT 'draft',
//!     is_active BOOLEAN NOT NULL DEFAULT TRUE,
//!     featured_at TIMESTAMPTZ,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//!
//! CREATE TABLE seasons (
//!     id UUID PRIMARY KEY,
//!     series_id UUID NOT NULL REFERENCES content(id),
//!     season_number INT NOT NULL,
//!     title TEXT,
//!     UNIQUE(series_id, season_number)
//! );
//!
//! CREATE TABLE episodes (
//!     id UUID PRIMARY KEY,
//!     season_id UUID NOT NULL REFERENCES seasons(id),
//!     episode_number INT NOT NULL,
//!     title TEXT NOT NULL,
//!     description TEXT,
//!     duration_minutes INT,
//!     UNIQUE(season_id, episode_number)
//! );
//! ```

use crate::types::{AgeRating, ContentStatus, ContentType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical content record
///
/// Owned by the catalog; mutated only through administrative updates and
/// never hard-deleted (`is_active = false` marks removal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: Uuid,

    pub title: String,

    /// Secondary title (localized or marketing variant)
    pub subtitle: Option<String>,

    pub description: Option<String>,

    pub content_type: ContentType,

    /// Free-form genre tags; filter semantics are "overlaps any requested"
    pub genres: Vec<String>,

    pub duration_minutes: Option<i32>,

    pub release_year: i32,

    pub age_rating: AgeRating,

    /// ISO 639-1 code of the primary audio language
    pub language: Option<String>,

    pub cast_members: Vec<String>,

    pub directors: Vec<String>,

    pub characters: Vec<String>,

    /// ISO 3166-1 alpha-2 codes where non-global content is offered
    pub available_countries: Vec<String>,

    /// ISO 3166-1 alpha-2 codes where content is withheld, even if global
    pub restricted_countries: Vec<String>,

    pub globally_available: bool,

    pub status: ContentStatus,

    /// Soft-delete flag; inactive records never surface in any listing
    pub is_active: bool,

    /// Presence marks the record as featured
    pub featured_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Content {
    /// Create a new content record with catalog defaults
    pub fn new(
        content_type: ContentType,
        title: impl Into<String>,
        release_year: i32,
        age_rating: AgeRating,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            subtitle: None,
            description: None,
            content_type,
            genres: Vec::new(),
            duration_minutes: None,
            release_year,
            age_rating,
            language: None,
            cast_members: Vec::new(),
            directors: Vec::new(),
            characters: Vec::new(),
            available_countries: Vec::new(),
            restricted_countries: Vec::new(),
            globally_available: false,
            status: ContentStatus::Draft,
            is_active: true,
            featured_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_featured(&self) -> bool {
        self.featured_at.is_some()
    }

    /// True if any genre tag is on the supplied list (case-insensitive)
    pub fn has_any_genre(&self, wanted: &[String]) -> bool {
        self.genres
            .iter()
            .any(|g| wanted.iter().any(|w| w.eq_ignore_ascii_case(g)))
    }

    /// Refresh the updated-at timestamp after a mutation
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// One season of a series, ordered by `season_number`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: Uuid,
    pub series_id: Uuid,
    pub season_number: i32,
    pub title: Option<String>,
}

/// One episode of a season, ordered by `episode_number`
///
/// Age and geo gating are inherited transitively from the parent series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: Uuid,
    pub season_id: Uuid,
    pub episode_number: i32,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
}

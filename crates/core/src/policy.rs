//! Viewer gating policy: child safety and geo availability
//!
//! Both gates are intersections with whatever filters the request already
//! carries; a child profile can narrow results further but never widen them
//! past the allowlists. Every listing, search, shelf, and detail path in the
//! platform routes through [`apply_viewer_gates`] (or [`can_view`] for
//! single records) so the rules live in exactly one place.

use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::models::{Content, ViewerContext};
use crate::predicate::ContentPredicate;
use crate::types::{is_child_safe_genre, AgeRating, CHILD_SAFE_RATINGS, MAX_CHILD_RATING};

/// Intersect a predicate with the child-safety allowlists when the viewer
/// is a child profile; a no-op otherwise
pub fn apply_child_safety(predicate: ContentPredicate, viewer: &ViewerContext) -> ContentPredicate {
    if viewer.is_child_profile {
        debug!(profile_id = ?viewer.profile_id, "applying child-safety gate");
        predicate.child_safe()
    } else {
        predicate
    }
}

/// Intersect a predicate with the geo-availability rule when the viewer
/// country is known; fails open when it is not
pub fn apply_geo(predicate: ContentPredicate, viewer: &ViewerContext) -> ContentPredicate {
    match &viewer.country {
        Some(country) => predicate.geo_gated(country.clone()),
        None => predicate,
    }
}

/// Apply both viewer gates; the single entry point for query paths
pub fn apply_viewer_gates(predicate: ContentPredicate, viewer: &ViewerContext) -> ContentPredicate {
    apply_geo(apply_child_safety(predicate, viewer), viewer)
}

/// Reject explicit filter values a child profile is not allowed to request
///
/// Explicitly asking for a disallowed rating or genre is a client error,
/// not something to silently narrow away.
pub fn validate_child_filters(
    genres: &[String],
    ratings: &[AgeRating],
    viewer: &ViewerContext,
) -> Result<()> {
    if !viewer.is_child_profile {
        return Ok(());
    }

    if let Some(rating) = ratings.iter().find(|r| **r > MAX_CHILD_RATING) {
        return Err(CatalogError::validation(format!(
            "age rating '{}' is not available on a child profile",
            rating.as_str()
        )));
    }

    if let Some(genre) = genres.iter().find(|g| !is_child_safe_genre(g)) {
        return Err(CatalogError::validation(format!(
            "genre '{}' is not available on a child profile",
            genre
        )));
    }

    Ok(())
}

/// Whether a single already-fetched record is viewable by this viewer
///
/// Used by detail lookups and by views assembled from history rows, where
/// the record is fetched by id before gating.
pub fn can_view(content: &Content, viewer: &ViewerContext) -> bool {
    if viewer.is_child_profile {
        let rating_ok = CHILD_SAFE_RATINGS.contains(&content.age_rating);
        let genre_ok = content.genres.iter().any(|g| is_child_safe_genre(g));
        if !rating_ok || !genre_ok {
            return false;
        }
    }
    geo::is_available(content, viewer.country.as_deref())
}

pub mod geo {
    //! Geo-availability rule
    //!
    //! Restricted-country lists always win; global availability is checked
    //! before per-country allowlists; an unknown viewer country fails open.

    use crate::models::Content;

    /// Whether a record is available in the viewer's country
    pub fn is_available(content: &Content, country: Option<&str>) -> bool {
        let Some(country) = country else {
            // unresolved country never hides content
            return true;
        };

        let restricted = content
            .restricted_countries
            .iter()
            .any(|c| c.eq_ignore_ascii_case(country));
        if restricted {
            return false;
        }

        if content.globally_available {
            return true;
        }

        content
            .available_countries
            .iter()
            .any(|c| c.eq_ignore_ascii_case(country))
    }
}

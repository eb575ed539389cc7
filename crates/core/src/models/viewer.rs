//! Request-scoped viewer context
//!
//! Who is looking at the catalog: the active profile (possibly a child
//! profile) and the resolved viewer country. Not persisted; derived per
//! request by the edge from the verified session and passed unchanged into
//! every listing, search, and detail operation.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CatalogError;
use crate::types::{CHILD_SAFE_GENRES, CHILD_SAFE_RATINGS};
use crate::validation;

/// Viewer context attached to every catalog request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerContext {
    /// Active viewing profile, if a session is present
    pub profile_id: Option<Uuid>,

    /// Whether the active profile is flagged as a child profile
    #[serde(default)]
    pub is_child_profile: bool,

    /// Resolved ISO 3166-1 alpha-2 viewer country; absent means the geo
    /// gate fails open
    pub country: Option<String>,
}

impl ViewerContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_profile(profile_id: Uuid, is_child_profile: bool) -> Self {
        Self {
            profile_id: Some(profile_id),
            is_child_profile,
            country: None,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Build the context from the headers the session edge sets:
    /// `x-profile-id`, `x-child-profile`, `x-viewer-country`
    pub fn from_headers(req: &HttpRequest) -> Result<Self, CatalogError> {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let profile_id = header("x-profile-id")
            .map(|raw| {
                Uuid::parse_str(&raw).map_err(|_| {
                    CatalogError::validation("x-profile-id is not a valid UUID")
                })
            })
            .transpose()?;

        let is_child_profile = header("x-child-profile")
            .map(|raw| raw == "true" || raw == "1")
            .unwrap_or(false);

        let country = header("x-viewer-country")
            .map(|raw| validation::validate_country_code(&raw))
            .transpose()?;

        Ok(Self {
            profile_id,
            is_child_profile,
            country,
        })
    }
}

impl FromRequest for ViewerContext {
    type Error = CatalogError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_headers(req))
    }
}

/// Echo of the gating that was applied, returned with every listing
///
/// Clients use this to confirm which restrictions shaped the page; it is a
/// required part of the response contract, not diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileContextEcho {
    pub profile_id: Option<Uuid>,
    pub is_child_profile: bool,
    pub country: Option<String>,
    /// Present only when the child gate was applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_ratings: Option<Vec<String>>,
    /// Present only when the child gate was applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_genres: Option<Vec<String>>,
}

impl From<&ViewerContext> for ProfileContextEcho {
    fn from(viewer: &ViewerContext) -> Self {
        let (allowed_ratings, allowed_genres) = if viewer.is_child_profile {
            (
                Some(
                    CHILD_SAFE_RATINGS
                        .iter()
                        .map(|r| r.as_str().to_string())
                        .collect(),
                ),
                Some(CHILD_SAFE_GENRES.iter().map(|g| g.to_string()).collect()),
            )
        } else {
            (None, None)
        };

        Self {
            profile_id: viewer.profile_id,
            is_child_profile: viewer.is_child_profile,
            country: viewer.country.clone(),
            allowed_ratings,
            allowed_genres,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_viewer_has_no_gates() {
        let viewer = ViewerContext::anonymous();
        let echo = ProfileContextEcho::from(&viewer);

        assert!(echo.profile_id.is_none());
        assert!(!echo.is_child_profile);
        assert!(echo.allowed_ratings.is_none());
        assert!(echo.allowed_genres.is_none());
    }

    #[test]
    fn test_child_profile_echoes_allowlists() {
        let viewer = ViewerContext::for_profile(Uuid::new_v4(), true).with_country("US");
        let echo = ProfileContextEcho::from(&viewer);

        assert!(echo.is_child_profile);
        assert_eq!(echo.country.as_deref(), Some("US"));
        let ratings = echo.allowed_ratings.unwrap();
        assert!(ratings.contains(&"PG-13".to_string()));
        assert!(!ratings.contains(&"R".to_string()));
        assert!(echo.allowed_genres.unwrap().contains(&"Family".to_string()));
    }

    #[test]
    fn test_from_headers() {
        let profile_id = Uuid::new_v4();
        let req = actix_web::test::TestRequest::default()
            .insert_header(("x-profile-id", profile_id.to_string()))
            .insert_header(("x-child-profile", "true"))
            .insert_header(("x-viewer-country", "de"))
            .to_http_request();

        let viewer = ViewerContext::from_headers(&req).unwrap();
        assert_eq!(viewer.profile_id, Some(profile_id));
        assert!(viewer.is_child_profile);
        assert_eq!(viewer.country.as_deref(), Some("DE"));
    }

    #[test]
    fn test_from_headers_rejects_bad_profile_id() {
        let req = actix_web::test::TestRequest::default()
            .insert_header(("x-profile-id", "not-a-uuid"))
            .to_http_request();
        assert!(ViewerContext::from_headers(&req).is_err());
    }
}

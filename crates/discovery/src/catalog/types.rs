//! Request and response types for the catalog endpoints

use serde::{Deserialize, Serialize};

use vod_core::models::{Episode, ProfileContextEcho, Season};
use vod_core::pagination::Page;
use vod_core::predicate::{ContentOrder, ContentPredicate};
use vod_core::types::{AgeRating, ContentType};
use vod_core::validation;
use vod_core::{CatalogError, Content, Result, ViewerContext};
use vod_core::PageRequest;

/// Raw query string of a listing request; everything optional,
/// multi-value fields comma-separated
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub age_rating: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub featured: Option<bool>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Validated listing request
#[derive(Debug, Clone)]
pub struct ListRequest {
    pub content_types: Vec<ContentType>,
    pub genres: Vec<String>,
    pub languages: Vec<String>,
    pub age_ratings: Vec<AgeRating>,
    pub release_year_min: Option<i32>,
    pub release_year_max: Option<i32>,
    pub featured: Option<bool>,
    pub order: ContentOrder,
    pub page: PageRequest,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            content_types: Vec::new(),
            genres: Vec::new(),
            languages: Vec::new(),
            age_ratings: Vec::new(),
            release_year_min: None,
            release_year_max: None,
            featured: None,
            order: ContentOrder::Recency,
            page: PageRequest::default(),
        }
    }
}

impl ListRequest {
    /// Parse and validate a raw query string
    pub fn from_query(query: ListQuery) -> Result<Self> {
        let content_types = split_csv(query.content_type.as_deref())
            .iter()
            .map(|s| ContentType::from_str(s))
            .collect::<Result<Vec<_>>>()?;

        let age_ratings = split_csv(query.age_rating.as_deref())
            .iter()
            .map(|s| AgeRating::from_str(s))
            .collect::<Result<Vec<_>>>()?;

        let genres = split_csv(query.genre.as_deref());

        let languages = split_csv(query.language.as_deref())
            .iter()
            .map(|s| validation::validate_language_code(s))
            .collect::<Result<Vec<_>>>()?;

        let release_year_min = query
            .year_from
            .map(validation::validate_release_year)
            .transpose()?;
        let release_year_max = query
            .year_to
            .map(validation::validate_release_year)
            .transpose()?;
        validation::validate_year_range(release_year_min, release_year_max)?;

        let order = match query.sort.as_deref() {
            None | Some("recent") => ContentOrder::Recency,
            Some("title") => ContentOrder::TitleAsc,
            Some(other) => {
                return Err(CatalogError::validation(format!(
                    "unknown sort '{}'; expected 'recent' or 'title'",
                    other
                )))
            }
        };

        Ok(Self {
            content_types,
            genres,
            languages,
            age_ratings,
            release_year_min,
            release_year_max,
            featured: query.featured,
            order,
            page: PageRequest::from_params(query.page, query.page_size),
        })
    }

    /// Lower the request onto a predicate (no viewer gates yet)
    pub fn to_predicate(&self) -> ContentPredicate {
        let mut predicate = ContentPredicate::new()
            .with_content_types(self.content_types.clone())
            .with_genres(self.genres.clone())
            .with_languages(self.languages.clone())
            .with_age_ratings(self.age_ratings.clone())
            .with_release_years(self.release_year_min, self.release_year_max);
        if let Some(featured) = self.featured {
            predicate = predicate.with_featured(featured);
        }
        predicate
    }
}

fn split_csv(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// One page of listing results with the filter and profile echoes every
/// listing response carries
#[derive(Debug, Serialize)]
pub struct Listing<T> {
    #[serde(flatten)]
    pub page: Page<T>,
    pub applied_filters: ContentPredicate,
    pub profile_context: ProfileContextEcho,
}

impl<T> Listing<T> {
    pub fn new(page: Page<T>, applied: ContentPredicate, viewer: &ViewerContext) -> Self {
        Self {
            page,
            applied_filters: applied,
            profile_context: ProfileContextEcho::from(viewer),
        }
    }
}

/// One entry of the everyone's-watching listing
#[derive(Debug, Serialize)]
pub struct WatchedItem {
    #[serde(flatten)]
    pub content: Content,
    pub watch_count: i64,
}

/// Full detail view of one record, with the season/episode tree for series
#[derive(Debug, Serialize)]
pub struct ContentDetail {
    #[serde(flatten)]
    pub content: Content,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub seasons: Vec<SeasonDetail>,
    pub profile_context: ProfileContextEcho,
}

#[derive(Debug, Serialize)]
pub struct SeasonDetail {
    #[serde(flatten)]
    pub season: Season,
    pub episodes: Vec<Episode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_parses_csv_dimensions() {
        let request = ListRequest::from_query(ListQuery {
            content_type: Some("movie, series".to_string()),
            genre: Some("Action,Comedy".to_string()),
            age_rating: Some("PG,PG-13".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            request.content_types,
            vec![ContentType::Movie, ContentType::Series]
        );
        assert_eq!(request.genres, vec!["Action", "Comedy"]);
        assert_eq!(request.age_ratings, vec![AgeRating::PG, AgeRating::PG13]);
    }

    #[test]
    fn test_from_query_rejects_unknown_type() {
        let result = ListRequest::from_query(ListQuery {
            content_type: Some("podcast".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_from_query_rejects_unknown_sort() {
        let result = ListRequest::from_query(ListQuery {
            sort: Some("rating".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_from_query_rejects_inverted_year_range() {
        let result = ListRequest::from_query(ListQuery {
            year_from: Some(2024),
            year_to: Some(2020),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_query_defaults() {
        let request = ListRequest::from_query(ListQuery::default()).unwrap();
        assert!(request.content_types.is_empty());
        assert_eq!(request.order, ContentOrder::Recency);
        assert_eq!(request.page.page, 1);
    }
}

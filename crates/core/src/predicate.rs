//! Filter-predicate composer for catalog queries
//!
//! Translates request parameters into a single composable predicate:
//! multi-value dimensions (type, genre, age rating) OR internally and AND
//! against the other dimensions; omitted parameters impose no constraint.
//!
//! The predicate has two faces that must stay in lockstep:
//! - [`ContentPredicate::to_sql`] renders a parameterized WHERE fragment
//!   with numbered binds (array overlap via `&& $n::text[]`, never
//!   string-concatenated values), and
//! - [`ContentPredicate::matches`] evaluates the same constraints against
//!   an in-memory [`Content`] record, used by the in-memory repository,
//!   post-fetch detail gating, and continue-watching filtering.

use serde::Serialize;

use crate::models::Content;
use crate::policy::geo;
use crate::types::{
    AgeRating, ContentStatus, ContentType, CHILD_SAFE_GENRES, CHILD_SAFE_RATINGS,
};

/// A value bound into a rendered SQL fragment, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    TextArray(Vec<String>),
    Int(i64),
}

/// A rendered WHERE fragment plus its binds
#[derive(Debug, Clone)]
pub struct SqlFragment {
    /// WHERE clause body (without the `WHERE` keyword); `TRUE` when empty
    pub clause: String,
    pub binds: Vec<BindValue>,
}

/// Deterministic orderings for catalog listings
///
/// Every ordering ends with `id` so equal keys paginate stably.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOrder {
    /// Newest first: release year, then record creation time
    Recency,
    /// Alphabetical by title
    TitleAsc,
    /// Soonest-releasing first (upcoming listings)
    ReleaseYearAsc,
    /// Most recently featured first
    FeaturedRecency,
}

impl ContentOrder {
    /// ORDER BY clause body for the content table
    pub fn to_sql(&self) -> &'static str {
        match self {
            ContentOrder::Recency => "release_year DESC, created_at DESC, id ASC",
            ContentOrder::TitleAsc => "title ASC, id ASC",
            ContentOrder::ReleaseYearAsc => "release_year ASC, id ASC",
            ContentOrder::FeaturedRecency => "featured_at DESC NULLS LAST, id ASC",
        }
    }

    /// Sort an in-memory slice with the same semantics as [`Self::to_sql`]
    pub fn sort(&self, items: &mut [Content]) {
        match self {
            ContentOrder::Recency => items.sort_by(|a, b| {
                b.release_year
                    .cmp(&a.release_year)
                    .then(b.created_at.cmp(&a.created_at))
                    .then(a.id.cmp(&b.id))
            }),
            ContentOrder::TitleAsc => {
                items.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)))
            }
            ContentOrder::ReleaseYearAsc => items.sort_by(|a, b| {
                a.release_year
                    .cmp(&b.release_year)
                    .then(a.id.cmp(&b.id))
            }),
            ContentOrder::FeaturedRecency => items.sort_by(|a, b| {
                // NULLS LAST: unfeatured records sink to the end
                match (b.featured_at, a.featured_at) {
                    (Some(x), Some(y)) => x.cmp(&y).then(a.id.cmp(&b.id)),
                    (Some(_), None) => std::cmp::Ordering::Greater,
                    (None, Some(_)) => std::cmp::Ordering::Less,
                    (None, None) => a.id.cmp(&b.id),
                }
            }),
        }
    }
}

/// Composable conjunction of catalog filter constraints
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentPredicate {
    content_types: Vec<ContentType>,
    genres: Vec<String>,
    languages: Vec<String>,
    age_ratings: Vec<AgeRating>,
    release_year_min: Option<i32>,
    release_year_max: Option<i32>,
    featured: Option<bool>,
    /// Keep records still on their way to the catalog: released after this
    /// year, or not yet published
    upcoming_after: Option<i32>,
    statuses: Vec<ContentStatus>,
    search_term: Option<String>,
    exclude_active_check: bool,
    kid_safe: bool,
    viewer_country: Option<String>,
}

impl ContentPredicate {
    /// Predicate over active records with no other constraints
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_types(mut self, types: Vec<ContentType>) -> Self {
        self.content_types = types;
        self
    }

    /// Genre filter with "array contains any of" semantics
    pub fn with_genres(mut self, genres: Vec<String>) -> Self {
        self.genres = genres;
        self
    }

    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_age_ratings(mut self, ratings: Vec<AgeRating>) -> Self {
        self.age_ratings = ratings;
        self
    }

    pub fn with_release_years(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.release_year_min = min;
        self.release_year_max = max;
        self
    }

    pub fn with_featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    pub fn with_statuses(mut self, statuses: Vec<ContentStatus>) -> Self {
        self.statuses = statuses;
        self
    }

    /// Restrict to upcoming records: releasing after `year`, or still in
    /// draft or processing
    pub fn upcoming_after(mut self, year: i32) -> Self {
        self.upcoming_after = Some(year);
        self
    }

    /// Base free-text inclusion condition (see module docs for fields)
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Include soft-deleted records (administrative listings only)
    pub fn including_inactive(mut self) -> Self {
        self.exclude_active_check = true;
        self
    }

    /// Intersect with the child-safety allowlists; invoked only through
    /// [`crate::policy::apply_child_safety`]
    pub(crate) fn child_safe(mut self) -> Self {
        self.kid_safe = true;
        self
    }

    /// Intersect with the geo-availability rule for this viewer country
    pub(crate) fn geo_gated(mut self, country: impl Into<String>) -> Self {
        self.viewer_country = Some(country.into());
        self
    }

    pub fn is_kid_safe(&self) -> bool {
        self.kid_safe
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    /// Render a parameterized WHERE fragment, numbering placeholders from
    /// `first_placeholder` so callers can prepend their own binds
    pub fn to_sql(&self, first_placeholder: usize) -> SqlFragment {
        let mut conditions: Vec<String> = Vec::new();
        let mut binds: Vec<BindValue> = Vec::new();
        let mut next = first_placeholder;

        let mut push_bind = |binds: &mut Vec<BindValue>, value: BindValue| {
            binds.push(value);
            let idx = next;
            next += 1;
            idx
        };

        if !self.exclude_active_check {
            conditions.push("is_active = TRUE".to_string());
        }

        if !self.statuses.is_empty() {
            let n = push_bind(
                &mut binds,
                BindValue::TextArray(
                    self.statuses.iter().map(|s| s.as_str().to_string()).collect(),
                ),
            );
            conditions.push(format!("status = ANY(${})", n));
        }

        if !self.content_types.is_empty() {
            let n = push_bind(
                &mut binds,
                BindValue::TextArray(
                    self.content_types
                        .iter()
                        .map(|t| t.as_str().to_string())
                        .collect(),
                ),
            );
            conditions.push(format!("content_type = ANY(${})", n));
        }

        if !self.genres.is_empty() {
            let n = push_bind(&mut binds, BindValue::TextArray(self.genres.clone()));
            conditions.push(format!("genres && ${}::text[]", n));
        }

        if !self.languages.is_empty() {
            let n = push_bind(&mut binds, BindValue::TextArray(self.languages.clone()));
            conditions.push(format!("language = ANY(${})", n));
        }

        if !self.age_ratings.is_empty() {
            let n = push_bind(
                &mut binds,
                BindValue::TextArray(
                    self.age_ratings
                        .iter()
                        .map(|r| r.as_str().to_string())
                        .collect(),
                ),
            );
            conditions.push(format!("age_rating = ANY(${})", n));
        }

        if let Some(min) = self.release_year_min {
            let n = push_bind(&mut binds, BindValue::Int(min as i64));
            conditions.push(format!("release_year >= ${}", n));
        }

        if let Some(max) = self.release_year_max {
            let n = push_bind(&mut binds, BindValue::Int(max as i64));
            conditions.push(format!("release_year <= ${}", n));
        }

        match self.featured {
            Some(true) => conditions.push("featured_at IS NOT NULL".to_string()),
            Some(false) => conditions.push("featured_at IS NULL".to_string()),
            None => {}
        }

        if let Some(year) = self.upcoming_after {
            let n = push_bind(&mut binds, BindValue::Int(year as i64));
            // archived titles were published once; they are not upcoming
            conditions.push(format!(
                "(release_year > ${} OR status IN ('draft', 'processing'))",
                n
            ));
        }

        if let Some(term) = &self.search_term {
            let pattern = format!("%{}%", escape_like(term));
            let n = push_bind(&mut binds, BindValue::Text(pattern));
            conditions.push(format!(
                "(title ILIKE ${n} \
                 OR COALESCE(subtitle, '') ILIKE ${n} \
                 OR COALESCE(description, '') ILIKE ${n} \
                 OR content_type ILIKE ${n} \
                 OR EXISTS (SELECT 1 FROM unnest(directors) AS d WHERE d ILIKE ${n}) \
                 OR EXISTS (SELECT 1 FROM unnest(cast_members) AS m WHERE m ILIKE ${n}) \
                 OR EXISTS (SELECT 1 FROM unnest(genres) AS g WHERE g ILIKE ${n}) \
                 OR EXISTS (SELECT 1 FROM unnest(characters) AS c WHERE c ILIKE ${n}))",
                n = n
            ));
        }

        if self.kid_safe {
            let ratings = push_bind(
                &mut binds,
                BindValue::TextArray(
                    CHILD_SAFE_RATINGS
                        .iter()
                        .map(|r| r.as_str().to_string())
                        .collect(),
                ),
            );
            let genres = push_bind(
                &mut binds,
                BindValue::TextArray(CHILD_SAFE_GENRES.iter().map(|g| g.to_string()).collect()),
            );
            conditions.push(format!(
                "(age_rating = ANY(${}) AND genres && ${}::text[])",
                ratings, genres
            ));
        }

        if let Some(country) = &self.viewer_country {
            let n = push_bind(&mut binds, BindValue::Text(country.clone()));
            conditions.push(format!(
                "((globally_available AND NOT (${n} = ANY(restricted_countries))) \
                 OR ((NOT globally_available) \
                     AND ${n} = ANY(available_countries) \
                     AND NOT (${n} = ANY(restricted_countries))))",
                n = n
            ));
        }

        let clause = if conditions.is_empty() {
            "TRUE".to_string()
        } else {
            conditions.join(" AND ")
        };

        SqlFragment { clause, binds }
    }

    /// Evaluate the predicate against an in-memory content record
    pub fn matches(&self, content: &Content) -> bool {
        if !self.exclude_active_check && !content.is_active {
            return false;
        }

        if !self.statuses.is_empty() && !self.statuses.contains(&content.status) {
            return false;
        }

        if !self.content_types.is_empty() && !self.content_types.contains(&content.content_type)
        {
            return false;
        }

        if !self.genres.is_empty() && !content.has_any_genre(&self.genres) {
            return false;
        }

        if !self.languages.is_empty() {
            match &content.language {
                Some(lang) => {
                    if !self.languages.iter().any(|l| l.eq_ignore_ascii_case(lang)) {
                        return false;
                    }
                }
                None => return false,
            }
        }

        if !self.age_ratings.is_empty() && !self.age_ratings.contains(&content.age_rating) {
            return false;
        }

        if let Some(min) = self.release_year_min {
            if content.release_year < min {
                return false;
            }
        }

        if let Some(max) = self.release_year_max {
            if content.release_year > max {
                return false;
            }
        }

        if let Some(featured) = self.featured {
            if content.is_featured() != featured {
                return false;
            }
        }

        if let Some(year) = self.upcoming_after {
            let upcoming = content.release_year > year
                || matches!(
                    content.status,
                    ContentStatus::Draft | ContentStatus::Processing
                );
            if !upcoming {
                return false;
            }
        }

        if let Some(term) = &self.search_term {
            if !base_search_matches(content, term) {
                return false;
            }
        }

        if self.kid_safe {
            let rating_ok = CHILD_SAFE_RATINGS.contains(&content.age_rating);
            let genre_ok = content
                .genres
                .iter()
                .any(|g| crate::types::is_child_safe_genre(g));
            if !rating_ok || !genre_ok {
                return false;
            }
        }

        if self.viewer_country.is_some()
            && !geo::is_available(content, self.viewer_country.as_deref())
        {
            return false;
        }

        true
    }
}

/// Base free-text inclusion condition for search
///
/// A record appears in search results only if the term substring-matches
/// title, subtitle, description, or type, or appears inside any element of
/// cast, genres, directors, or characters.
pub fn base_search_matches(content: &Content, term: &str) -> bool {
    let term = term.to_lowercase();
    let contains = |s: &str| s.to_lowercase().contains(&term);
    let any_contains = |items: &[String]| items.iter().any(|s| contains(s));

    contains(&content.title)
        || content.subtitle.as_deref().is_some_and(contains)
        || content.description.as_deref().is_some_and(contains)
        || contains(content.content_type.as_str())
        || any_contains(&content.directors)
        || any_contains(&content.cast_members)
        || any_contains(&content.genres)
        || any_contains(&content.characters)
}

/// Escape LIKE metacharacters in a user-supplied search term
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AgeRating;

    fn movie(title: &str) -> Content {
        Content::new(ContentType::Movie, title, 2023, AgeRating::PG)
    }

    #[test]
    fn test_empty_predicate_matches_active_only() {
        let predicate = ContentPredicate::new();
        let mut content = movie("Anything");
        assert!(predicate.matches(&content));

        content.is_active = false;
        assert!(!predicate.matches(&content));
    }

    #[test]
    fn test_empty_predicate_sql_is_active_check() {
        let fragment = ContentPredicate::new().to_sql(1);
        assert_eq!(fragment.clause, "is_active = TRUE");
        assert!(fragment.binds.is_empty());
    }

    #[test]
    fn test_multi_value_dimension_ors_internally() {
        let predicate = ContentPredicate::new()
            .with_content_types(vec![ContentType::Movie, ContentType::Series]);

        assert!(predicate.matches(&movie("A")));

        let series = Content::new(ContentType::Series, "B", 2023, AgeRating::PG);
        assert!(predicate.matches(&series));

        let short = Content::new(ContentType::Short, "C", 2023, AgeRating::PG);
        assert!(!predicate.matches(&short));
    }

    #[test]
    fn test_dimensions_and_across() {
        let predicate = ContentPredicate::new()
            .with_content_types(vec![ContentType::Movie])
            .with_genres(vec!["Action".to_string()]);

        let mut content = movie("A");
        content.genres = vec!["Drama".to_string()];
        assert!(!predicate.matches(&content));

        content.genres = vec!["Action".to_string(), "Drama".to_string()];
        assert!(predicate.matches(&content));
    }

    #[test]
    fn test_upcoming_excludes_archived() {
        let predicate = ContentPredicate::new().upcoming_after(2023);

        let mut draft = movie("Coming Soon");
        draft.status = ContentStatus::Draft;
        assert!(predicate.matches(&draft));

        let mut future = movie("Next Year");
        future.status = ContentStatus::Published;
        future.release_year = 2024;
        assert!(predicate.matches(&future));

        let mut archived = movie("Taken Down");
        archived.status = ContentStatus::Archived;
        assert!(!predicate.matches(&archived));

        let fragment = predicate.to_sql(1);
        assert!(fragment
            .clause
            .contains("(release_year > $1 OR status IN ('draft', 'processing'))"));
    }

    #[test]
    fn test_genre_overlap_semantics() {
        let predicate =
            ContentPredicate::new().with_genres(vec!["Action".to_string(), "Comedy".to_string()]);

        let mut content = movie("A");
        content.genres = vec!["Comedy".to_string()];
        // overlap, not exact-set equality
        assert!(predicate.matches(&content));
    }

    #[test]
    fn test_release_year_range() {
        let predicate = ContentPredicate::new().with_release_years(Some(2020), Some(2024));

        let mut content = movie("A");
        content.release_year = 2019;
        assert!(!predicate.matches(&content));
        content.release_year = 2020;
        assert!(predicate.matches(&content));
        content.release_year = 2025;
        assert!(!predicate.matches(&content));
    }

    #[test]
    fn test_featured_filter() {
        let featured_only = ContentPredicate::new().with_featured(true);
        let mut content = movie("A");
        assert!(!featured_only.matches(&content));

        content.featured_at = Some(chrono::Utc::now());
        assert!(featured_only.matches(&content));
    }

    #[test]
    fn test_kid_safe_requires_both_rating_and_genre() {
        let predicate = ContentPredicate::new().child_safe();

        let mut content = movie("A");
        content.age_rating = AgeRating::PG;
        content.genres = vec!["Horror".to_string()];
        assert!(!predicate.matches(&content));

        content.genres = vec!["Animation".to_string()];
        assert!(predicate.matches(&content));

        content.age_rating = AgeRating::R;
        assert!(!predicate.matches(&content));
    }

    #[test]
    fn test_sql_placeholders_are_sequential_and_parameterized() {
        let fragment = ContentPredicate::new()
            .with_content_types(vec![ContentType::Movie])
            .with_genres(vec!["Action".to_string()])
            .with_release_years(Some(2020), None)
            .to_sql(3);

        assert!(fragment.clause.contains("content_type = ANY($3)"));
        assert!(fragment.clause.contains("genres && $4::text[]"));
        assert!(fragment.clause.contains("release_year >= $5"));
        assert_eq!(fragment.binds.len(), 3);
        // no literal values leak into the clause
        assert!(!fragment.clause.contains("Action"));
    }

    #[test]
    fn test_search_sql_reuses_single_bind() {
        let fragment = ContentPredicate::new().with_search_term("batman").to_sql(1);
        assert_eq!(fragment.binds.len(), 1);
        assert_eq!(fragment.binds[0], BindValue::Text("%batman%".to_string()));
        assert!(fragment.clause.contains("title ILIKE $1"));
        assert!(fragment.clause.contains("unnest(cast_members)"));
    }

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_base_search_matches_fields() {
        let mut content = movie("The Batman");
        assert!(base_search_matches(&content, "batman"));
        assert!(base_search_matches(&content, "BATMAN"));

        content.title = "Unrelated".to_string();
        content.cast_members = vec!["Robert Pattinson".to_string()];
        assert!(base_search_matches(&content, "pattinson"));

        content.cast_members.clear();
        assert!(!base_search_matches(&content, "batman"));
    }

    #[test]
    fn test_order_recency_sort_stable() {
        let mut a = movie("A");
        a.release_year = 2020;
        let mut b = movie("B");
        b.release_year = 2024;

        let mut items = vec![a.clone(), b.clone()];
        ContentOrder::Recency.sort(&mut items);
        assert_eq!(items[0].id, b.id);
        assert_eq!(items[1].id, a.id);
    }

    #[test]
    fn test_geo_conjunct_in_memory() {
        let predicate = ContentPredicate::new().geo_gated("DE");

        let mut content = movie("A");
        content.globally_available = false;
        content.available_countries = vec!["US".to_string()];
        assert!(!predicate.matches(&content));

        content.available_countries.push("DE".to_string());
        assert!(predicate.matches(&content));

        content.restricted_countries = vec!["DE".to_string()];
        assert!(!predicate.matches(&content));
    }
}

//! Administrative catalog and shelf management

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use vod_core::models::{Shelf, ShelfEntry};
use vod_core::repository::{CatalogRepository, ContentReader, ShelfRepository};
use vod_core::types::{AgeRating, ContentStatus, ContentType};
use vod_core::validation;
use vod_core::{CatalogError, Content, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateContentRequest {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub content_type: ContentType,
    #[serde(default)]
    pub genres: Vec<String>,
    pub duration_minutes: Option<i32>,
    pub release_year: i32,
    pub age_rating: AgeRating,
    pub language: Option<String>,
    #[serde(default)]
    pub cast_members: Vec<String>,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub available_countries: Vec<String>,
    #[serde(default)]
    pub restricted_countries: Vec<String>,
    #[serde(default)]
    pub globally_available: bool,
}

/// Partial update; absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContentRequest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub genres: Option<Vec<String>>,
    pub duration_minutes: Option<i32>,
    pub release_year: Option<i32>,
    pub age_rating: Option<AgeRating>,
    pub language: Option<String>,
    pub cast_members: Option<Vec<String>>,
    pub directors: Option<Vec<String>>,
    pub characters: Option<Vec<String>>,
    pub available_countries: Option<Vec<String>>,
    pub restricted_countries: Option<Vec<String>>,
    pub globally_available: Option<bool>,
    pub status: Option<ContentStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateShelfRequest {
    pub name: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub show_on_child_profile: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateShelfRequest {
    pub name: Option<String>,
    pub display_order: Option<i32>,
    pub show_on_child_profile: Option<bool>,
    pub is_active: Option<bool>,
}

/// Full replacement order for one shelf
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderShelfRequest {
    pub entries: Vec<ReorderEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReorderEntry {
    pub content_id: Uuid,
    pub display_order: i32,
    #[serde(default)]
    pub is_featured: bool,
}

pub struct AdminService {
    catalog: Arc<dyn CatalogRepository>,
    shelves: Arc<dyn ShelfRepository>,
}

impl AdminService {
    pub fn new(catalog: Arc<dyn CatalogRepository>, shelves: Arc<dyn ShelfRepository>) -> Self {
        Self { catalog, shelves }
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_content(&self, request: CreateContentRequest) -> Result<Content> {
        let title = validation::validate_display_name("title", &request.title)?;
        validation::validate_release_year(request.release_year)?;

        let mut content = Content::new(
            request.content_type,
            title,
            request.release_year,
            request.age_rating,
        );
        content.subtitle = request.subtitle;
        content.description = request.description;
        content.genres = request.genres;
        content.duration_minutes = request.duration_minutes;
        content.language = request
            .language
            .map(|l| validation::validate_language_code(&l))
            .transpose()?;
        content.cast_members = request.cast_members;
        content.directors = request.directors;
        content.characters = request.characters;
        content.available_countries = validate_countries(request.available_countries)?;
        content.restricted_countries = validate_countries(request.restricted_countries)?;
        content.globally_available = request.globally_available;

        self.catalog.insert(&content).await?;
        info!(content_id = %content.id, "content created");
        Ok(content)
    }

    #[instrument(skip(self, request))]
    pub async fn update_content(
        &self,
        id: Uuid,
        request: UpdateContentRequest,
    ) -> Result<Content> {
        let mut content = self
            .catalog
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("content {} not found", id)))?;

        if let Some(title) = request.title {
            content.title = validation::validate_display_name("title", &title)?;
        }
        if let Some(subtitle) = request.subtitle {
            content.subtitle = Some(subtitle);
        }
        if let Some(description) = request.description {
            content.description = Some(description);
        }
        if let Some(genres) = request.genres {
            content.genres = genres;
        }
        if let Some(duration) = request.duration_minutes {
            content.duration_minutes = Some(duration);
        }
        if let Some(year) = request.release_year {
            content.release_year = validation::validate_release_year(year)?;
        }
        if let Some(rating) = request.age_rating {
            content.age_rating = rating;
        }
        if let Some(language) = request.language {
            content.language = Some(validation::validate_language_code(&language)?);
        }
        if let Some(cast) = request.cast_members {
            content.cast_members = cast;
        }
        if let Some(directors) = request.directors {
            content.directors = directors;
        }
        if let Some(characters) = request.characters {
            content.characters = characters;
        }
        if let Some(countries) = request.available_countries {
            content.available_countries = validate_countries(countries)?;
        }
        if let Some(countries) = request.restricted_countries {
            content.restricted_countries = validate_countries(countries)?;
        }
        if let Some(global) = request.globally_available {
            content.globally_available = global;
        }
        if let Some(status) = request.status {
            content.status = status;
        }
        content.touch();

        self.catalog.update(&content).await?;
        Ok(content)
    }

    /// Mark or unmark a record as featured
    #[instrument(skip(self))]
    pub async fn set_featured(&self, id: Uuid, featured: bool) -> Result<Content> {
        let mut content = self
            .catalog
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("content {} not found", id)))?;

        content.featured_at = featured.then(Utc::now);
        content.touch();
        self.catalog.update(&content).await?;
        Ok(content)
    }

    /// Soft delete: the record disappears from every listing but stays
    /// joinable from watch history
    #[instrument(skip(self))]
    pub async fn delete_content(&self, id: Uuid) -> Result<()> {
        if !self.catalog.soft_delete(id).await? {
            return Err(CatalogError::not_found(format!("content {} not found", id)));
        }
        info!(content_id = %id, "content soft-deleted");
        Ok(())
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_shelf(&self, request: CreateShelfRequest) -> Result<Shelf> {
        let name = validation::validate_display_name("name", &request.name)?;
        let mut shelf = Shelf::new(name, request.display_order);
        shelf.show_on_child_profile = request.show_on_child_profile;
        self.shelves.insert(&shelf).await?;
        Ok(shelf)
    }

    #[instrument(skip(self, request))]
    pub async fn update_shelf(&self, id: Uuid, request: UpdateShelfRequest) -> Result<Shelf> {
        let mut shelf = self
            .shelves
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("shelf {} not found", id)))?;

        if let Some(name) = request.name {
            shelf.name = validation::validate_display_name("name", &name)?;
        }
        if let Some(order) = request.display_order {
            shelf.display_order = order;
        }
        if let Some(show) = request.show_on_child_profile {
            shelf.show_on_child_profile = show;
        }
        if let Some(active) = request.is_active {
            shelf.is_active = active;
        }

        self.shelves.update(&shelf).await?;
        Ok(shelf)
    }

    /// Replace a shelf's entries atomically; duplicate content ids in the
    /// request are a validation error
    #[instrument(skip(self, request), fields(entries = request.entries.len()))]
    pub async fn reorder_shelf(&self, id: Uuid, request: ReorderShelfRequest) -> Result<()> {
        let shelf = self
            .shelves
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("shelf {} not found", id)))?;

        let mut seen = Vec::with_capacity(request.entries.len());
        for entry in &request.entries {
            if seen.contains(&entry.content_id) {
                return Err(CatalogError::validation(format!(
                    "content {} appears twice in the shelf order",
                    entry.content_id
                )));
            }
            seen.push(entry.content_id);
        }

        let entries: Vec<ShelfEntry> = request
            .entries
            .into_iter()
            .map(|e| ShelfEntry {
                shelf_id: shelf.id,
                content_id: e.content_id,
                display_order: e.display_order,
                is_featured: e.is_featured,
            })
            .collect();

        self.shelves.replace_entries(shelf.id, &entries).await?;
        info!(shelf_id = %shelf.id, "shelf reordered");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_shelf_entry(&self, shelf_id: Uuid, content_id: Uuid) -> Result<()> {
        if !self.shelves.remove_entry(shelf_id, content_id).await? {
            return Err(CatalogError::not_found(format!(
                "content {} is not on shelf {}",
                content_id, shelf_id
            )));
        }
        Ok(())
    }
}

fn validate_countries(countries: Vec<String>) -> Result<Vec<String>> {
    countries
        .into_iter()
        .map(|c| validation::validate_country_code(&c))
        .collect()
}

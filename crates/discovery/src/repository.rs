//! Postgres implementations of the storage traits
//!
//! Queries are built at runtime: the predicate renders a parameterized
//! WHERE fragment and this module appends ordering and paging placeholders,
//! then binds everything in order. No user-supplied value is ever
//! interpolated into SQL text.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use vod_core::models::{Content, Episode, Season, Shelf, ShelfEntry};
use vod_core::pagination::{Page, PageRequest};
use vod_core::predicate::{BindValue, ContentOrder, ContentPredicate};
use vod_core::repository::{
    CatalogRepository, ContentReader, ShelfRepository, WatchStatsRepository,
};
use vod_core::types::{AgeRating, ContentStatus, ContentType};
use vod_core::Result;

const CONTENT_COLUMNS: &str = "id, title, subtitle, description, content_type, genres, \
     duration_minutes, release_year, age_rating, language, cast_members, directors, \
     characters, available_countries, restricted_countries, globally_available, status, \
     is_active, featured_at, created_at, updated_at";

fn content_from_row(row: &PgRow) -> Result<Content> {
    Ok(Content {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        subtitle: row.try_get("subtitle")?,
        description: row.try_get("description")?,
        content_type: ContentType::from_str(&row.try_get::<String, _>("content_type")?)?,
        genres: row.try_get("genres")?,
        duration_minutes: row.try_get("duration_minutes")?,
        release_year: row.try_get("release_year")?,
        age_rating: AgeRating::from_str(&row.try_get::<String, _>("age_rating")?)?,
        language: row.try_get("language")?,
        cast_members: row.try_get("cast_members")?,
        directors: row.try_get("directors")?,
        characters: row.try_get("characters")?,
        available_countries: row.try_get("available_countries")?,
        restricted_countries: row.try_get("restricted_countries")?,
        globally_available: row.try_get("globally_available")?,
        status: ContentStatus::from_str(&row.try_get::<String, _>("status")?)?,
        is_active: row.try_get("is_active")?,
        featured_at: row.try_get("featured_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn bind_all<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    binds: &[BindValue],
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    for bind in binds {
        query = match bind {
            BindValue::Text(v) => query.bind(v.clone()),
            BindValue::TextArray(v) => query.bind(v.clone()),
            BindValue::Int(v) => query.bind(*v),
        };
    }
    query
}

pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentReader for PostgresCatalogRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Content>> {
        let sql = format!("SELECT {} FROM content WHERE id = $1", CONTENT_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(content_from_row).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Content>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {} FROM content WHERE id = ANY($1)", CONTENT_COLUMNS);
        let rows = sqlx::query(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(content_from_row).collect()
    }
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn find_page(
        &self,
        predicate: &ContentPredicate,
        order: ContentOrder,
        page: PageRequest,
    ) -> Result<Page<Content>> {
        let total = self.count(predicate).await?;

        let fragment = predicate.to_sql(1);
        let limit_n = fragment.binds.len() + 1;
        let sql = format!(
            "SELECT {} FROM content WHERE {} ORDER BY {} LIMIT ${} OFFSET ${}",
            CONTENT_COLUMNS,
            fragment.clause,
            order.to_sql(),
            limit_n,
            limit_n + 1
        );

        let rows = bind_all(sqlx::query(&sql), &fragment.binds)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .iter()
            .map(content_from_row)
            .collect::<Result<Vec<_>>>()?;
        Ok(Page::new(items, page, total))
    }

    async fn find_candidates(
        &self,
        predicate: &ContentPredicate,
        order: ContentOrder,
        limit: u64,
    ) -> Result<Vec<Content>> {
        let fragment = predicate.to_sql(1);
        let sql = format!(
            "SELECT {} FROM content WHERE {} ORDER BY {} LIMIT ${}",
            CONTENT_COLUMNS,
            fragment.clause,
            order.to_sql(),
            fragment.binds.len() + 1
        );

        let rows = bind_all(sqlx::query(&sql), &fragment.binds)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(content_from_row).collect()
    }

    async fn count(&self, predicate: &ContentPredicate) -> Result<u64> {
        let fragment = predicate.to_sql(1);
        let sql = format!("SELECT COUNT(*) AS total FROM content WHERE {}", fragment.clause);

        let row = bind_all(sqlx::query(&sql), &fragment.binds)
            .fetch_one(&self.pool)
            .await?;
        let total: i64 = row.try_get("total")?;
        Ok(total as u64)
    }

    async fn insert(&self, content: &Content) -> Result<()> {
        sqlx::query(
            "INSERT INTO content (id, title, subtitle, description, content_type, genres, \
             duration_minutes, release_year, age_rating, language, cast_members, directors, \
             characters, available_countries, restricted_countries, globally_available, \
             status, is_active, featured_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21)",
        )
        .bind(content.id)
        .bind(&content.title)
        .bind(&content.subtitle)
        .bind(&content.description)
        .bind(content.content_type.as_str())
        .bind(&content.genres)
        .bind(content.duration_minutes)
        .bind(content.release_year)
        .bind(content.age_rating.as_str())
        .bind(&content.language)
        .bind(&content.cast_members)
        .bind(&content.directors)
        .bind(&content.characters)
        .bind(&content.available_countries)
        .bind(&content.restricted_countries)
        .bind(content.globally_available)
        .bind(content.status.as_str())
        .bind(content.is_active)
        .bind(content.featured_at)
        .bind(content.created_at)
        .bind(content.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, content: &Content) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE content SET title = $2, subtitle = $3, description = $4, \
             content_type = $5, genres = $6, duration_minutes = $7, release_year = $8, \
             age_rating = $9, language = $10, cast_members = $11, directors = $12, \
             characters = $13, available_countries = $14, restricted_countries = $15, \
             globally_available = $16, status = $17, is_active = $18, featured_at = $19, \
             updated_at = $20 WHERE id = $1",
        )
        .bind(content.id)
        .bind(&content.title)
        .bind(&content.subtitle)
        .bind(&content.description)
        .bind(content.content_type.as_str())
        .bind(&content.genres)
        .bind(content.duration_minutes)
        .bind(content.release_year)
        .bind(content.age_rating.as_str())
        .bind(&content.language)
        .bind(&content.cast_members)
        .bind(&content.directors)
        .bind(&content.characters)
        .bind(&content.available_countries)
        .bind(&content.restricted_countries)
        .bind(content.globally_available)
        .bind(content.status.as_str())
        .bind(content.is_active)
        .bind(content.featured_at)
        .bind(content.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE content SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_seasons(&self, series_id: Uuid) -> Result<Vec<Season>> {
        let rows = sqlx::query(
            "SELECT id, series_id, season_number, title FROM seasons \
             WHERE series_id = $1 ORDER BY season_number",
        )
        .bind(series_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(Season {
                    id: row.try_get("id")?,
                    series_id: row.try_get("series_id")?,
                    season_number: row.try_get("season_number")?,
                    title: row.try_get("title")?,
                })
            })
            .collect()
    }

    async fn find_episodes(&self, season_id: Uuid) -> Result<Vec<Episode>> {
        let rows = sqlx::query(
            "SELECT id, season_id, episode_number, title, description, duration_minutes \
             FROM episodes WHERE season_id = $1 ORDER BY episode_number",
        )
        .bind(season_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(Episode {
                    id: row.try_get("id")?,
                    season_id: row.try_get("season_id")?,
                    episode_number: row.try_get("episode_number")?,
                    title: row.try_get("title")?,
                    description: row.try_get("description")?,
                    duration_minutes: row.try_get("duration_minutes")?,
                })
            })
            .collect()
    }
}

pub struct PostgresShelfRepository {
    pool: PgPool,
}

impl PostgresShelfRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn shelf_from_row(row: &PgRow) -> Result<Shelf> {
    Ok(Shelf {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        display_order: row.try_get("display_order")?,
        show_on_child_profile: row.try_get("show_on_child_profile")?,
        is_active: row.try_get("is_active")?,
    })
}

#[async_trait]
impl ShelfRepository for PostgresShelfRepository {
    async fn list_active(&self) -> Result<Vec<Shelf>> {
        let rows = sqlx::query(
            "SELECT id, name, display_order, show_on_child_profile, is_active \
             FROM shelves WHERE is_active = TRUE ORDER BY display_order, id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(shelf_from_row).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Shelf>> {
        let row = sqlx::query(
            "SELECT id, name, display_order, show_on_child_profile, is_active \
             FROM shelves WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(shelf_from_row).transpose()
    }

    async fn entries_for(&self, shelf_ids: &[Uuid]) -> Result<Vec<ShelfEntry>> {
        if shelf_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            "SELECT shelf_id, content_id, display_order, is_featured FROM shelf_entries \
             WHERE shelf_id = ANY($1) ORDER BY display_order, content_id",
        )
        .bind(shelf_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(ShelfEntry {
                    shelf_id: row.try_get("shelf_id")?,
                    content_id: row.try_get("content_id")?,
                    display_order: row.try_get("display_order")?,
                    is_featured: row.try_get("is_featured")?,
                })
            })
            .collect()
    }

    async fn insert(&self, shelf: &Shelf) -> Result<()> {
        sqlx::query(
            "INSERT INTO shelves (id, name, display_order, show_on_child_profile, is_active) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(shelf.id)
        .bind(&shelf.name)
        .bind(shelf.display_order)
        .bind(shelf.show_on_child_profile)
        .bind(shelf.is_active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, shelf: &Shelf) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE shelves SET name = $2, display_order = $3, show_on_child_profile = $4, \
             is_active = $5 WHERE id = $1",
        )
        .bind(shelf.id)
        .bind(&shelf.name)
        .bind(shelf.display_order)
        .bind(shelf.show_on_child_profile)
        .bind(shelf.is_active)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_entries(&self, shelf_id: Uuid, entries: &[ShelfEntry]) -> Result<()> {
        // delete + reinsert in one transaction so readers never observe a
        // partially reordered shelf
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM shelf_entries WHERE shelf_id = $1")
            .bind(shelf_id)
            .execute(&mut *tx)
            .await?;

        for entry in entries {
            sqlx::query(
                "INSERT INTO shelf_entries (shelf_id, content_id, display_order, is_featured) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(shelf_id)
            .bind(entry.content_id)
            .bind(entry.display_order)
            .bind(entry.is_featured)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn remove_entry(&self, shelf_id: Uuid, content_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM shelf_entries WHERE shelf_id = $1 AND content_id = $2")
                .bind(shelf_id)
                .bind(content_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PostgresWatchStatsRepository {
    pool: PgPool,
}

impl PostgresWatchStatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WatchStatsRepository for PostgresWatchStatsRepository {
    async fn watch_counts(&self, since: DateTime<Utc>, limit: u64) -> Result<Vec<(Uuid, i64)>> {
        let rows = sqlx::query(
            "SELECT content_id, COUNT(DISTINCT profile_id) AS watch_count \
             FROM watch_history WHERE watched_at >= $1 \
             GROUP BY content_id ORDER BY watch_count DESC, content_id LIMIT $2",
        )
        .bind(since)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Ok((row.try_get("content_id")?, row.try_get("watch_count")?)))
            .collect()
    }
}

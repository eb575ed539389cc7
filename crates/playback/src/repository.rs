//! Postgres implementations of the playback storage traits

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use vod_core::models::{Content, ContentLike, WatchHistory, WatchlistEntry};
use vod_core::repository::{ContentReader, EngagementRepository, WatchHistoryRepository};
use vod_core::types::{AgeRating, ContentStatus, ContentType};
use vod_core::Result;

const CONTENT_COLUMNS: &str = "id, title, subtitle, description, content_type, genres, \
     duration_minutes, release_year, age_rating, language, cast_members, directors, \
     characters, available_countries, restricted_countries, globally_available, status, \
     is_active, featured_at, created_at, updated_at";

/// Read-only content lookups for progress validation and joins
pub struct PostgresContentReader {
    pool: PgPool,
}

impl PostgresContentReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

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

#[async_trait]
impl ContentReader for PostgresContentReader {
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

pub struct PostgresWatchHistoryRepository {
    pool: PgPool,
}

impl PostgresWatchHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn history_from_row(row: &PgRow) -> Result<WatchHistory> {
    Ok(WatchHistory {
        id: row.try_get("id")?,
        profile_id: row.try_get("profile_id")?,
        content_id: row.try_get("content_id")?,
        episode_id: row.try_get("episode_id")?,
        watch_duration_seconds: row.try_get("watch_duration_seconds")?,
        total_duration_seconds: row.try_get("total_duration_seconds")?,
        progress_percentage: row.try_get("progress_percentage")?,
        is_completed: row.try_get("is_completed")?,
        watched_at: row.try_get("watched_at")?,
    })
}

const HISTORY_COLUMNS: &str = "id, profile_id, content_id, episode_id, \
     watch_duration_seconds, total_duration_seconds, progress_percentage, \
     is_completed, watched_at";

#[async_trait]
impl WatchHistoryRepository for PostgresWatchHistoryRepository {
    async fn upsert(&self, record: &WatchHistory) -> Result<WatchHistory> {
        // the unique constraint is NULLS NOT DISTINCT, so movie rows
        // (episode_id IS NULL) conflict too and take the DO UPDATE path
        let sql = format!(
            "INSERT INTO watch_history (id, profile_id, content_id, episode_id, \
             watch_duration_seconds, total_duration_seconds, progress_percentage, \
             is_completed, watched_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (profile_id, content_id, episode_id) DO UPDATE SET \
             watch_duration_seconds = EXCLUDED.watch_duration_seconds, \
             total_duration_seconds = EXCLUDED.total_duration_seconds, \
             progress_percentage = EXCLUDED.progress_percentage, \
             is_completed = EXCLUDED.is_completed, \
             watched_at = EXCLUDED.watched_at \
             RETURNING {}",
            HISTORY_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(record.id)
            .bind(record.profile_id)
            .bind(record.content_id)
            .bind(record.episode_id)
            .bind(record.watch_duration_seconds)
            .bind(record.total_duration_seconds)
            .bind(record.progress_percentage)
            .bind(record.is_completed)
            .bind(record.watched_at)
            .fetch_one(&self.pool)
            .await?;

        history_from_row(&row)
    }

    async fn find_for_profile(&self, profile_id: Uuid, limit: u64) -> Result<Vec<WatchHistory>> {
        let sql = format!(
            "SELECT {} FROM watch_history WHERE profile_id = $1 \
             ORDER BY watched_at DESC, id LIMIT $2",
            HISTORY_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(profile_id)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(history_from_row).collect()
    }

    async fn find_resumable(&self, profile_id: Uuid, limit: u64) -> Result<Vec<WatchHistory>> {
        let sql = format!(
            "SELECT {} FROM watch_history WHERE profile_id = $1 \
             AND NOT is_completed AND progress_percentage > 0 \
             AND progress_percentage < $2 \
             ORDER BY watched_at DESC, id LIMIT $3",
            HISTORY_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(profile_id)
            .bind(vod_core::models::COMPLETION_THRESHOLD)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(history_from_row).collect()
    }

    async fn delete(&self, profile_id: Uuid, content_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM watch_history WHERE profile_id = $1 AND content_id = $2")
                .bind(profile_id)
                .bind(content_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PostgresEngagementRepository {
    pool: PgPool,
}

impl PostgresEngagementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EngagementRepository for PostgresEngagementRepository {
    async fn add_to_watchlist(&self, entry: &WatchlistEntry) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO watchlist (profile_id, content_id, added_at) VALUES ($1, $2, $3) \
             ON CONFLICT (profile_id, content_id) DO NOTHING",
        )
        .bind(entry.profile_id)
        .bind(entry.content_id)
        .bind(entry.added_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_from_watchlist(&self, profile_id: Uuid, content_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM watchlist WHERE profile_id = $1 AND content_id = $2")
                .bind(profile_id)
                .bind(content_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn watchlist_for_profile(&self, profile_id: Uuid) -> Result<Vec<WatchlistEntry>> {
        let rows = sqlx::query(
            "SELECT profile_id, content_id, added_at FROM watchlist \
             WHERE profile_id = $1 ORDER BY added_at DESC, content_id",
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(WatchlistEntry {
                    profile_id: row.try_get("profile_id")?,
                    content_id: row.try_get("content_id")?,
                    added_at: row.try_get("added_at")?,
                })
            })
            .collect()
    }

    async fn like(&self, entry: &ContentLike) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO content_likes (profile_id, content_id, liked_at) VALUES ($1, $2, $3) \
             ON CONFLICT (profile_id, content_id) DO NOTHING",
        )
        .bind(entry.profile_id)
        .bind(entry.content_id)
        .bind(entry.liked_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn unlike(&self, profile_id: Uuid, content_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM content_likes WHERE profile_id = $1 AND content_id = $2")
                .bind(profile_id)
                .bind(content_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn like_count(&self, content_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM content_likes WHERE content_id = $1")
            .bind(content_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("total")?)
    }
}

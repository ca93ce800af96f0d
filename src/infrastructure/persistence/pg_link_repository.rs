//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{JumpType, NewShortLink, ShortLink};
use crate::domain::repositories::{LinkRepository, LinkSummary};
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, slug, destination, jump_type, description, click_count, \
                            is_active, created_at, updated_at";

/// PostgreSQL repository for short link storage and retrieval.
///
/// All statements are parameterized. Prefix candidates are ordered with the
/// `C` collation so the database order matches byte-wise string comparison.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Builds an `ILIKE` pattern matching `term` anywhere, with `%`, `_` and
/// `\` in the term taken literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Debug, FromRow)]
struct LinkRow {
    id: i64,
    slug: String,
    destination: String,
    jump_type: String,
    description: String,
    click_count: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LinkRow> for ShortLink {
    type Error = AppError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        let jump_type: JumpType = row.jump_type.parse().map_err(|e| {
            AppError::internal(
                "Stored link has an unknown jump type",
                json!({ "id": row.id, "reason": format!("{e}") }),
            )
        })?;

        Ok(ShortLink {
            id: row.id,
            slug: row.slug,
            destination: row.destination,
            jump_type,
            description: row.description,
            click_count: row.click_count,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_links(rows: Vec<LinkRow>) -> Result<Vec<ShortLink>, AppError> {
    rows.into_iter().map(ShortLink::try_from).collect()
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn find_exact_active(&self, slug: &str) -> Result<Option<ShortLink>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM short_links \
             WHERE slug = $1 AND is_active AND jump_type IN ('simple', 'forward')"
        );

        sqlx::query_as::<_, LinkRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(ShortLink::try_from)
            .transpose()
    }

    async fn list_active_prefix_links(&self) -> Result<Vec<ShortLink>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM short_links \
             WHERE is_active AND jump_type IN ('prefix', 'prefix-forward') \
             ORDER BY slug COLLATE \"C\" DESC"
        );

        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        into_links(rows)
    }

    async fn increment_clicks(&self, id: i64) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE short_links SET click_count = click_count + 1, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM short_links WHERE id = $1");

        sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(ShortLink::try_from)
            .transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortLink>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM short_links WHERE slug = $1");

        sqlx::query_as::<_, LinkRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(ShortLink::try_from)
            .transpose()
    }

    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let sql = format!(
            "INSERT INTO short_links (slug, destination, jump_type, description, is_active) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {LINK_COLUMNS}"
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(&new_link.slug)
            .bind(&new_link.destination)
            .bind(new_link.jump_type.as_str())
            .bind(&new_link.description)
            .bind(new_link.is_active)
            .fetch_one(self.pool.as_ref())
            .await?;

        row.try_into()
    }

    async fn update(&self, id: i64, link: NewShortLink) -> Result<ShortLink, AppError> {
        let sql = format!(
            "UPDATE short_links \
             SET slug = $2, destination = $3, jump_type = $4, description = $5, \
                 is_active = $6, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {LINK_COLUMNS}"
        );

        sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id)
            .bind(&link.slug)
            .bind(&link.destination)
            .bind(link.jump_type.as_str())
            .bind(&link.description)
            .bind(link.is_active)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))?
            .try_into()
    }

    async fn set_active(&self, id: i64, is_active: bool) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE short_links SET is_active = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(is_active)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM short_links WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, search: Option<String>) -> Result<Vec<ShortLink>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM short_links \
             WHERE $1::text IS NULL \
                OR slug ILIKE $1 ESCAPE '\\' \
                OR destination ILIKE $1 ESCAPE '\\' \
                OR description ILIKE $1 ESCAPE '\\' \
             ORDER BY created_at DESC, id DESC"
        );

        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(search.as_deref().map(contains_pattern))
            .fetch_all(self.pool.as_ref())
            .await?;

        into_links(rows)
    }

    async fn summary(&self) -> Result<LinkSummary, AppError> {
        let (total_links, active_links, total_clicks): (i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE is_active), \
                    COALESCE(SUM(click_count), 0)::BIGINT \
             FROM short_links",
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(LinkSummary {
            total_links,
            active_links,
            total_clicks,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}

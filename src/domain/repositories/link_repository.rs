//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Aggregated counters over all stored links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkSummary {
    pub total_links: i64,
    pub active_links: i64,
    pub total_clicks: i64,
}

/// Repository interface for managing short links.
///
/// The redirect path only needs [`find_exact_active`](Self::find_exact_active),
/// [`list_active_prefix_links`](Self::list_active_prefix_links) and
/// [`increment_clicks`](Self::increment_clicks); the remaining methods back the
/// admin tooling. Records handed out by the repository are assumed to already
/// satisfy the write-time invariants.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds an active `simple` or `forward` link whose slug equals `slug`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_exact_active(&self, slug: &str) -> Result<Option<ShortLink>, AppError>;

    /// Lists all active `prefix` and `prefix-forward` links, ordered by slug
    /// descending.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_active_prefix_links(&self) -> Result<Vec<ShortLink>, AppError>;

    /// Adds one click to the link and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_clicks(&self, id: i64) -> Result<(), AppError>;

    /// Finds a link by id regardless of its active flag.
    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError>;

    /// Finds a link by slug regardless of its active flag or jump type.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortLink>, AppError>;

    /// Stores a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Replaces all editable fields of an existing link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    /// Returns [`AppError::Conflict`] if the new slug is already taken.
    async fn update(&self, id: i64, link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Sets the active flag. Returns `Ok(false)` if no link has this id.
    async fn set_active(&self, id: i64, is_active: bool) -> Result<bool, AppError>;

    /// Deletes a link. Returns `Ok(false)` if no link has this id.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Lists links newest first, optionally filtered by a case-insensitive
    /// search over slug, destination and description.
    async fn list(&self, search: Option<String>) -> Result<Vec<ShortLink>, AppError>;

    /// Returns link and click totals.
    async fn summary(&self) -> Result<LinkSummary, AppError>;

    /// Checks that the backing store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}

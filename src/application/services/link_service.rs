//! Link resolution and management service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::domain::entities::{LinkPatch, NewShortLink, ShortLink};
use crate::domain::repositories::{LinkRepository, LinkSummary};
use crate::domain::resolver::select_prefix;
use crate::domain::rewriter::rewrite;
use crate::error::AppError;
use crate::utils::link_validator::validate_new_link;

/// A link matched for a request path.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLink {
    pub link: ShortLink,
    /// Part of the request path after the matched prefix slug; empty for
    /// exact matches.
    pub suffix: String,
}

impl ResolvedLink {
    /// Rewrites the link destination for the given incoming query.
    pub fn target(&self, query: &[(String, String)]) -> String {
        rewrite(
            &self.link.destination,
            self.link.jump_type,
            &self.suffix,
            query,
        )
    }
}

/// Service for resolving request paths and managing short links.
///
/// All writes pass through [`validate_new_link`], so the resolver can assume
/// well-formed records.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Resolves a request path (without the `/go/` prefix) to a link.
    ///
    /// An active exact-type link wins; otherwise the greatest matching
    /// active prefix-type slug is chosen.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no active link matches.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn resolve(&self, path: &str) -> Result<ResolvedLink, AppError> {
        if let Some(link) = self.link_repository.find_exact_active(path).await? {
            debug!(slug = %link.slug, "Exact match");
            return Ok(ResolvedLink {
                link,
                suffix: String::new(),
            });
        }

        let candidates = self.link_repository.list_active_prefix_links().await?;

        select_prefix(path, &candidates)
            .map(|resolution| {
                debug!(slug = %resolution.link.slug, suffix = resolution.suffix, "Prefix match");
                ResolvedLink {
                    link: resolution.link.clone(),
                    suffix: resolution.suffix.to_string(),
                }
            })
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "path": path })))
    }

    /// Checks that the link store is reachable.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }

    /// Normalizes, validates and stores a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the link violates a record invariant.
    /// Returns [`AppError::Conflict`] if the slug is already taken.
    pub async fn create_link(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let new_link = new_link.normalized();
        validate_new_link(&new_link)?;

        if self
            .link_repository
            .find_by_slug(&new_link.slug)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Slug already exists",
                json!({ "slug": new_link.slug }),
            ));
        }

        let link = self.link_repository.create(new_link).await?;
        info!(id = link.id, slug = %link.slug, "Short link created");
        Ok(link)
    }

    /// Applies a partial update, re-validating the resulting record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    /// Returns [`AppError::Validation`] if the updated link is invalid.
    /// Returns [`AppError::Conflict`] if the new slug belongs to another link.
    pub async fn update_link(&self, id: i64, patch: LinkPatch) -> Result<ShortLink, AppError> {
        let existing = self.get_link(id).await?;
        let updated = patch.apply(&existing).normalized();
        validate_new_link(&updated)?;

        if updated.slug != existing.slug
            && let Some(other) = self.link_repository.find_by_slug(&updated.slug).await?
            && other.id != id
        {
            return Err(AppError::conflict(
                "Slug already exists",
                json!({ "slug": updated.slug }),
            ));
        }

        let link = self.link_repository.update(id, updated).await?;
        info!(id = link.id, slug = %link.slug, "Short link updated");
        Ok(link)
    }

    /// Flips the active flag and returns the updated link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn toggle_active(&self, id: i64) -> Result<ShortLink, AppError> {
        let mut link = self.get_link(id).await?;
        let is_active = !link.is_active;

        if !self.link_repository.set_active(id, is_active).await? {
            return Err(not_found_by_id(id));
        }

        link.is_active = is_active;
        info!(id, slug = %link.slug, is_active, "Short link toggled");
        Ok(link)
    }

    /// Deletes a link and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn delete_link(&self, id: i64) -> Result<ShortLink, AppError> {
        let link = self.get_link(id).await?;

        if !self.link_repository.delete(id).await? {
            return Err(not_found_by_id(id));
        }

        info!(id, slug = %link.slug, "Short link deleted");
        Ok(link)
    }

    /// Retrieves a link by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn get_link(&self, id: i64) -> Result<ShortLink, AppError> {
        self.link_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_by_id(id))
    }

    /// Lists links newest first, optionally filtered by a search term.
    ///
    /// Blank search terms are treated as no filter.
    pub async fn list_links(&self, search: Option<&str>) -> Result<Vec<ShortLink>, AppError> {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self.link_repository.list(search).await
    }

    /// Returns link and click totals.
    pub async fn summary(&self) -> Result<LinkSummary, AppError> {
        self.link_repository.summary().await
    }
}

fn not_found_by_id(id: i64) -> AppError {
    AppError::not_found("Short link not found", json!({ "id": id }))
}

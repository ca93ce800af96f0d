//! Short link entity and jump type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// How a short link is matched against a request path and how its
/// destination is rewritten.
///
/// | Jump type        | Matching | Query forwarding |
/// |------------------|----------|------------------|
/// | `simple`         | exact    | no               |
/// | `forward`        | exact    | yes              |
/// | `prefix`         | prefix   | no               |
/// | `prefix-forward` | prefix   | yes              |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JumpType {
    #[default]
    Simple,
    Forward,
    Prefix,
    PrefixForward,
}

impl JumpType {
    pub const ALL: [JumpType; 4] = [
        JumpType::Simple,
        JumpType::Forward,
        JumpType::Prefix,
        JumpType::PrefixForward,
    ];

    /// Database and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            JumpType::Simple => "simple",
            JumpType::Forward => "forward",
            JumpType::Prefix => "prefix",
            JumpType::PrefixForward => "prefix-forward",
        }
    }

    /// Resolved only when the request path equals the slug.
    pub fn is_exact(&self) -> bool {
        matches!(self, JumpType::Simple | JumpType::Forward)
    }

    /// Resolved when the slug is a string prefix of the request path.
    pub fn is_prefix(&self) -> bool {
        matches!(self, JumpType::Prefix | JumpType::PrefixForward)
    }

    /// Incoming query parameters are merged into the destination.
    pub fn is_forwarding(&self) -> bool {
        matches!(self, JumpType::Forward | JumpType::PrefixForward)
    }
}

impl fmt::Display for JumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown jump type '{0}' (expected simple, forward, prefix or prefix-forward)")]
pub struct UnknownJumpType(pub String);

impl FromStr for JumpType {
    type Err = UnknownJumpType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JumpType::ALL
            .into_iter()
            .find(|jump_type| jump_type.as_str() == s)
            .ok_or_else(|| UnknownJumpType(s.to_string()))
    }
}

/// A slug to destination mapping as stored by the link repository.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortLink {
    pub id: i64,
    pub slug: String,
    pub destination: String,
    pub jump_type: JumpType,
    pub description: String,
    pub click_count: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShortLink {
    /// Creates an active link with no clicks and no description.
    pub fn new(
        id: i64,
        slug: impl Into<String>,
        destination: impl Into<String>,
        jump_type: JumpType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            slug: slug.into(),
            destination: destination.into(),
            jump_type,
            description: String::new(),
            click_count: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Path under which the link is served, e.g. `/go/docs/`.
    pub fn short_path(&self) -> String {
        format!("/go/{}", self.slug)
    }
}

/// Input data for creating or fully replacing a link.
///
/// Length limits are checked through [`Validate`]; scheme and slug rules live
/// in [`crate::utils::link_validator::validate_new_link`].
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewShortLink {
    #[validate(length(min = 1, max = 255, message = "Slug must be 1-255 characters"))]
    pub slug: String,

    #[validate(length(min = 1, max = 2048, message = "Destination must be 1-2048 characters"))]
    pub destination: String,

    pub jump_type: JumpType,

    pub description: String,

    pub is_active: bool,
}

impl NewShortLink {
    pub fn new(slug: impl Into<String>, destination: impl Into<String>, jump_type: JumpType) -> Self {
        Self {
            slug: slug.into(),
            destination: destination.into(),
            jump_type,
            description: String::new(),
            is_active: true,
        }
    }

    /// Canonical form stored in the repository.
    ///
    /// Leading slashes are dropped from the slug, and so are trailing slashes
    /// for exact jump types. Surrounding whitespace is trimmed.
    pub fn normalized(mut self) -> Self {
        let slug = self.slug.trim().trim_start_matches('/');
        let slug = if self.jump_type.is_exact() {
            slug.trim_end_matches('/')
        } else {
            slug
        };
        self.slug = slug.to_string();
        self.destination = self.destination.trim().to_string();
        self.description = self.description.trim().to_string();
        self
    }
}

impl From<&ShortLink> for NewShortLink {
    fn from(link: &ShortLink) -> Self {
        Self {
            slug: link.slug.clone(),
            destination: link.destination.clone(),
            jump_type: link.jump_type,
            description: link.description.clone(),
            is_active: link.is_active,
        }
    }
}

/// Partial update for an existing link. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct LinkPatch {
    pub slug: Option<String>,
    pub destination: Option<String>,
    pub jump_type: Option<JumpType>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl LinkPatch {
    /// Applies the patch on top of an existing link.
    pub fn apply(self, link: &ShortLink) -> NewShortLink {
        let mut updated = NewShortLink::from(link);
        if let Some(slug) = self.slug {
            updated.slug = slug;
        }
        if let Some(destination) = self.destination {
            updated.destination = destination;
        }
        if let Some(jump_type) = self.jump_type {
            updated.jump_type = jump_type;
        }
        if let Some(description) = self.description {
            updated.description = description;
        }
        if let Some(is_active) = self.is_active {
            updated.is_active = is_active;
        }
        updated
    }
}

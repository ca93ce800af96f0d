//! Write-time validation of short link records.
//!
//! Every invariant a stored link must satisfy is checked here, once, before
//! the record reaches the repository. The resolver and rewriter rely on these
//! checks and never re-validate.

use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;
use url::Url;
use validator::Validate;

use crate::domain::entities::{JumpType, NewShortLink};
use crate::error::AppError;

/// `scheme:rest`, scheme per RFC 3986.
static SCHEME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^([A-Za-z][A-Za-z0-9+.\-]*):(.*)$").unwrap());

/// Characters that would break routing or query parsing if used in a slug.
const FORBIDDEN_SLUG_CHARS: &[char] = &['?', '#', '&', ' '];

/// Reasons a slug or destination is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkValidationError {
    #[error("Slug cannot be empty")]
    EmptySlug,

    #[error("Slug cannot contain spaces, ?, #, or & characters")]
    ForbiddenSlugCharacter(char),

    #[error("Slug cannot start with a slash")]
    LeadingSlash,

    #[error("Prefix mode slugs must end with a slash (e.g. \"my-prefix/\")")]
    PrefixSlugWithoutTrailingSlash,

    #[error("Exact mode slugs must not end with a slash")]
    ExactSlugWithTrailingSlash,

    #[error("Destination must start with a URI scheme such as https:, mailto: or tel:")]
    MissingScheme,

    #[error("Invalid {scheme} URL: {reason}")]
    InvalidWebUrl { scheme: String, reason: String },

    #[error("mailto: destination must contain an address with @")]
    InvalidMailto,

    #[error("tel: destination may only contain digits, +, -, parentheses and spaces")]
    InvalidTel,

    #[error("Destination has no content after the {0}: scheme")]
    EmptySchemeContent(String),
}

impl LinkValidationError {
    /// Name of the record field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptySlug
            | Self::ForbiddenSlugCharacter(_)
            | Self::LeadingSlash
            | Self::PrefixSlugWithoutTrailingSlash
            | Self::ExactSlugWithTrailingSlash => "slug",
            _ => "destination",
        }
    }
}

impl From<LinkValidationError> for AppError {
    fn from(err: LinkValidationError) -> Self {
        AppError::bad_request(err.to_string(), json!({ "field": err.field() }))
    }
}

/// Validates a slug for the given jump type.
///
/// # Rules
///
/// - Non-empty, no leading `/`
/// - No `?`, `#`, `&` or space
/// - Prefix types must end with `/`, exact types must not
///
/// # Errors
///
/// Returns the first violated rule.
pub fn validate_slug(slug: &str, jump_type: JumpType) -> Result<(), LinkValidationError> {
    if slug.is_empty() {
        return Err(LinkValidationError::EmptySlug);
    }

    if let Some(c) = slug.chars().find(|c| FORBIDDEN_SLUG_CHARS.contains(c)) {
        return Err(LinkValidationError::ForbiddenSlugCharacter(c));
    }

    if slug.starts_with('/') {
        return Err(LinkValidationError::LeadingSlash);
    }

    match (jump_type.is_prefix(), slug.ends_with('/')) {
        (true, false) => Err(LinkValidationError::PrefixSlugWithoutTrailingSlash),
        (false, true) => Err(LinkValidationError::ExactSlugWithTrailingSlash),
        _ => Ok(()),
    }
}

/// Validates a destination URI according to its scheme.
///
/// # Rules
///
/// - `http` / `https`: well-formed absolute URL with a host
/// - `mailto`: an `@` before any `?`
/// - `tel`: digits, `+`, `-`, `(`, `)` and spaces only, at least one digit
/// - any other scheme: non-empty content after the colon
///
/// # Examples
///
/// ```
/// use golinks::utils::link_validator::validate_destination;
///
/// assert!(validate_destination("https://example.com/docs").is_ok());
/// assert!(validate_destination("customscheme:payload").is_ok());
/// assert!(validate_destination("mailto:nouser").is_err());
/// assert!(validate_destination("tel:abc").is_err());
/// assert!(validate_destination("customscheme:").is_err());
/// ```
pub fn validate_destination(destination: &str) -> Result<(), LinkValidationError> {
    let captures = SCHEME_REGEX
        .captures(destination)
        .ok_or(LinkValidationError::MissingScheme)?;
    let scheme = captures[1].to_ascii_lowercase();
    let rest = captures.get(2).map_or("", |m| m.as_str());

    match scheme.as_str() {
        "http" | "https" => validate_web_url(&scheme, destination, rest),
        "mailto" => {
            let address = rest.split('?').next().unwrap_or_default();
            if address.contains('@') {
                Ok(())
            } else {
                Err(LinkValidationError::InvalidMailto)
            }
        }
        "tel" => {
            let allowed = rest
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '));
            if allowed && rest.chars().any(|c| c.is_ascii_digit()) {
                Ok(())
            } else {
                Err(LinkValidationError::InvalidTel)
            }
        }
        _ if rest.trim().is_empty() => Err(LinkValidationError::EmptySchemeContent(scheme)),
        _ => Ok(()),
    }
}

fn validate_web_url(scheme: &str, destination: &str, rest: &str) -> Result<(), LinkValidationError> {
    let invalid = |reason: &str| LinkValidationError::InvalidWebUrl {
        scheme: scheme.to_string(),
        reason: reason.to_string(),
    };

    // The url crate accepts `http:host`; absolute URLs need `//`.
    if !rest.starts_with("//") {
        return Err(invalid("expected '//' after the scheme"));
    }

    let url = Url::parse(destination).map_err(|e| invalid(&e.to_string()))?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid("missing host")),
    }
}

/// Validates a normalized link before it is written.
///
/// Checks field lengths through [`Validate`], then slug and destination rules.
///
/// # Errors
///
/// Returns [`AppError::Validation`] describing the first violation.
pub fn validate_new_link(link: &NewShortLink) -> Result<(), AppError> {
    link.validate()?;
    validate_slug(&link.slug, link.jump_type)?;
    validate_destination(&link.destination)?;
    Ok(())
}

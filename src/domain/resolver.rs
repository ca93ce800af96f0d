//! Matching of request paths against short link slugs.
//!
//! Resolution is a pure function over a snapshot of records:
//!
//! 1. An active exact-type link (`simple` / `forward`) whose slug equals the
//!    path wins unconditionally, with an empty suffix.
//! 2. Otherwise every active prefix-type link (`prefix` / `prefix-forward`)
//!    whose slug is a string prefix of the path is a candidate, and the
//!    candidate with the lexicographically greatest slug wins. The suffix is
//!    the remainder of the path after that slug.
//!
//! The tie-break compares slugs byte-wise, not by length. Every candidate is
//! a prefix of the same path, so any two candidates are prefixes of each
//! other and the greatest one is also the longest one.

use crate::domain::entities::ShortLink;

/// The matched link and the part of the path it did not consume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'a> {
    pub link: &'a ShortLink,
    pub suffix: &'a str,
}

/// Resolves `path` against a full snapshot of links.
///
/// Inactive links are ignored. Returns `None` when nothing matches.
pub fn resolve<'a>(path: &'a str, links: &'a [ShortLink]) -> Option<Resolution<'a>> {
    find_exact(path, links).or_else(|| select_prefix(path, links))
}

/// Exact step of [`resolve`].
pub fn find_exact<'a>(path: &'a str, links: &'a [ShortLink]) -> Option<Resolution<'a>> {
    links
        .iter()
        .find(|link| link.is_active && link.jump_type.is_exact() && link.slug == path)
        .map(|link| Resolution { link, suffix: "" })
}

/// Prefix step of [`resolve`]: picks the greatest matching prefix slug.
///
/// Candidates may arrive in any order; non-prefix and inactive links are
/// skipped.
pub fn select_prefix<'a>(path: &'a str, candidates: &'a [ShortLink]) -> Option<Resolution<'a>> {
    candidates
        .iter()
        .filter(|link| link.is_active && link.jump_type.is_prefix())
        .filter(|link| path.starts_with(link.slug.as_str()))
        .max_by(|a, b| a.slug.cmp(&b.slug))
        .map(|link| Resolution {
            link,
            suffix: &path[link.slug.len()..],
        })
}

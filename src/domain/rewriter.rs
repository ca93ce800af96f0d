//! Destination rewriting for matched links.
//!
//! Shared by the live redirect handler and the static page generator. The
//! rewriter trusts that the destination already passed write-time validation
//! and performs no checks of its own.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::borrow::Cow;
use url::form_urlencoded;

use crate::domain::entities::JumpType;

/// Computes the final redirect target for a matched link.
///
/// # Rules
///
/// 1. Prefix types append a non-empty `suffix` to the destination, joined by
///    exactly one `/`.
/// 2. Forwarding types merge `query` into the destination's query string.
///    Incoming keys overwrite existing ones; for repeated keys the last
///    occurrence wins.
/// 3. Anything else returns the destination unchanged.
///
/// # Examples
///
/// ```
/// use golinks::domain::entities::JumpType;
/// use golinks::domain::rewriter::rewrite;
///
/// let target = rewrite("https://x.com/d", JumpType::Prefix, "guide", &[]);
/// assert_eq!(target, "https://x.com/d/guide");
///
/// let query = vec![("a".to_string(), "2".to_string())];
/// let target = rewrite("https://x.com/?a=1", JumpType::Forward, "", &query);
/// assert_eq!(target, "https://x.com/?a=2");
/// ```
pub fn rewrite(
    destination: &str,
    jump_type: JumpType,
    suffix: &str,
    query: &[(String, String)],
) -> String {
    let mut target = if jump_type.is_prefix() && !suffix.is_empty() {
        join_suffix(destination, suffix)
    } else {
        destination.to_string()
    };

    if jump_type.is_forwarding() && !query.is_empty() {
        target = merge_query(&target, query);
    }

    target
}

/// Joins a path suffix onto a destination with exactly one `/` between them.
pub fn join_suffix(destination: &str, suffix: &str) -> String {
    match (destination.ends_with('/'), suffix.starts_with('/')) {
        (false, false) => format!("{destination}/{suffix}"),
        (true, true) => format!("{destination}{}", &suffix[1..]),
        _ => format!("{destination}{suffix}"),
    }
}

/// Replaces the query component of `uri` with its existing pairs merged with
/// `incoming`.
///
/// Everything before `?` and the `#fragment` are kept verbatim. Keys keep the
/// position of their first appearance; values come from their last one.
pub fn merge_query(uri: &str, incoming: &[(String, String)]) -> String {
    let (without_fragment, fragment) = match uri.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (uri, None),
    };
    let (base, existing) = without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""));

    let incoming_pairs = incoming
        .iter()
        .map(|(key, value)| (Cow::Borrowed(key.as_str()), Cow::Borrowed(value.as_str())));

    let mut merged: Vec<(String, String)> = Vec::new();
    for (key, value) in form_urlencoded::parse(existing.as_bytes()).chain(incoming_pairs) {
        match merged.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value.into_owned(),
            None => merged.push((key.into_owned(), value.into_owned())),
        }
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(&merged)
        .finish();

    let mut target = String::with_capacity(base.len() + query.len() + 2);
    target.push_str(base);
    if !query.is_empty() {
        target.push('?');
        target.push_str(&query);
    }
    if let Some(fragment) = fragment {
        target.push('#');
        target.push_str(fragment);
    }
    target
}

/// Bytes escaped when a target goes into a `Location` header. Reserved
/// characters and existing `%XX` escapes pass through untouched.
const LOCATION_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Converts an IRI target into an ASCII-only URI.
///
/// Non-ASCII characters (from a decoded path suffix or an internationalized
/// destination) are written as percent-encoded UTF-8.
///
/// ```
/// use golinks::domain::rewriter::to_location;
///
/// assert_eq!(
///     to_location("https://en.wikipedia.org/wiki/Café"),
///     "https://en.wikipedia.org/wiki/Caf%C3%A9"
/// );
/// ```
pub fn to_location(target: &str) -> String {
    utf8_percent_encode(target, LOCATION_ESCAPES).to_string()
}

/// Decodes a raw `application/x-www-form-urlencoded` query string into
/// ordered pairs, keeping duplicates.
pub fn parse_query_pairs(raw: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect()
}

//! Core domain entities.
//!
//! - [`ShortLink`] - A stored slug to destination mapping
//! - [`NewShortLink`] - Input for creating or replacing a link
//! - [`LinkPatch`] - Partial update applied on top of an existing link
//! - [`JumpType`] - Matching and forwarding mode of a link

pub mod link;

pub use link::{JumpType, LinkPatch, NewShortLink, ShortLink, UnknownJumpType};

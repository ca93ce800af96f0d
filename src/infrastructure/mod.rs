//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`static_pages`] - Template substitution and page files for the generator

pub mod persistence;
pub mod static_pages;

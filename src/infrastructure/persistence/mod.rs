//! PostgreSQL repository implementations.
//!
//! - [`PgLinkRepository`] - Short link storage, prefix candidate scans and
//!   click counters

pub mod pg_link_repository;

pub use pg_link_repository::PgLinkRepository;

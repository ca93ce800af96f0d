//! Helper functions shared across layers.
//!
//! - [`link_validator`] - Write-time validation of slugs and destinations

pub mod link_validator;

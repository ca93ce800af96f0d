//! Application layer: orchestration on top of the domain.
//!
//! - [`services::LinkService`] - Request path resolution and link management
//! - [`generator`] - Static redirect page generation from a definition file

pub mod generator;
pub mod services;

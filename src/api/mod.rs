//! HTTP layer for the live redirect service.
//!
//! # Modules
//!
//! - [`dto`] - Response bodies
//! - [`handlers`] - Redirect, health and fallback handlers
//! - [`middleware`] - Rate limiting and request tracing

pub mod dto;
pub mod handlers;
pub mod middleware;

//! Response bodies for the HTTP endpoints.
//!
//! Error bodies are produced by [`crate::error::AppError`].

pub mod health;

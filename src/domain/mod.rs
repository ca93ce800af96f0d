//! Domain layer: entities, repository contracts and the redirect engine.
//!
//! # Modules
//!
//! - [`entities`] - Short link data structures
//! - [`repositories`] - Data access trait definitions
//! - [`resolver`] - Exact and prefix matching of request paths
//! - [`rewriter`] - Suffix joining and query forwarding
//! - [`definitions`] - Parser for static link definition files
//! - [`click_event`] / [`click_worker`] - Asynchronous click accounting
//!
//! The resolver, rewriter and parser are pure functions with no I/O; both the
//! live redirect service and the static page generator are built on them.
//!
//! # Redirect Flow
//!
//! 1. HTTP handler strips `/go/` and passes the path to
//!    [`crate::application::services::LinkService::resolve`]
//! 2. The matched link and leftover suffix go through [`rewriter::rewrite`]
//! 3. A [`click_event::ClickEvent`] is queued for
//!    [`click_worker::run_click_worker`]

pub mod click_event;
pub mod click_worker;
pub mod definitions;
pub mod entities;
pub mod repositories;
pub mod resolver;
pub mod rewriter;

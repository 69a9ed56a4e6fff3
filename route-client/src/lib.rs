//! Multi-modal route planning client core.
//!
//! Resolves free-text locations, requests routes, normalizes the returned
//! geometry into mode-tagged segments, and keeps application state, the
//! address bar, and in-flight requests consistent with each other.

pub mod context;
pub mod dispatch;
pub mod gateway;
pub mod geometry;
pub mod nav;
pub mod route;
pub mod stores;

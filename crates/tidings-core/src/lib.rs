//! Core types and trait definitions for Tidings.
//!
//! Nothing in here talks HTTP or SQL. The store backend, the JSON API and
//! the dashboard all build on these types.
//!
//! [`analytics`] turns a list of notifications into per-day counters for a
//! date range, and [`report`] renders those counters as a CSV export.

pub mod analytics;
pub mod clock;
pub mod error;
pub mod notification;
pub mod report;
pub mod store;
pub mod subscription;

pub use error::{Error, Result};

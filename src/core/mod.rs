//! Core module: models, scoring engine, record store and reports

pub mod config;
pub mod engine;
pub mod models;
pub mod report;
pub mod store;

/// Returns the current version of the GA Analytics crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

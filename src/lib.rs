//! Shared library for GA Analytics
//!
//! Graduate attribute, course outcome and program outcome scoring for
//! academic administration. Used by the `gaanalytics` CLI.

pub mod core;
pub mod logger;

pub use core::{config, get_version};

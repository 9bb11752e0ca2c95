//! Scoring and aggregation engine
//!
//! Pure functions over model slices. Nothing here touches the filesystem or
//! the record store; callers hand in exactly the records they want analyzed.
//!
//! - [`scoring`] turns a raw mark into per-attribute [`GaScore`](crate::core::models::GaScore)s
//! - [`performance`] averages results and sorts them into performance buckets
//! - [`coverage`] counts how often each GA/CO/PO code is mapped
//! - [`integrity`] checks weight sums, catalog references and whole snapshots

mod error;

pub mod coverage;
pub mod integrity;
pub mod performance;
pub mod scoring;

pub use coverage::{coverage, coverage_by_code, CodeCounts};
pub use error::{Assessed, IntegrityWarning, ValidationError};
pub use integrity::{
    audit, check_catalog, check_catalog_references, duplicate_results, validate_assessment_weights,
    validate_mapping_weights, AuditReport, AuditSummary, Snapshot, DEFAULT_WEIGHT_TOLERANCE,
};
pub use performance::{
    aggregate_performance, ga_attainment, summarize_percentages, GaAttainment, Histogram, PerformanceBucket,
    PerformanceSummary,
};
pub use scoring::{compute_ga_score, percentage, score_assessment, LevelPolicy, MAX_WEIGHTAGE};

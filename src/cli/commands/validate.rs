//! Validate command handler
//!
//! Audits the whole record store and prints every error and warning found.

use super::load_store;
use ga_analytics::config::Config;
use ga_analytics::core::engine::{audit, AuditSummary};
use ga_analytics::{info, verbose};
use std::process::ExitCode;

/// Run the validate command; fails when the audit finds errors
pub fn run(config: &Config, json: bool) -> ExitCode {
    let Some(store) = load_store(config) else {
        return ExitCode::FAILURE;
    };

    let snapshot = store.snapshot();
    verbose!(
        "Auditing {} course(s), {} assessment(s), {} result(s)",
        snapshot.courses.len(),
        snapshot.assessments.len(),
        snapshot.results.len()
    );
    let report = audit(snapshot, config.scoring.weight_tolerance);
    info!(
        "Audit found {} error(s) and {} warning(s)",
        report.errors.len(),
        report.warnings.len()
    );

    if json {
        match serde_json::to_string_pretty(&AuditSummary::from(&report)) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("✗ {e}");
                return ExitCode::FAILURE;
            }
        }
    } else if report.is_clean() {
        println!("✓ No problems found");
    } else {
        for err in &report.errors {
            println!("✗ {err}");
        }
        for warning in &report.warnings {
            println!("! {warning}");
        }
        println!(
            "\n{} error(s), {} warning(s)",
            report.errors.len(),
            report.warnings.len()
        );
    }

    if report.errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

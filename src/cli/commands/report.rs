//! Report command handler
//!
//! Builds an outcome report from the record store and writes it as
//! Markdown, HTML or JSON.

use super::load_store;
use ga_analytics::config::Config;
use ga_analytics::core::report::{
    reporter_for, Actor, OutcomeReport, ReportFormat, ReportOptions, ReportScope,
};
use ga_analytics::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

/// Parsed `report` arguments
pub struct ReportRequest {
    /// Course id filter
    pub course: Option<String>,
    /// Batch filter
    pub batch: Option<String>,
    /// Section filter
    pub section: Option<String>,
    /// Faculty id to build the report as
    pub faculty: Option<String>,
    /// Output format
    pub format: ReportFormat,
    /// Explicit output path
    pub output: Option<PathBuf>,
}

impl ReportRequest {
    fn scope(&self) -> ReportScope {
        ReportScope {
            course_id: self.course.clone(),
            batch: self.batch.clone(),
            section: self.section.clone(),
            actor: self
                .faculty
                .clone()
                .map_or(Actor::Admin, Actor::Faculty),
        }
    }
}

/// Run the report command
pub fn run(request: ReportRequest, config: &Config) -> ExitCode {
    match generate(&request, config) {
        Ok(path) => {
            println!("✓ Report generated: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Report generation failed: {e}");
            eprintln!("✗ {e}");
            ExitCode::FAILURE
        }
    }
}

fn generate(request: &ReportRequest, config: &Config) -> Result<PathBuf, String> {
    let store = load_store(config).ok_or("Record store unavailable")?;
    let options = ReportOptions {
        weight_tolerance: config.scoring.weight_tolerance,
    };

    let report = OutcomeReport::build(&store, &request.scope(), options).map_err(|e| e.to_string())?;
    print_summary(&report);

    let output_path = request.output.clone().unwrap_or_else(|| {
        PathBuf::from(&config.paths.reports_dir).join(report.file_name(request.format))
    });

    reporter_for(request.format)
        .generate(&report, &output_path)
        .map_err(|e| format!("Failed to generate {} report: {e}", request.format))?;
    info!("Report exported to: {}", output_path.display());

    Ok(output_path)
}

fn print_summary(report: &OutcomeReport) {
    println!("\n=== {} ===", report.title);
    println!("Scope: {}", report.scope.describe());
    println!("Courses: {}", report.courses.len());
    if report.is_empty() {
        println!("Performance: No data");
    } else {
        println!(
            "Performance: {}% average over {} result(s)",
            report.performance.average_display(),
            report.performance.records
        );
    }
    if !report.warnings.is_empty() {
        println!("⚠️  {} warning(s)", report.warnings.len());
    }
}

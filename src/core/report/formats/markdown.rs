//! Markdown report generator
//!
//! Renders outcome reports as Markdown tables. These reports render well in
//! GitHub, GitLab, and VS Code.

use crate::core::engine::CodeCounts;
use crate::core::report::{OutcomeReport, ReportError, ReportGenerator};
use std::fmt::Write;

/// Embedded Markdown report template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/report.md");

const NO_DATA: &str = "_No data_";

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, report: &OutcomeReport) -> String {
        MARKDOWN_TEMPLATE
            .replace("{{title}}", &report.title)
            .replace("{{scope}}", &report.scope.describe())
            .replace(
                "{{generated_at}}",
                &report.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            )
            .replace("{{courses}}", &Self::courses_table(report))
            .replace("{{performance}}", &Self::performance_section(report))
            .replace("{{ga_attainment}}", &Self::attainment_table(report))
            .replace("{{ga_coverage}}", &Self::coverage_table(&report.ga_coverage))
            .replace("{{co_coverage}}", &Self::coverage_table(&report.co_coverage))
            .replace("{{po_coverage}}", &Self::coverage_table(&report.po_coverage))
            .replace("{{warnings}}", &Self::warning_list(report))
    }

    fn courses_table(report: &OutcomeReport) -> String {
        if report.courses.is_empty() {
            return NO_DATA.to_string();
        }
        let mut table = String::from("| Code | Name | Faculty | Assessments |\n|---|---|---|---|\n");
        for course in &report.courses {
            let faculty = if course.faculty_name.is_empty() {
                "-"
            } else {
                &course.faculty_name
            };
            let _ = writeln!(
                table,
                "| {} | {} | {faculty} | {} |",
                course.code, course.name, course.assessments
            );
        }
        table
    }

    fn performance_section(report: &OutcomeReport) -> String {
        let summary = &report.performance;
        if summary.is_empty() {
            return NO_DATA.to_string();
        }
        let mut section = String::new();
        let _ = writeln!(
            section,
            "Average score **{}%** over {} result(s).\n",
            summary.average_display(),
            summary.records
        );
        section.push_str("| Band | Range | Results |\n|---|---|---|\n");
        for (bucket, count) in summary.histogram.iter() {
            let _ = writeln!(section, "| {bucket} | {} | {count} |", bucket.range_label());
        }
        section
    }

    fn attainment_table(report: &OutcomeReport) -> String {
        if report.ga_attainment.is_empty() {
            return NO_DATA.to_string();
        }
        let mut table = String::from("| GA | Scores | Mean score | Mean weightage | Attainment |\n|---|---|---|---|---|\n");
        for ga in &report.ga_attainment {
            let _ = writeln!(
                table,
                "| {} | {} | {:.1} | {:.1} | {:.1}% |",
                ga.ga_code, ga.samples, ga.average_score, ga.average_weightage, ga.attainment
            );
        }
        table
    }

    fn coverage_table(counts: &CodeCounts) -> String {
        if counts.is_empty() {
            return NO_DATA.to_string();
        }
        let mut table = String::from("| Code | Assessments |\n|---|---|\n");
        for (code, count) in counts.iter() {
            let _ = writeln!(table, "| {code} | {count} |");
        }
        table
    }

    fn warning_list(report: &OutcomeReport) -> String {
        if report.warnings.is_empty() {
            return "None".to_string();
        }
        report
            .warnings
            .iter()
            .fold(String::new(), |mut list, warning| {
                let _ = writeln!(list, "- {warning}");
                list
            })
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn render(&self, report: &OutcomeReport) -> Result<String, ReportError> {
        Ok(self.render_template(report))
    }
}

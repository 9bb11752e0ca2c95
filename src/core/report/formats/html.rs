//! HTML report generator
//!
//! Renders outcome reports as a self-contained HTML page with embedded CSS.
//! The page layout lives in `templates/report.html` and is compiled in by askama.

use crate::core::engine::CodeCounts;
use crate::core::report::{OutcomeReport, ReportError, ReportGenerator};
use askama::Template;

struct CourseRow {
    code: String,
    name: String,
    faculty_name: String,
    assessments: usize,
}

struct BandRow {
    label: String,
    range: &'static str,
    count: usize,
    width: String,
}

struct AttainmentRow {
    code: String,
    samples: usize,
    average_score: String,
    average_weightage: String,
    attainment: String,
}

struct CoverageRow {
    code: String,
    count: usize,
}

struct CoverageSection {
    heading: &'static str,
    rows: Vec<CoverageRow>,
}

/// View model handed to the template; all numbers are preformatted
#[derive(Template)]
#[template(path = "report.html")]
struct ReportPage {
    title: String,
    scope: String,
    generated_at: String,
    courses: Vec<CourseRow>,
    records: usize,
    average: String,
    bands: Vec<BandRow>,
    attainment: Vec<AttainmentRow>,
    coverage: Vec<CoverageSection>,
    warnings: Vec<String>,
}

impl ReportPage {
    fn from_report(report: &OutcomeReport) -> Self {
        let records = report.performance.records;
        let bands = report
            .performance
            .histogram
            .iter()
            .map(|(bucket, count)| {
                #[allow(clippy::cast_precision_loss)]
                let share = if records == 0 {
                    0.0
                } else {
                    count as f64 / records as f64 * 100.0
                };
                BandRow {
                    label: bucket.to_string(),
                    range: bucket.range_label(),
                    count,
                    width: format!("{share:.0}"),
                }
            })
            .collect();

        let attainment = report
            .ga_attainment
            .iter()
            .map(|ga| AttainmentRow {
                code: ga.ga_code.clone(),
                samples: ga.samples,
                average_score: format!("{:.1}", ga.average_score),
                average_weightage: format!("{:.1}", ga.average_weightage),
                attainment: format!("{:.1}", ga.attainment),
            })
            .collect();

        Self {
            title: report.title.clone(),
            scope: report.scope.describe(),
            generated_at: report.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            courses: report
                .courses
                .iter()
                .map(|c| CourseRow {
                    code: c.code.clone(),
                    name: c.name.clone(),
                    faculty_name: c.faculty_name.clone(),
                    assessments: c.assessments,
                })
                .collect(),
            records,
            average: report.performance.average_display(),
            bands,
            attainment,
            coverage: vec![
                coverage_section("Graduate Attributes", &report.ga_coverage),
                coverage_section("Course Outcomes", &report.co_coverage),
                coverage_section("Program Outcomes", &report.po_coverage),
            ],
            warnings: report.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

fn coverage_section(heading: &'static str, counts: &CodeCounts) -> CoverageSection {
    CoverageSection {
        heading,
        rows: counts
            .iter()
            .map(|(code, count)| CoverageRow {
                code: code.to_string(),
                count,
            })
            .collect(),
    }
}

/// HTML report generator
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
    fn render(&self, report: &OutcomeReport) -> Result<String, ReportError> {
        Ok(ReportPage::from_report(report).render()?)
    }
}

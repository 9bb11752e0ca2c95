//! JSON report generator

use crate::core::report::{OutcomeReport, ReportError, ReportGenerator};

/// Pretty-printed JSON serialization of the whole report
pub struct JsonReporter;

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn render(&self, report: &OutcomeReport) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::{summarize_percentages, CodeCounts};
    use crate::core::report::ScopeSummary;
    use chrono::Utc;

    #[test]
    fn test_uses_camel_case_keys() {
        let report = OutcomeReport {
            title: "Outcome Report".to_string(),
            generated_at: Utc::now(),
            scope: ScopeSummary {
                course: None,
                batch: None,
                section: Some("A".to_string()),
                faculty: None,
            },
            courses: Vec::new(),
            performance: summarize_percentages(&[65.0]),
            ga_attainment: Vec::new(),
            ga_coverage: CodeCounts::default().increment("GA2"),
            co_coverage: CodeCounts::default(),
            po_coverage: CodeCounts::default(),
            warnings: Vec::new(),
        };

        let json = JsonReporter::new().render(&report).expect("render");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["performance"]["histogram"]["belowAverage"], 1);
        assert_eq!(value["gaCoverage"]["GA2"], 1);
        assert_eq!(value["scope"]["section"], "A");
        assert!(value["generatedAt"].is_string());
    }
}

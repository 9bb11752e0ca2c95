//! Outcome report generation
//!
//! [`OutcomeReport::build`] gathers the in-scope records from a store, runs
//! the engine over them and keeps everything a renderer needs. Renderers in
//! [`formats`] turn the report into Markdown, HTML or JSON.

pub mod formats;

use crate::core::engine::{
    aggregate_performance, check_catalog_references, coverage, duplicate_results, ga_attainment,
    validate_assessment_weights, CodeCounts, GaAttainment,
    IntegrityWarning, PerformanceSummary, ValidationError, DEFAULT_WEIGHT_TOLERANCE,
};
use crate::core::models::{Assessment, Course, MappingKind, StudentAssessment};
use crate::core::store::{RecordStore, StoreError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use formats::{reporter_for, HtmlReporter, JsonReporter, MarkdownReporter, ReportFormat};

/// Failures raised while building or writing a report
#[derive(Debug, Error)]
pub enum ReportError {
    /// The engine rejected a record
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Loading records failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The requested course does not exist
    #[error("Unknown course '{0}'")]
    UnknownCourse(String),

    /// A faculty member asked for a course they do not own
    #[error("Faculty '{faculty_id}' may not view course '{course_id}'")]
    Forbidden {
        /// Requesting faculty member
        faculty_id: String,
        /// Requested course
        course_id: String,
    },

    /// HTML template rendering failed
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the output file failed
    #[error("Failed to write {path}: {source}")]
    Io {
        /// Output path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Who is asking for a report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Actor {
    /// Sees every course
    #[default]
    Admin,
    /// Sees only courses whose `faculty_id` matches
    Faculty(String),
}

impl Actor {
    fn may_view(&self, course: &Course) -> bool {
        match self {
            Self::Admin => true,
            Self::Faculty(id) => course.faculty_id == *id,
        }
    }
}

/// Which records a report covers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportScope {
    /// Restrict to one course
    pub course_id: Option<String>,
    /// Restrict to students of a batch
    pub batch: Option<String>,
    /// Restrict to students of a section
    pub section: Option<String>,
    /// Requesting user
    pub actor: Actor,
}

impl ReportScope {
    const fn filters_cohort(&self) -> bool {
        self.batch.is_some() || self.section.is_some()
    }
}

/// Tunables for report assembly
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    /// Allowed distance of a mapping weightage sum from 100
    pub weight_tolerance: f64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            weight_tolerance: DEFAULT_WEIGHT_TOLERANCE,
        }
    }
}

/// One in-scope course
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseLine {
    /// Course code
    pub code: String,
    /// Course name
    pub name: String,
    /// Owning faculty member's name
    pub faculty_name: String,
    /// Number of assessments in the course
    pub assessments: usize,
}

/// Human-readable description of a [`ReportScope`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeSummary {
    /// Course code and name, when scoped to one course
    pub course: Option<String>,
    /// Batch filter
    pub batch: Option<String>,
    /// Section filter
    pub section: Option<String>,
    /// Faculty id, when requested by a faculty member
    pub faculty: Option<String>,
}

impl ScopeSummary {
    /// One-line description (e.g., "CS101 Programming, batch 2024-28")
    #[must_use]
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        parts.push(self.course.clone().unwrap_or_else(|| "All courses".to_string()));
        if let Some(batch) = &self.batch {
            parts.push(format!("batch {batch}"));
        }
        if let Some(section) = &self.section {
            parts.push(format!("section {section}"));
        }
        if let Some(faculty) = &self.faculty {
            parts.push(format!("faculty {faculty}"));
        }
        parts.join(", ")
    }
}

/// Everything computed for one report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeReport {
    /// Report title
    pub title: String,
    /// When the report was built
    pub generated_at: DateTime<Utc>,
    /// What the report covers
    pub scope: ScopeSummary,
    /// Courses in scope
    pub courses: Vec<CourseLine>,
    /// Average and histogram over in-scope results
    pub performance: PerformanceSummary,
    /// Stored GA score attainment per GA code
    pub ga_attainment: Vec<GaAttainment>,
    /// Assessment mappings per GA code
    pub ga_coverage: CodeCounts,
    /// Assessment mappings per CO code
    pub co_coverage: CodeCounts,
    /// Assessment mappings per PO code
    pub po_coverage: CodeCounts,
    /// Advisories raised while building
    pub warnings: Vec<IntegrityWarning>,
}

impl OutcomeReport {
    /// Build a report over the records `scope` selects.
    ///
    /// An admin without a course filter sees every assessment and result,
    /// so orphaned results surface as warnings. Otherwise only results of
    /// the visible courses' assessments are used. A batch or section filter
    /// keeps results whose student is known and in that cohort.
    ///
    /// # Errors
    ///
    /// Returns an error if the course is unknown or not visible to the
    /// actor, if an assessment maps a CO/PO code its course does not
    /// declare, or if the engine rejects a record.
    pub fn build(store: &RecordStore, scope: &ReportScope, options: ReportOptions) -> Result<Self, ReportError> {
        let courses = visible_courses(store, scope)?;
        let unscoped = scope.actor == Actor::Admin && scope.course_id.is_none();

        let assessments: Vec<Assessment> = if unscoped {
            store.assessments().to_vec()
        } else {
            courses
                .iter()
                .flat_map(|c| store.assessments_for_course(&c.id))
                .cloned()
                .collect()
        };
        let assessment_ids: HashSet<&str> = assessments.iter().map(|a| a.id.as_str()).collect();

        let cohort: Option<HashSet<&str>> = scope.filters_cohort().then(|| {
            store
                .students_in_cohort(scope.batch.as_deref(), scope.section.as_deref())
                .into_iter()
                .map(|s| s.id.as_str())
                .collect()
        });

        let results: Vec<StudentAssessment> = store
            .results()
            .iter()
            .filter(|r| unscoped || assessment_ids.contains(r.assessment_id.as_str()))
            .filter(|r| cohort.as_ref().is_none_or(|ids| ids.contains(r.student_id.as_str())))
            .cloned()
            .collect();

        crate::debug!(
            "Report scope '{}': {} course(s), {} assessment(s), {} result(s)",
            describe_scope(store, scope).describe(),
            courses.len(),
            assessments.len(),
            results.len()
        );

        let mut warnings = Vec::new();
        for assessment in &assessments {
            match store.get_course(&assessment.course_id) {
                Some(course) => check_catalog_references(course, assessment)?,
                None => warnings.push(IntegrityWarning::MissingCourse {
                    assessment_id: assessment.id.clone(),
                    course_id: assessment.course_id.clone(),
                }),
            }
        }

        let performance = aggregate_performance(&results, &assessments)?;
        warnings.extend(performance.warnings);
        warnings.extend(duplicate_results(&results));
        warnings.extend(
            assessments
                .iter()
                .flat_map(|a| validate_assessment_weights(a, options.weight_tolerance)),
        );
        for warning in &warnings {
            crate::warn!("{}", warning);
        }

        let course_lines = courses
            .iter()
            .map(|c| CourseLine {
                code: c.code.clone(),
                name: c.name.clone(),
                faculty_name: c.faculty_name.clone(),
                assessments: assessments.iter().filter(|a| a.course_id == c.id).count(),
            })
            .collect();

        let scope_summary = describe_scope(store, scope);
        let title = scope_summary
            .course
            .as_ref()
            .map_or_else(|| "Outcome Report".to_string(), |c| format!("Outcome Report: {c}"));

        crate::info!(
            "Built report over {} result(s) with {} warning(s)",
            performance.value.records,
            warnings.len()
        );

        Ok(Self {
            title,
            generated_at: Utc::now(),
            scope: scope_summary,
            courses: course_lines,
            performance: performance.value,
            ga_attainment: ga_attainment(&results),
            ga_coverage: coverage(&assessments, MappingKind::Ga),
            co_coverage: coverage(&assessments, MappingKind::Co),
            po_coverage: coverage(&assessments, MappingKind::Po),
            warnings,
        })
    }

    /// Whether no results were in scope
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.performance.is_empty()
    }

    /// Coverage table for one mapping kind
    #[must_use]
    pub const fn coverage(&self, kind: MappingKind) -> &CodeCounts {
        match kind {
            MappingKind::Ga => &self.ga_coverage,
            MappingKind::Co => &self.co_coverage,
            MappingKind::Po => &self.po_coverage,
        }
    }

    /// Default output file name for a format
    #[must_use]
    pub fn file_name(&self, format: ReportFormat) -> String {
        let stem = self
            .scope
            .course
            .as_deref()
            .and_then(|c| c.split_whitespace().next())
            .unwrap_or("all-courses");
        format!(
            "outcomes-{}-{}.{}",
            stem.to_lowercase(),
            self.generated_at.format("%Y%m%d-%H%M%S"),
            format.extension()
        )
    }
}

fn visible_courses<'a>(store: &'a RecordStore, scope: &ReportScope) -> Result<Vec<&'a Course>, ReportError> {
    match &scope.course_id {
        Some(id) => {
            let course = store
                .get_course(id)
                .ok_or_else(|| ReportError::UnknownCourse(id.clone()))?;
            match &scope.actor {
                Actor::Faculty(faculty_id) if !scope.actor.may_view(course) => Err(ReportError::Forbidden {
                    faculty_id: faculty_id.clone(),
                    course_id: id.clone(),
                }),
                _ => Ok(vec![course]),
            }
        }
        None => Ok(store
            .courses()
            .iter()
            .filter(|c| scope.actor.may_view(c))
            .collect()),
    }
}

fn describe_scope(store: &RecordStore, scope: &ReportScope) -> ScopeSummary {
    ScopeSummary {
        course: scope
            .course_id
            .as_deref()
            .and_then(|id| store.get_course(id))
            .map(|c| format!("{} {}", c.code, c.name)),
        batch: scope.batch.clone(),
        section: scope.section.clone(),
        faculty: match &scope.actor {
            Actor::Admin => None,
            Actor::Faculty(id) => Some(id.clone()),
        },
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, report: &OutcomeReport) -> Result<String, ReportError>;

    /// Generate a report to a file, creating parent directories
    ///
    /// # Errors
    /// Returns an error if rendering or writing fails
    fn generate(&self, report: &OutcomeReport, output_path: &Path) -> Result<(), ReportError> {
        let content = self.render(report)?;
        let io_err = |source| ReportError::Io {
            path: output_path.to_path_buf(),
            source,
        };
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(output_path, content).map_err(io_err)?;
        crate::info!("Wrote report to {}", output_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{AssessmentType, GaMapping, OutcomeDef, OutcomeMapping, ProficiencyLevel, Student};

    struct Fixture {
        store: RecordStore,
        cs101: String,
        cs102: String,
    }

    fn fixture() -> Fixture {
        let mut store = RecordStore::new();

        let mut course = Course::new("CS101", "Programming", "CSE", "2024-28", 3.0).taught_by("f-1", "Asha");
        course.add_course_outcome(OutcomeDef::new("CO1", "Write programs"));
        let cs101 = store.add_course(course);
        let cs102 = store.add_course(Course::new("CS102", "Data Structures", "CSE", "2024-28", 4.0).taught_by("f-2", "Ravi"));

        let mut quiz = Assessment::new(&cs101, AssessmentType::Quiz, 50.0, 10.0);
        quiz.ga_mapping = vec![GaMapping::new("GA1", "Knowledge", 100.0, ProficiencyLevel::Intermediate)];
        quiz.co_mapping = vec![OutcomeMapping::new("CO1", 100.0)];
        let quiz = store.add_assessment(quiz);

        let mut lab = Assessment::new(&cs102, AssessmentType::Lab, 20.0, 20.0);
        lab.ga_mapping = vec![GaMapping::new("GA2", "Analysis", 90.0, ProficiencyLevel::Advanced)];
        let lab = store.add_assessment(lab);

        let a = store.add_student(Student::new("24CS001", "Ravi", "CSE", "2024-28", "A"));
        let b = store.add_student(Student::new("24CS002", "Meera", "CSE", "2024-28", "B"));

        store.record_result(StudentAssessment::new(&a, &quiz, 45.0));
        store.record_result(StudentAssessment::new(&b, &quiz, 20.0));
        store.record_result(StudentAssessment::new(&a, &lab, 15.0));

        Fixture { store, cs101, cs102 }
    }

    #[test]
    fn test_admin_report_covers_everything() {
        let f = fixture();

        let report = OutcomeReport::build(&f.store, &ReportScope::default(), ReportOptions::default()).expect("report");

        assert_eq!(report.courses.len(), 2);
        assert_eq!(report.performance.records, 3);
        assert_eq!(report.ga_coverage.get("GA1"), 1);
        assert_eq!(report.ga_coverage.get("GA2"), 1);
        // GA2 weightages sum to 90
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.title, "Outcome Report");
    }

    #[test]
    fn test_course_scope() {
        let f = fixture();
        let scope = ReportScope {
            course_id: Some(f.cs101.clone()),
            ..ReportScope::default()
        };

        let report = OutcomeReport::build(&f.store, &scope, ReportOptions::default()).expect("report");

        assert_eq!(report.performance.records, 2);
        assert_eq!(report.performance.histogram.excellent, 1);
        assert_eq!(report.performance.histogram.poor, 1);
        assert_eq!(report.co_coverage.get("CO1"), 1);
        assert!(report.warnings.is_empty());
        assert_eq!(report.title, "Outcome Report: CS101 Programming");
    }

    #[test]
    fn test_faculty_sees_only_own_courses() {
        let f = fixture();
        let scope = ReportScope {
            actor: Actor::Faculty("f-2".to_string()),
            ..ReportScope::default()
        };

        let report = OutcomeReport::build(&f.store, &scope, ReportOptions::default()).expect("report");

        assert_eq!(report.courses.len(), 1);
        assert_eq!(report.courses[0].code, "CS102");
        assert_eq!(report.performance.records, 1);
    }

    #[test]
    fn test_faculty_cannot_view_other_course() {
        let f = fixture();
        let scope = ReportScope {
            course_id: Some(f.cs101.clone()),
            actor: Actor::Faculty("f-2".to_string()),
            ..ReportScope::default()
        };

        let err = OutcomeReport::build(&f.store, &scope, ReportOptions::default()).unwrap_err();

        assert!(matches!(err, ReportError::Forbidden { .. }));
    }

    #[test]
    fn test_unknown_course() {
        let f = fixture();
        let scope = ReportScope {
            course_id: Some("missing".to_string()),
            ..ReportScope::default()
        };

        let err = OutcomeReport::build(&f.store, &scope, ReportOptions::default()).unwrap_err();

        assert!(matches!(err, ReportError::UnknownCourse(id) if id == "missing"));
    }

    #[test]
    fn test_section_filter() {
        let f = fixture();
        let scope = ReportScope {
            course_id: Some(f.cs101.clone()),
            section: Some("B".to_string()),
            ..ReportScope::default()
        };

        let report = OutcomeReport::build(&f.store, &scope, ReportOptions::default()).expect("report");

        assert_eq!(report.performance.records, 1);
        assert!((report.performance.average - 40.0).abs() < 1e-9);
        assert!(report.scope.describe().contains("section B"));
    }

    #[test]
    fn test_empty_scope_yields_zero_state() {
        let f = fixture();
        let scope = ReportScope {
            course_id: Some(f.cs102.clone()),
            batch: Some("2019-23".to_string()),
            ..ReportScope::default()
        };

        let report = OutcomeReport::build(&f.store, &scope, ReportOptions::default()).expect("report");

        assert!(report.is_empty());
        assert_eq!(report.performance, PerformanceSummary::default());
        assert!(report.ga_attainment.is_empty());
    }

    #[test]
    fn test_orphaned_results_warn_for_admin() {
        let mut f = fixture();
        f.store.record_result(StudentAssessment::new("s-x", "deleted", 1.0));

        let report = OutcomeReport::build(&f.store, &ReportScope::default(), ReportOptions::default()).expect("report");

        assert_eq!(report.performance.records, 3);
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, IntegrityWarning::OrphanedRecord { assessment_id, .. } if assessment_id == "deleted")));
    }

    #[test]
    fn test_dangling_outcome_fails_report() {
        let mut f = fixture();
        let mut exam = Assessment::new(&f.cs101, AssessmentType::EndTerm, 100.0, 50.0);
        exam.co_mapping = vec![OutcomeMapping::new("CO9", 100.0)];
        f.store.add_assessment(exam);
        let scope = ReportScope {
            course_id: Some(f.cs101.clone()),
            ..ReportScope::default()
        };

        let err = OutcomeReport::build(&f.store, &scope, ReportOptions::default()).unwrap_err();

        assert!(matches!(
            err,
            ReportError::Validation(ValidationError::DanglingOutcome { ref code, .. }) if code == "CO9"
        ));
    }

    #[test]
    fn test_assessment_without_course_warns_for_admin() {
        let mut f = fixture();
        f.store.add_assessment(Assessment::new("gone", AssessmentType::Quiz, 10.0, 5.0));

        let report = OutcomeReport::build(&f.store, &ReportScope::default(), ReportOptions::default()).expect("report");

        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, IntegrityWarning::MissingCourse { course_id, .. } if course_id == "gone")));
    }

    #[test]
    fn test_file_name_uses_course_code() {
        let f = fixture();
        let scope = ReportScope {
            course_id: Some(f.cs101.clone()),
            ..ReportScope::default()
        };
        let report = OutcomeReport::build(&f.store, &scope, ReportOptions::default()).expect("report");

        let name = report.file_name(ReportFormat::Html);

        assert!(name.starts_with("outcomes-cs101-"));
        assert!(name.ends_with(".html"));
    }
}

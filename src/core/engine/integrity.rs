//! Mapping weight validation, catalog checks and snapshot audits

use super::scoring::percentage;
use super::{IntegrityWarning, ValidationError};
use crate::core::models::{
    Assessment, Course, MappingKind, OutcomeDef, Student, StudentAssessment, WeightedMapping,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Default allowed distance of a weightage sum from 100
pub const DEFAULT_WEIGHT_TOLERANCE: f64 = 1.0;

/// Borrowed view over every record collection the engine reads
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    /// Students
    pub students: &'a [Student],
    /// Courses
    pub courses: &'a [Course],
    /// Assessments
    pub assessments: &'a [Assessment],
    /// Student results
    pub results: &'a [StudentAssessment],
}

/// Warn when a mapping list's weightages do not sum to 100 within `tolerance`.
///
/// Advisory only; scores are still computed with whatever weights exist. An
/// empty list maps nothing and is not warned about.
#[must_use]
pub fn validate_mapping_weights<M: WeightedMapping>(
    assessment_id: &str,
    kind: MappingKind,
    mappings: &[M],
    tolerance: f64,
) -> Vec<IntegrityWarning> {
    if mappings.is_empty() {
        return Vec::new();
    }
    let total: f64 = mappings.iter().map(WeightedMapping::weightage).sum();
    if (total - 100.0).abs() > tolerance {
        vec![IntegrityWarning::WeightSum {
            assessment_id: assessment_id.to_string(),
            mapping: kind,
            total,
        }]
    } else {
        Vec::new()
    }
}

/// Run [`validate_mapping_weights`] over the GA, CO and PO lists of an assessment
#[must_use]
pub fn validate_assessment_weights(assessment: &Assessment, tolerance: f64) -> Vec<IntegrityWarning> {
    let id = assessment.id.as_str();
    let mut warnings = validate_mapping_weights(id, MappingKind::Ga, &assessment.ga_mapping, tolerance);
    warnings.extend(validate_mapping_weights(id, MappingKind::Co, &assessment.co_mapping, tolerance));
    warnings.extend(validate_mapping_weights(id, MappingKind::Po, &assessment.po_mapping, tolerance));
    warnings
}

/// Check that a course's CO and PO catalogs have unique codes.
///
/// # Errors
///
/// Returns the first duplicated code found.
pub fn check_catalog(course: &Course) -> Result<(), ValidationError> {
    for kind in [MappingKind::Co, MappingKind::Po] {
        let catalog: &[OutcomeDef] = course.catalog(kind).unwrap_or_default();
        let mut seen = HashSet::new();
        if let Some(dup) = catalog.iter().find(|o| !seen.insert(o.code.as_str())) {
            return Err(ValidationError::DuplicateOutcome {
                course_id: course.id.clone(),
                kind,
                code: dup.code.clone(),
            });
        }
    }
    Ok(())
}

/// Check that every CO/PO code an assessment maps is declared by its course.
///
/// # Errors
///
/// Returns an error if the assessment belongs to another course or maps a
/// code missing from the course catalog.
pub fn check_catalog_references(course: &Course, assessment: &Assessment) -> Result<(), ValidationError> {
    if assessment.course_id != course.id {
        return Err(ValidationError::CourseMismatch {
            assessment_id: assessment.id.clone(),
            expected: course.id.clone(),
            found: assessment.course_id.clone(),
        });
    }
    for kind in [MappingKind::Co, MappingKind::Po] {
        if let Some(code) = assessment
            .mapping_codes(kind)
            .into_iter()
            .find(|code| !course.declares(kind, code))
        {
            return Err(ValidationError::DanglingOutcome {
                assessment_id: assessment.id.clone(),
                course_id: course.id.clone(),
                kind,
                code: code.to_string(),
            });
        }
    }
    Ok(())
}

/// Warn about every (student, assessment) pair holding more than one result.
///
/// Pairs are reported in order of their first result.
#[must_use]
pub fn duplicate_results(results: &[StudentAssessment]) -> Vec<IntegrityWarning> {
    let mut order: Vec<(&str, &str)> = Vec::new();
    let mut ids: HashMap<(&str, &str), Vec<String>> = HashMap::new();
    for result in results {
        let pair = (result.student_id.as_str(), result.assessment_id.as_str());
        let entry = ids.entry(pair).or_default();
        if entry.is_empty() {
            order.push(pair);
        }
        entry.push(result.id.clone());
    }

    order
        .into_iter()
        .filter_map(|pair| {
            let record_ids = ids.remove(&pair)?;
            (record_ids.len() > 1).then(|| IntegrityWarning::DuplicateResult {
                student_id: pair.0.to_string(),
                assessment_id: pair.1.to_string(),
                record_ids,
            })
        })
        .collect()
}

/// Every error and warning found in a snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditReport {
    /// Validation errors, in discovery order
    pub errors: Vec<ValidationError>,
    /// Integrity warnings, in discovery order
    pub warnings: Vec<IntegrityWarning>,
}

impl AuditReport {
    /// Whether nothing was found
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Serializable view of an [`AuditReport`], errors rendered as messages
#[derive(Debug, Clone, Serialize)]
pub struct AuditSummary {
    /// Error messages
    pub errors: Vec<String>,
    /// Warnings
    pub warnings: Vec<IntegrityWarning>,
}

impl From<&AuditReport> for AuditSummary {
    fn from(report: &AuditReport) -> Self {
        Self {
            errors: report.errors.iter().map(ToString::to_string).collect(),
            warnings: report.warnings.clone(),
        }
    }
}

/// Check a whole snapshot without stopping at the first problem.
///
/// Courses are checked for duplicate catalog codes; assessments for a known
/// course, dangling CO/PO references, a positive maximum and weight sums;
/// results for a known assessment and student, for in-range marks and for
/// at most one result per student and assessment.
#[must_use]
pub fn audit(snapshot: Snapshot<'_>, tolerance: f64) -> AuditReport {
    let mut report = AuditReport::default();

    let courses: HashMap<&str, &Course> = snapshot.courses.iter().map(|c| (c.id.as_str(), c)).collect();
    let assessments: HashMap<&str, &Assessment> =
        snapshot.assessments.iter().map(|a| (a.id.as_str(), a)).collect();
    let students: HashSet<&str> = snapshot.students.iter().map(|s| s.id.as_str()).collect();

    for course in snapshot.courses {
        if let Err(err) = check_catalog(course) {
            report.errors.push(err);
        }
    }

    for assessment in snapshot.assessments {
        match courses.get(assessment.course_id.as_str()) {
            Some(course) => {
                if let Err(err) = check_catalog_references(course, assessment) {
                    report.errors.push(err);
                }
            }
            None => report.warnings.push(IntegrityWarning::MissingCourse {
                assessment_id: assessment.id.clone(),
                course_id: assessment.course_id.clone(),
            }),
        }
        if assessment.max_marks.is_nan() || assessment.max_marks <= 0.0 {
            report.errors.push(ValidationError::NonPositiveMaxMarks {
                assessment_id: assessment.id.clone(),
                max_marks: assessment.max_marks,
            });
        }
        report
            .warnings
            .extend(validate_assessment_weights(assessment, tolerance));
    }

    for result in snapshot.results {
        if !students.contains(result.student_id.as_str()) {
            report.warnings.push(IntegrityWarning::MissingStudent {
                record_id: result.id.clone(),
                student_id: result.student_id.clone(),
            });
        }
        match assessments.get(result.assessment_id.as_str()) {
            Some(assessment) => match percentage(assessment, result) {
                // Bad maximums were already reported once per assessment
                Err(ValidationError::NonPositiveMaxMarks { .. }) | Ok(_) => {}
                Err(err) => report.errors.push(err),
            },
            None => report.warnings.push(IntegrityWarning::OrphanedRecord {
                record_id: result.id.clone(),
                assessment_id: result.assessment_id.clone(),
            }),
        }
    }
    report.warnings.extend(duplicate_results(snapshot.results));

    report
}

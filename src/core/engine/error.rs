//! Validation errors and integrity warnings raised by the engine

use crate::core::models::MappingKind;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Malformed input to an engine operation. Never coerced into a default.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The requested GA mapping is not declared on the assessment
    #[error("GA mapping '{ga_code}' not found on assessment '{assessment_id}'")]
    MappingNotFound {
        /// Assessment searched
        assessment_id: String,
        /// Requested GA code
        ga_code: String,
    },

    /// `max_marks` is zero, negative or not a number
    #[error("Assessment '{assessment_id}' has non-positive max marks ({max_marks})")]
    NonPositiveMaxMarks {
        /// Offending assessment
        assessment_id: String,
        /// Declared maximum
        max_marks: f64,
    },

    /// Marks fall outside `[0, max_marks]`
    #[error(
        "Marks {marks} for student '{student_id}' on assessment '{assessment_id}' are outside [0, {max_marks}]"
    )]
    MarksOutOfRange {
        /// Assessment the marks were recorded for
        assessment_id: String,
        /// Student the marks belong to
        student_id: String,
        /// Recorded marks
        marks: f64,
        /// Declared maximum
        max_marks: f64,
    },

    /// A mapping weightage is negative, above 100 or not a number
    #[error("{kind} mapping '{code}' on assessment '{assessment_id}' has invalid weightage {weightage}")]
    InvalidWeightage {
        /// Offending assessment
        assessment_id: String,
        /// Mapping list the entry belongs to
        kind: MappingKind,
        /// Mapped code
        code: String,
        /// Declared weightage
        weightage: f64,
    },

    /// A result was paired with an assessment it does not belong to
    #[error("Result '{record_id}' belongs to assessment '{found}', not '{expected}'")]
    AssessmentMismatch {
        /// Result id
        record_id: String,
        /// Assessment supplied by the caller
        expected: String,
        /// Assessment the result references
        found: String,
    },

    /// An assessment was paired with a course it does not belong to
    #[error("Assessment '{assessment_id}' belongs to course '{found}', not '{expected}'")]
    CourseMismatch {
        /// Assessment id
        assessment_id: String,
        /// Course supplied by the caller
        expected: String,
        /// Course the assessment references
        found: String,
    },

    /// An assessment maps a CO/PO code missing from its course catalog
    #[error("Assessment '{assessment_id}' maps {kind} '{code}' which course '{course_id}' does not declare")]
    DanglingOutcome {
        /// Assessment id
        assessment_id: String,
        /// Owning course id
        course_id: String,
        /// Catalog searched
        kind: MappingKind,
        /// Missing code
        code: String,
    },

    /// A course catalog declares the same code twice
    #[error("Course '{course_id}' declares {kind} '{code}' more than once")]
    DuplicateOutcome {
        /// Course id
        course_id: String,
        /// Catalog containing the duplicate
        kind: MappingKind,
        /// Duplicated code
        code: String,
    },
}

/// Non-fatal data-integrity advisory, reported next to computed results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "warning", rename_all = "camelCase")]
pub enum IntegrityWarning {
    /// Mapping weightages do not sum to 100 within tolerance
    #[serde(rename_all = "camelCase")]
    WeightSum {
        /// Assessment id
        assessment_id: String,
        /// Mapping list that was summed
        mapping: MappingKind,
        /// Actual sum of weightages
        total: f64,
    },
    /// A result references an assessment that was not supplied
    #[serde(rename_all = "camelCase")]
    OrphanedRecord {
        /// Result id
        record_id: String,
        /// Unknown assessment id
        assessment_id: String,
    },
    /// An assessment references a course that was not supplied
    #[serde(rename_all = "camelCase")]
    MissingCourse {
        /// Assessment id
        assessment_id: String,
        /// Unknown course id
        course_id: String,
    },
    /// A result references a student that was not supplied
    #[serde(rename_all = "camelCase")]
    MissingStudent {
        /// Result id
        record_id: String,
        /// Unknown student id
        student_id: String,
    },
    /// More than one result exists for the same student and assessment
    #[serde(rename_all = "camelCase")]
    DuplicateResult {
        /// Student id
        student_id: String,
        /// Assessment id
        assessment_id: String,
        /// Ids of every result recorded for the pair
        record_ids: Vec<String>,
    },
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeightSum {
                assessment_id,
                mapping,
                total,
            } => write!(
                f,
                "{mapping} weightages on assessment '{assessment_id}' sum to {total:.1}, not 100"
            ),
            Self::OrphanedRecord {
                record_id,
                assessment_id,
            } => write!(
                f,
                "Result '{record_id}' references unknown assessment '{assessment_id}'"
            ),
            Self::MissingCourse {
                assessment_id,
                course_id,
            } => write!(
                f,
                "Assessment '{assessment_id}' references unknown course '{course_id}'"
            ),
            Self::MissingStudent {
                record_id,
                student_id,
            } => write!(
                f,
                "Result '{record_id}' references unknown student '{student_id}'"
            ),
            Self::DuplicateResult {
                student_id,
                assessment_id,
                record_ids,
            } => write!(
                f,
                "Student '{student_id}' has {} results for assessment '{assessment_id}': {}",
                record_ids.len(),
                record_ids.join(", ")
            ),
        }
    }
}

/// A computed value together with the warnings raised while computing it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessed<T> {
    /// Computed value
    pub value: T,
    /// Advisories gathered along the way
    pub warnings: Vec<IntegrityWarning>,
}

impl<T> Assessed<T> {
    /// Wrap a value with no warnings
    pub const fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Whether any warning was raised
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

//! Student assessment results and per-attribute scores

use super::ProficiencyLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score earned by a student on one graduate attribute of an assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaScore {
    /// Graduate attribute code
    pub ga_code: String,
    /// Earned score, between 0 and the mapping weightage
    pub score: u32,
    /// Proficiency level recorded for this score
    pub level: ProficiencyLevel,
    /// Weightage percent of the attribute on the assessment
    pub weightage: f64,
}

/// A student's result on one assessment.
///
/// At most one result exists per (student, assessment) pair; writing again
/// replaces the earlier record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAssessment {
    /// Opaque record id, assigned by the store
    #[serde(default)]
    pub id: String,

    /// Id of the assessed student
    pub student_id: String,

    /// Id of the assessment
    pub assessment_id: String,

    /// Raw marks, between 0 and the assessment's maximum
    pub marks_obtained: f64,

    /// One score per GA mapping of the assessment
    #[serde(default)]
    pub ga_scores: Vec<GaScore>,

    /// When the marks were submitted
    pub submitted_at: DateTime<Utc>,

    /// Id of the evaluating faculty member
    #[serde(default)]
    pub evaluated_by: String,
}

impl StudentAssessment {
    /// Create a result stamped with the current time and no GA scores
    #[must_use]
    pub fn new(student_id: impl Into<String>, assessment_id: impl Into<String>, marks_obtained: f64) -> Self {
        Self {
            id: String::new(),
            student_id: student_id.into(),
            assessment_id: assessment_id.into(),
            marks_obtained,
            ga_scores: Vec::new(),
            submitted_at: Utc::now(),
            evaluated_by: String::new(),
        }
    }

    /// Record the evaluator
    #[must_use]
    pub fn evaluated_by(mut self, faculty_id: impl Into<String>) -> Self {
        self.evaluated_by = faculty_id.into();
        self
    }

    /// Whether this result is for the same (student, assessment) pair as `other`
    #[must_use]
    pub fn same_pair(&self, other: &Self) -> bool {
        self.student_id == other.student_id && self.assessment_id == other.assessment_id
    }
}

//! Per-student graduate attribute scoring

use super::ValidationError;
use crate::core::models::{Assessment, GaMapping, GaScore, MappingKind, ProficiencyLevel, StudentAssessment};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the level of a computed GA score is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelPolicy {
    /// Copy the mapping's target level
    #[default]
    Target,
    /// Classify the student's percentage with the reporting thresholds
    Measured,
}

impl FromStr for LevelPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "target" => Ok(Self::Target),
            "measured" => Ok(Self::Measured),
            _ => Err(format!("Unknown level policy: '{s}' (expected target or measured)")),
        }
    }
}

impl fmt::Display for LevelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target => f.write_str("target"),
            Self::Measured => f.write_str("measured"),
        }
    }
}

/// Largest weightage a single mapping entry may carry
pub const MAX_WEIGHTAGE: f64 = 100.0;

/// Percentage a result achieved on its assessment (`marks / max × 100`).
///
/// Not rounded and not clamped; out-of-range marks are rejected instead.
///
/// # Errors
///
/// Returns an error if the assessment's maximum is not positive or the marks
/// fall outside `[0, max_marks]`.
pub fn percentage(assessment: &Assessment, result: &StudentAssessment) -> Result<f64, ValidationError> {
    check_marks(assessment, result)?;
    Ok(result.marks_obtained * 100.0 / assessment.max_marks)
}

/// Compute the score a student earned on one GA mapping of an assessment.
///
/// The score is `floor(marks × weightage / max_marks)`: the attribute's
/// weightage caps the score and the student's percentage scales it.
///
/// # Errors
///
/// Returns an error if the result belongs to another assessment, the marks or
/// maximum are invalid, the mapping is not declared on the assessment, or its
/// weightage is outside `[0, 100]`.
pub fn compute_ga_score(
    assessment: &Assessment,
    result: &StudentAssessment,
    mapping: &GaMapping,
    policy: LevelPolicy,
) -> Result<GaScore, ValidationError> {
    check_result(assessment, result)?;

    let declared = assessment
        .ga(&mapping.ga_code)
        .ok_or_else(|| ValidationError::MappingNotFound {
            assessment_id: assessment.id.clone(),
            ga_code: mapping.ga_code.clone(),
        })?;

    if !(0.0..=MAX_WEIGHTAGE).contains(&declared.weightage) {
        return Err(ValidationError::InvalidWeightage {
            assessment_id: assessment.id.clone(),
            kind: MappingKind::Ga,
            code: declared.ga_code.clone(),
            weightage: declared.weightage,
        });
    }

    // Multiply before dividing so exact cases such as 40 × 40 / 50 stay exact.
    let raw = (result.marks_obtained * declared.weightage / assessment.max_marks).floor();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let score = raw as u32;

    let level = match policy {
        LevelPolicy::Target => declared.target_level,
        LevelPolicy::Measured => ProficiencyLevel::from_percentage(
            result.marks_obtained * 100.0 / assessment.max_marks,
        ),
    };

    Ok(GaScore {
        ga_code: declared.ga_code.clone(),
        score,
        level,
        weightage: declared.weightage,
    })
}

/// Compute one GA score per mapping on the assessment, in mapping order.
///
/// # Errors
///
/// Returns an error if the result itself is invalid, even when the
/// assessment maps no GA, and otherwise the first error raised by
/// [`compute_ga_score`].
pub fn score_assessment(
    assessment: &Assessment,
    result: &StudentAssessment,
    policy: LevelPolicy,
) -> Result<Vec<GaScore>, ValidationError> {
    check_result(assessment, result)?;
    assessment
        .ga_mapping
        .iter()
        .map(|mapping| compute_ga_score(assessment, result, mapping, policy))
        .collect()
}

fn check_result(assessment: &Assessment, result: &StudentAssessment) -> Result<(), ValidationError> {
    if result.assessment_id != assessment.id {
        return Err(ValidationError::AssessmentMismatch {
            record_id: result.id.clone(),
            expected: assessment.id.clone(),
            found: result.assessment_id.clone(),
        });
    }
    check_marks(assessment, result)
}

fn check_marks(assessment: &Assessment, result: &StudentAssessment) -> Result<(), ValidationError> {
    let max_marks = assessment.max_marks;
    if max_marks.is_nan() || max_marks <= 0.0 {
        return Err(ValidationError::NonPositiveMaxMarks {
            assessment_id: assessment.id.clone(),
            max_marks,
        });
    }
    if !(0.0..=max_marks).contains(&result.marks_obtained) {
        return Err(ValidationError::MarksOutOfRange {
            assessment_id: assessment.id.clone(),
            student_id: result.student_id.clone(),
            marks: result.marks_obtained,
            max_marks,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::AssessmentType;

    fn assessment(max_marks: f64, mappings: Vec<GaMapping>) -> Assessment {
        let mut assessment = Assessment::new("c-1", AssessmentType::Quiz, max_marks, 10.0);
        assessment.id = "a-1".to_string();
        assessment.ga_mapping = mappings;
        assessment
    }

    fn ga1(weightage: f64) -> GaMapping {
        GaMapping::new("GA1", "Engineering Knowledge", weightage, ProficiencyLevel::Intermediate)
    }

    fn result(marks: f64) -> StudentAssessment {
        let mut result = StudentAssessment::new("s-1", "a-1", marks);
        result.id = "r-1".to_string();
        result
    }

    #[test]
    fn test_scores_weighted_share_of_marks() {
        let a = assessment(50.0, vec![ga1(40.0)]);

        let score = compute_ga_score(&a, &result(40.0), &ga1(40.0), LevelPolicy::Target)
            .expect("valid score");

        assert_eq!(score.score, 32);
        assert_eq!(score.ga_code, "GA1");
        assert_eq!(score.level, ProficiencyLevel::Intermediate);
        assert!((score.weightage - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_floors_fractional_scores() {
        let a = assessment(30.0, vec![ga1(25.0)]);

        // 17 / 30 × 25 = 14.1666…
        let score = compute_ga_score(&a, &result(17.0), &ga1(25.0), LevelPolicy::Target)
            .expect("valid score");

        assert_eq!(score.score, 14);
    }

    #[test]
    fn test_score_spans_zero_to_weightage() {
        let a = assessment(20.0, vec![ga1(35.0)]);

        let zero = compute_ga_score(&a, &result(0.0), &ga1(35.0), LevelPolicy::Target).expect("zero");
        let full = compute_ga_score(&a, &result(20.0), &ga1(35.0), LevelPolicy::Target).expect("full");

        assert_eq!(zero.score, 0);
        assert_eq!(full.score, 35);
    }

    #[test]
    fn test_measured_policy_classifies_percentage() {
        let a = assessment(50.0, vec![ga1(40.0)]);

        let advanced = compute_ga_score(&a, &result(40.0), &ga1(40.0), LevelPolicy::Measured).expect("80%");
        let intermediate =
            compute_ga_score(&a, &result(39.5), &ga1(40.0), LevelPolicy::Measured).expect("79%");
        let introductory =
            compute_ga_score(&a, &result(29.0), &ga1(40.0), LevelPolicy::Measured).expect("58%");

        assert_eq!(advanced.level, ProficiencyLevel::Advanced);
        assert_eq!(intermediate.level, ProficiencyLevel::Intermediate);
        assert_eq!(introductory.level, ProficiencyLevel::Introductory);
    }

    #[test]
    fn test_rejects_zero_max_marks() {
        let a = assessment(0.0, vec![ga1(40.0)]);

        let err = compute_ga_score(&a, &result(0.0), &ga1(40.0), LevelPolicy::Target).unwrap_err();

        assert!(matches!(err, ValidationError::NonPositiveMaxMarks { .. }));
    }

    #[test]
    fn test_rejects_marks_out_of_range() {
        let a = assessment(50.0, vec![ga1(40.0)]);

        for marks in [-1.0, 50.5, f64::NAN] {
            let err = compute_ga_score(&a, &result(marks), &ga1(40.0), LevelPolicy::Target).unwrap_err();
            assert!(matches!(err, ValidationError::MarksOutOfRange { .. }), "marks {marks}");
        }
    }

    #[test]
    fn test_rejects_unknown_mapping() {
        let a = assessment(50.0, vec![ga1(40.0)]);
        let other = GaMapping::new("GA5", "Modern Tools", 20.0, ProficiencyLevel::Advanced);

        let err = compute_ga_score(&a, &result(10.0), &other, LevelPolicy::Target).unwrap_err();

        assert_eq!(
            err,
            ValidationError::MappingNotFound {
                assessment_id: "a-1".to_string(),
                ga_code: "GA5".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_result_for_other_assessment() {
        let a = assessment(50.0, vec![ga1(40.0)]);
        let mut foreign = result(10.0);
        foreign.assessment_id = "a-2".to_string();

        let err = compute_ga_score(&a, &foreign, &ga1(40.0), LevelPolicy::Target).unwrap_err();

        assert!(matches!(err, ValidationError::AssessmentMismatch { .. }));
    }

    #[test]
    fn test_rejects_negative_weightage() {
        let a = assessment(50.0, vec![ga1(-5.0)]);

        let err = compute_ga_score(&a, &result(10.0), &ga1(-5.0), LevelPolicy::Target).unwrap_err();

        assert!(matches!(err, ValidationError::InvalidWeightage { .. }));
    }

    #[test]
    fn test_rejects_weightage_above_100() {
        let a = assessment(50.0, vec![ga1(1e12)]);

        let err = compute_ga_score(&a, &result(50.0), &ga1(1e12), LevelPolicy::Target).unwrap_err();

        assert!(matches!(err, ValidationError::InvalidWeightage { .. }));
    }

    #[test]
    fn test_unmapped_assessment_still_validates_the_result() {
        let zero_max = assessment(0.0, vec![]);
        let negative = assessment(50.0, vec![]);
        let mut foreign = result(10.0);
        foreign.assessment_id = "a-2".to_string();

        let err = score_assessment(&zero_max, &result(-5.0), LevelPolicy::Target).unwrap_err();
        assert!(matches!(err, ValidationError::NonPositiveMaxMarks { .. }));

        let err = score_assessment(&negative, &result(-5.0), LevelPolicy::Target).unwrap_err();
        assert!(matches!(err, ValidationError::MarksOutOfRange { .. }));

        let err = score_assessment(&negative, &foreign, LevelPolicy::Target).unwrap_err();
        assert!(matches!(err, ValidationError::AssessmentMismatch { .. }));

        assert_eq!(score_assessment(&negative, &result(10.0), LevelPolicy::Target), Ok(Vec::new()));
    }

    #[test]
    fn test_scores_every_mapping_in_order() {
        let a = assessment(
            40.0,
            vec![
                ga1(50.0),
                GaMapping::new("GA3", "Design", 30.0, ProficiencyLevel::Advanced),
                GaMapping::new("GA4", "Investigation", 20.0, ProficiencyLevel::Introductory),
            ],
        );

        let scores = score_assessment(&a, &result(30.0), LevelPolicy::Target).expect("scores");

        let summary: Vec<_> = scores.iter().map(|s| (s.ga_code.as_str(), s.score)).collect();
        assert_eq!(summary, [("GA1", 37), ("GA3", 22), ("GA4", 15)]);
    }

    #[test]
    fn test_parses_level_policy() {
        assert_eq!("Target".parse::<LevelPolicy>(), Ok(LevelPolicy::Target));
        assert_eq!("measured".parse::<LevelPolicy>(), Ok(LevelPolicy::Measured));
        assert!("auto".parse::<LevelPolicy>().is_err());
        assert_eq!(LevelPolicy::default().to_string(), "target");
    }

    #[test]
    fn test_percentage_is_not_rounded() {
        let a = assessment(30.0, vec![]);

        let pct = percentage(&a, &result(10.0)).expect("percentage");

        assert!((pct - 33.333_333_333_333_336).abs() < 1e-9);
    }
}

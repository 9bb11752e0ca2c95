//! Property-style tests for the scoring and aggregation engine

use ga_analytics::core::engine::{
    aggregate_performance, compute_ga_score, coverage, coverage_by_code, summarize_percentages,
    validate_mapping_weights, Histogram, LevelPolicy, PerformanceBucket, PerformanceSummary,
    DEFAULT_WEIGHT_TOLERANCE,
};
use ga_analytics::core::models::{
    Assessment, AssessmentType, Course, GaMapping, MappingKind, OutcomeDef, OutcomeMapping, ProficiencyLevel,
    Student, StudentAssessment,
};

fn assessment(id: &str, max_marks: f64, mappings: Vec<GaMapping>) -> Assessment {
    let mut assessment = Assessment::new("c-1", AssessmentType::MidTerm, max_marks, 30.0);
    assessment.id = id.to_string();
    assessment.ga_mapping = mappings;
    assessment
}

fn ga(code: &str, weightage: f64) -> GaMapping {
    GaMapping::new(code, "", weightage, ProficiencyLevel::Intermediate)
}

fn result(assessment_id: &str, marks: f64) -> StudentAssessment {
    StudentAssessment::new("s-1", assessment_id, marks)
}

#[test]
fn test_score_is_bounded_and_monotonic() {
    for (max_marks, weightage) in [(50.0, 40.0), (30.0, 25.0), (7.0, 100.0), (100.0, 33.0)] {
        let mapping = ga("GA1", weightage);
        let a = assessment("a-1", max_marks, vec![mapping.clone()]);

        let mut previous = 0;
        let mut marks = 0.0;
        while marks <= max_marks {
            let score = compute_ga_score(&a, &result("a-1", marks), &mapping, LevelPolicy::Target)
                .expect("in-range marks score")
                .score;
            assert!(f64::from(score) <= weightage, "{marks}/{max_marks} scored {score} > {weightage}");
            assert!(score >= previous, "score fell from {previous} to {score} at {marks}");
            previous = score;
            marks += 0.5;
        }
    }
}

#[test]
fn test_end_to_end_score() {
    let mapping = ga("GA1", 40.0);
    let a = assessment("a-1", 50.0, vec![mapping.clone()]);

    let score = compute_ga_score(&a, &result("a-1", 40.0), &mapping, LevelPolicy::Target).expect("score");

    assert_eq!(score.score, 32);
}

#[test]
fn test_empty_aggregate_is_zero_state() {
    let summary = aggregate_performance(&[], &[]).expect("empty aggregate");

    assert_eq!(summary.value, PerformanceSummary::default());
    assert!(summary.value.average.abs() < f64::EPSILON);
    assert_eq!(summary.value.histogram, Histogram::default());
    assert!(summary.warnings.is_empty());
}

#[test]
fn test_histogram_counts_sum_to_input_length() {
    let a = assessment("a-1", 40.0, Vec::new());
    let results: Vec<_> = (0..=40).map(|m| result("a-1", f64::from(m))).collect();

    let summary = aggregate_performance(&results, std::slice::from_ref(&a)).expect("aggregate");

    assert_eq!(summary.value.histogram.total(), results.len());
    assert_eq!(summary.value.records, results.len());
}

#[test]
fn test_bucket_boundaries() {
    assert_eq!(PerformanceBucket::from_percentage(90.0), PerformanceBucket::Excellent);
    assert_eq!(PerformanceBucket::from_percentage(89.999), PerformanceBucket::Good);
    assert_eq!(PerformanceBucket::from_percentage(80.0), PerformanceBucket::Good);
    assert_eq!(PerformanceBucket::from_percentage(70.0), PerformanceBucket::Average);
    assert_eq!(PerformanceBucket::from_percentage(60.0), PerformanceBucket::BelowAverage);
    assert_eq!(PerformanceBucket::from_percentage(59.999), PerformanceBucket::Poor);
}

#[test]
fn test_boundary_marks_through_aggregation() {
    // 45/50 = 90%, 30/50 = 60%, 40/50 = 80%
    let a = assessment("a-1", 50.0, Vec::new());
    let results = [result("a-1", 45.0), result("a-1", 30.0), result("a-1", 40.0)];

    let summary = aggregate_performance(&results, std::slice::from_ref(&a)).expect("aggregate");
    let histogram = summary.value.histogram;

    assert_eq!(histogram.excellent, 1);
    assert_eq!(histogram.good, 1);
    assert_eq!(histogram.below_average, 1);
    assert_eq!(histogram.poor, 0);
}

#[test]
fn test_summarize_matches_mean() {
    let summary = summarize_percentages(&[100.0, 50.0, 75.0]);

    assert!((summary.average - 75.0).abs() < 1e-9);
    assert_eq!(summary.histogram.count(PerformanceBucket::Average), 1);
}

#[test]
fn test_coverage_counts_references_not_weights() {
    let assessments = [
        assessment("a-1", 10.0, vec![ga("GA1", 30.0)]),
        assessment("a-2", 10.0, vec![ga("GA1", 40.0)]),
    ];

    let counts = coverage(&assessments, MappingKind::Ga);

    assert_eq!(counts.iter().collect::<Vec<_>>(), [("GA1", 2)]);
}

#[test]
fn test_coverage_selector_reaches_any_list() {
    let mut first = assessment("a-1", 10.0, Vec::new());
    first.co_mapping = vec![OutcomeMapping::new("CO1", 50.0), OutcomeMapping::new("CO2", 50.0)];
    let mut second = assessment("a-2", 10.0, Vec::new());
    second.co_mapping = vec![OutcomeMapping::new("CO2", 100.0)];
    let assessments = [first, second];

    let counts = coverage_by_code(&assessments, |a| a.co_mapping.iter().map(|m| m.code.as_str()));

    assert_eq!(counts, coverage(&assessments, MappingKind::Co));
    assert_eq!(counts.get("CO2"), 2);
}

#[test]
fn test_weight_sum_validation() {
    let short = [ga("GA1", 40.0), ga("GA2", 35.0), ga("GA3", 20.0)];
    let exact = [ga("GA1", 50.0), ga("GA2", 50.0)];

    assert_eq!(
        validate_mapping_weights("a-1", MappingKind::Ga, &short, DEFAULT_WEIGHT_TOLERANCE).len(),
        1
    );
    assert!(validate_mapping_weights("a-1", MappingKind::Ga, &exact, DEFAULT_WEIGHT_TOLERANCE).is_empty());
}

#[test]
fn test_storage_round_trip_preserves_fields() {
    let mut student = Student::new("24CS001", "Ravi Kumar", "Computer Science", "2024-28", "A");
    student.id = "s-1".to_string();
    student.email = "ravi@uni.edu".to_string();
    student.semester = 3;

    let mut course = Course::new("CS201", "Algorithms", "Computer Science", "2024-28", 3.5).taught_by("f-1", "Asha");
    course.id = "c-1".to_string();
    for code in ["CO3", "CO1", "CO2"] {
        course.add_course_outcome(OutcomeDef::new(code, format!("Outcome {code}")));
    }
    course.add_program_outcome(OutcomeDef::new("PO2", "Problem analysis"));
    course.add_program_outcome(OutcomeDef::new("PO1", "Engineering knowledge"));

    let mut a = assessment("a-1", 50.0, vec![ga("GA2", 60.0), ga("GA1", 40.0)]);
    a.title = "Mid-term exam".to_string();
    a.co_mapping = vec![OutcomeMapping::new("CO3", 70.0), OutcomeMapping::new("CO1", 30.0)];
    a.po_mapping = vec![OutcomeMapping::new("PO2", 100.0)];

    let mut r = result("a-1", 37.5).evaluated_by("f-1");
    r.id = "r-1".to_string();

    let student_back: Student =
        serde_json::from_str(&serde_json::to_string(&student).expect("ser")).expect("de");
    let course_back: Course = serde_json::from_str(&serde_json::to_string(&course).expect("ser")).expect("de");
    let assessment_back: Assessment = serde_json::from_str(&serde_json::to_string(&a).expect("ser")).expect("de");
    let result_back: StudentAssessment =
        serde_json::from_str(&serde_json::to_string(&r).expect("ser")).expect("de");

    assert_eq!(student_back, student);
    assert_eq!(course_back, course);
    assert_eq!(
        course_back.co_catalog.iter().map(|o| o.code.as_str()).collect::<Vec<_>>(),
        ["CO3", "CO1", "CO2"]
    );
    assert_eq!(assessment_back, a);
    assert_eq!(result_back, r);
}

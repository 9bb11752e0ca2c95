//! Cohort performance aggregation

use super::scoring::percentage;
use super::{Assessed, IntegrityWarning, ValidationError};
use crate::core::models::{Assessment, StudentAssessment};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Performance band of a single result percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PerformanceBucket {
    /// 90 to 100
    Excellent,
    /// 80 up to 90
    Good,
    /// 70 up to 80
    Average,
    /// 60 up to 70
    BelowAverage,
    /// Below 60
    Poor,
}

impl PerformanceBucket {
    /// All buckets, best first
    pub const ALL: [Self; 5] = [
        Self::Excellent,
        Self::Good,
        Self::Average,
        Self::BelowAverage,
        Self::Poor,
    ];

    /// Bucket for a percentage; lower bounds are inclusive
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Self::Excellent
        } else if percentage >= 80.0 {
            Self::Good
        } else if percentage >= 70.0 {
            Self::Average
        } else if percentage >= 60.0 {
            Self::BelowAverage
        } else {
            Self::Poor
        }
    }

    /// Range label used in reports (e.g., "80-89%")
    #[must_use]
    pub const fn range_label(self) -> &'static str {
        match self {
            Self::Excellent => "90-100%",
            Self::Good => "80-89%",
            Self::Average => "70-79%",
            Self::BelowAverage => "60-69%",
            Self::Poor => "<60%",
        }
    }
}

impl fmt::Display for PerformanceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::BelowAverage => "Below Average",
            Self::Poor => "Poor",
        };
        f.write_str(label)
    }
}

/// Result counts per performance bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Histogram {
    /// Results at 90% or above
    pub excellent: usize,
    /// Results from 80% up to 90%
    pub good: usize,
    /// Results from 70% up to 80%
    pub average: usize,
    /// Results from 60% up to 70%
    pub below_average: usize,
    /// Results below 60%
    pub poor: usize,
}

impl Histogram {
    /// Count for one bucket
    #[must_use]
    pub const fn count(&self, bucket: PerformanceBucket) -> usize {
        match bucket {
            PerformanceBucket::Excellent => self.excellent,
            PerformanceBucket::Good => self.good,
            PerformanceBucket::Average => self.average,
            PerformanceBucket::BelowAverage => self.below_average,
            PerformanceBucket::Poor => self.poor,
        }
    }

    /// Sum of all bucket counts
    #[must_use]
    pub const fn total(&self) -> usize {
        self.excellent + self.good + self.average + self.below_average + self.poor
    }

    /// Bucket counts, best first
    pub fn iter(&self) -> impl Iterator<Item = (PerformanceBucket, usize)> + '_ {
        PerformanceBucket::ALL.into_iter().map(|b| (b, self.count(b)))
    }

    const fn with(mut self, bucket: PerformanceBucket) -> Self {
        match bucket {
            PerformanceBucket::Excellent => self.excellent += 1,
            PerformanceBucket::Good => self.good += 1,
            PerformanceBucket::Average => self.average += 1,
            PerformanceBucket::BelowAverage => self.below_average += 1,
            PerformanceBucket::Poor => self.poor += 1,
        }
        self
    }
}

/// Average percentage and bucket histogram over a set of results
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    /// Mean of per-result percentages; 0 when there are no results
    pub average: f64,
    /// Results per bucket
    pub histogram: Histogram,
    /// Number of results aggregated
    pub records: usize,
}

impl PerformanceSummary {
    /// Average formatted to one decimal place
    #[must_use]
    pub fn average_display(&self) -> String {
        format!("{:.1}", self.average)
    }

    /// Whether no results were aggregated
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records == 0
    }
}

/// Summarize already-computed percentages.
///
/// Every percentage lands in exactly one bucket, so the histogram total
/// equals the input length. An empty slice yields the zero summary.
#[must_use]
pub fn summarize_percentages(percentages: &[f64]) -> PerformanceSummary {
    if percentages.is_empty() {
        return PerformanceSummary::default();
    }
    let histogram = percentages
        .iter()
        .map(|p| PerformanceBucket::from_percentage(*p))
        .fold(Histogram::default(), Histogram::with);

    #[allow(clippy::cast_precision_loss)]
    let average = percentages.iter().sum::<f64>() / percentages.len() as f64;

    PerformanceSummary {
        average,
        histogram,
        records: percentages.len(),
    }
}

/// Aggregate results into an average percentage and a performance histogram.
///
/// Results are the unit of aggregation: a student with five results
/// contributes five data points. A result whose assessment is not in
/// `assessments` is skipped and reported as [`IntegrityWarning::OrphanedRecord`].
///
/// # Errors
///
/// Returns an error if a result's assessment has a non-positive maximum or
/// the result's marks are out of range.
pub fn aggregate_performance(
    results: &[StudentAssessment],
    assessments: &[Assessment],
) -> Result<Assessed<PerformanceSummary>, ValidationError> {
    let by_id: HashMap<&str, &Assessment> = assessments.iter().map(|a| (a.id.as_str(), a)).collect();

    let mut percentages = Vec::with_capacity(results.len());
    let mut warnings = Vec::new();

    for result in results {
        match by_id.get(result.assessment_id.as_str()) {
            Some(assessment) => percentages.push(percentage(assessment, result)?),
            None => warnings.push(IntegrityWarning::OrphanedRecord {
                record_id: result.id.clone(),
                assessment_id: result.assessment_id.clone(),
            }),
        }
    }

    Ok(Assessed {
        value: summarize_percentages(&percentages),
        warnings,
    })
}

/// Mean stored score of one graduate attribute across a cohort
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaAttainment {
    /// Graduate attribute code
    pub ga_code: String,
    /// Number of GA scores seen
    pub samples: usize,
    /// Mean score
    pub average_score: f64,
    /// Mean weightage (the mean maximum attainable score)
    pub average_weightage: f64,
    /// Total score as a percentage of total weightage; 0 when no weight was mapped
    pub attainment: f64,
}

/// Summarize the stored GA scores of a set of results, per GA code.
///
/// Codes appear in order of first appearance.
#[must_use]
pub fn ga_attainment(results: &[StudentAssessment]) -> Vec<GaAttainment> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, (usize, f64, f64)> = HashMap::new();

    for score in results.iter().flat_map(|r| &r.ga_scores) {
        let entry = totals.entry(score.ga_code.as_str()).or_insert_with(|| {
            order.push(score.ga_code.as_str());
            (0, 0.0, 0.0)
        });
        entry.0 += 1;
        entry.1 += f64::from(score.score);
        entry.2 += score.weightage;
    }

    order
        .into_iter()
        .filter_map(|code| totals.get(code).map(|t| (code, *t)))
        .map(|(code, (samples, score_sum, weight_sum))| {
            #[allow(clippy::cast_precision_loss)]
            let n = samples as f64;
            GaAttainment {
                ga_code: code.to_string(),
                samples,
                average_score: score_sum / n,
                average_weightage: weight_sum / n,
                attainment: if weight_sum > 0.0 {
                    score_sum / weight_sum * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect()
}

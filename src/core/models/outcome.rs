//! Outcome catalogs, mapping entries and proficiency levels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Percentage at or above which a measured level is `Intermediate`
pub const INTERMEDIATE_THRESHOLD: f64 = 60.0;

/// Percentage at or above which a measured level is `Advanced`
pub const ADVANCED_THRESHOLD: f64 = 80.0;

/// A course or program outcome declared in a course catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeDef {
    /// Outcome code (e.g., "CO1", "PO3")
    pub code: String,
    /// Human-readable outcome description
    pub name: String,
}

impl OutcomeDef {
    /// Create a new catalog entry
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Proficiency level of a graduate attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    /// Below 60%
    Introductory,
    /// 60% up to (not including) 80%
    Intermediate,
    /// 80% and above
    Advanced,
}

impl ProficiencyLevel {
    /// Classify a percentage with the reporting thresholds.
    ///
    /// `<60` is `Introductory`, `60..80` is `Intermediate`, `>=80` is `Advanced`.
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= ADVANCED_THRESHOLD {
            Self::Advanced
        } else if percentage >= INTERMEDIATE_THRESHOLD {
            Self::Intermediate
        } else {
            Self::Introductory
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Introductory => "Introductory",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        };
        f.write_str(label)
    }
}

/// A graduate attribute mapped onto an assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaMapping {
    /// Graduate attribute code (e.g., "GA1")
    pub ga_code: String,
    /// Graduate attribute name (e.g., "Problem Analysis")
    pub ga_name: String,
    /// Weightage percent of this attribute within the assessment
    pub weightage: f64,
    /// Level the assessment is designed to exercise
    pub target_level: ProficiencyLevel,
}

impl GaMapping {
    /// Create a new GA mapping entry
    #[must_use]
    pub fn new(
        ga_code: impl Into<String>,
        ga_name: impl Into<String>,
        weightage: f64,
        target_level: ProficiencyLevel,
    ) -> Self {
        Self {
            ga_code: ga_code.into(),
            ga_name: ga_name.into(),
            weightage,
            target_level,
        }
    }
}

/// A CO or PO referenced by an assessment, by code, with a weightage percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeMapping {
    /// Code of the referenced catalog entry
    pub code: String,
    /// Weightage percent of this outcome within the assessment
    pub weightage: f64,
}

impl OutcomeMapping {
    /// Create a new CO/PO mapping entry
    #[must_use]
    pub fn new(code: impl Into<String>, weightage: f64) -> Self {
        Self {
            code: code.into(),
            weightage,
        }
    }
}

/// A mapping entry that carries a code and a weightage percent.
///
/// Lets weight validation and coverage run over GA, CO and PO lists alike.
pub trait WeightedMapping {
    /// Code of the mapped attribute or outcome
    fn code(&self) -> &str;
    /// Weightage percent of the entry
    fn weightage(&self) -> f64;
}

impl WeightedMapping for GaMapping {
    fn code(&self) -> &str {
        &self.ga_code
    }

    fn weightage(&self) -> f64 {
        self.weightage
    }
}

impl WeightedMapping for OutcomeMapping {
    fn code(&self) -> &str {
        &self.code
    }

    fn weightage(&self) -> f64 {
        self.weightage
    }
}

/// Which mapping list of an assessment is meant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MappingKind {
    /// Graduate attributes
    #[serde(rename = "GA")]
    Ga,
    /// Course outcomes
    #[serde(rename = "CO")]
    Co,
    /// Program outcomes
    #[serde(rename = "PO")]
    Po,
}

impl MappingKind {
    /// All mapping kinds, in report order
    pub const ALL: [Self; 3] = [Self::Ga, Self::Co, Self::Po];
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ga => "GA",
            Self::Co => "CO",
            Self::Po => "PO",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measured_level_thresholds() {
        assert_eq!(ProficiencyLevel::from_percentage(0.0), ProficiencyLevel::Introductory);
        assert_eq!(ProficiencyLevel::from_percentage(59.99), ProficiencyLevel::Introductory);
        assert_eq!(ProficiencyLevel::from_percentage(60.0), ProficiencyLevel::Intermediate);
        assert_eq!(ProficiencyLevel::from_percentage(79.9), ProficiencyLevel::Intermediate);
        assert_eq!(ProficiencyLevel::from_percentage(80.0), ProficiencyLevel::Advanced);
        assert_eq!(ProficiencyLevel::from_percentage(100.0), ProficiencyLevel::Advanced);
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(ProficiencyLevel::Introductory < ProficiencyLevel::Intermediate);
        assert!(ProficiencyLevel::Intermediate < ProficiencyLevel::Advanced);
    }

    #[test]
    fn test_weighted_mapping_reads_both_entry_kinds() {
        let ga = GaMapping::new("GA2", "Design", 35.0, ProficiencyLevel::Advanced);
        let co = OutcomeMapping::new("CO1", 50.0);

        assert_eq!(ga.code(), "GA2");
        assert!((WeightedMapping::weightage(&ga) - 35.0).abs() < f64::EPSILON);
        assert_eq!(co.code(), "CO1");
        assert!((WeightedMapping::weightage(&co) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mapping_kind_serializes_as_short_code() {
        let json = serde_json::to_string(&MappingKind::ALL).expect("serialize kinds");
        assert_eq!(json, r#"["GA","CO","PO"]"#);
        assert_eq!(MappingKind::Po.to_string(), "PO");
    }
}

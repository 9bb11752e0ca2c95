//! Assessment model

use super::{GaMapping, MappingKind, OutcomeMapping, WeightedMapping};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssessmentType {
    /// Short quiz
    Quiz,
    /// Take-home assignment
    Assignment,
    /// Mid-semester examination
    #[serde(rename = "Mid-Term")]
    MidTerm,
    /// End-semester examination
    #[serde(rename = "End-Term")]
    EndTerm,
    /// Project work
    Project,
    /// Laboratory work
    Lab,
    /// Presentation
    Presentation,
}

impl fmt::Display for AssessmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Quiz => "Quiz",
            Self::Assignment => "Assignment",
            Self::MidTerm => "Mid-Term",
            Self::EndTerm => "End-Term",
            Self::Project => "Project",
            Self::Lab => "Lab",
            Self::Presentation => "Presentation",
        };
        f.write_str(label)
    }
}

/// An assessment of a course, with its GA/CO/PO mappings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    /// Opaque record id, assigned by the store
    #[serde(default)]
    pub id: String,

    /// Id of the owning course
    pub course_id: String,

    /// Display title (e.g., "Quiz 1")
    #[serde(default)]
    pub title: String,

    /// Assessment kind
    #[serde(rename = "type")]
    pub kind: AssessmentType,

    /// Maximum marks; must be positive
    pub max_marks: f64,

    /// Weightage percent of this assessment toward the course
    pub weightage: f64,

    /// Graduate attribute mappings
    #[serde(default)]
    pub ga_mapping: Vec<GaMapping>,

    /// Course outcome mappings (codes from the course CO catalog)
    #[serde(default)]
    pub co_mapping: Vec<OutcomeMapping>,

    /// Program outcome mappings (codes from the course PO catalog)
    #[serde(default)]
    pub po_mapping: Vec<OutcomeMapping>,
}

impl Assessment {
    /// Create a new assessment without mappings
    ///
    /// # Arguments
    /// * `course_id` - Owning course id
    /// * `kind` - Assessment kind
    /// * `max_marks` - Maximum marks
    /// * `weightage` - Weightage percent toward the course
    #[must_use]
    pub fn new(course_id: impl Into<String>, kind: AssessmentType, max_marks: f64, weightage: f64) -> Self {
        Self {
            id: String::new(),
            course_id: course_id.into(),
            title: String::new(),
            kind,
            max_marks,
            weightage,
            ga_mapping: Vec::new(),
            co_mapping: Vec::new(),
            po_mapping: Vec::new(),
        }
    }

    /// Find the GA mapping for `ga_code`
    #[must_use]
    pub fn ga(&self, ga_code: &str) -> Option<&GaMapping> {
        self.ga_mapping.iter().find(|m| m.ga_code == ga_code)
    }

    /// Codes of one mapping list, in declaration order
    #[must_use]
    pub fn mapping_codes(&self, kind: MappingKind) -> Vec<&str> {
        match kind {
            MappingKind::Ga => codes_of(&self.ga_mapping),
            MappingKind::Co => codes_of(&self.co_mapping),
            MappingKind::Po => codes_of(&self.po_mapping),
        }
    }

    /// Display label: the title, or the kind when untitled
    #[must_use]
    pub fn label(&self) -> String {
        if self.title.is_empty() {
            self.kind.to_string()
        } else {
            self.title.clone()
        }
    }
}

fn codes_of<M: WeightedMapping>(list: &[M]) -> Vec<&str> {
    list.iter().map(WeightedMapping::code).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ProficiencyLevel;

    fn mid_term() -> Assessment {
        let mut assessment = Assessment::new("c-1", AssessmentType::MidTerm, 50.0, 30.0);
        assessment.ga_mapping = vec![
            GaMapping::new("GA1", "Engineering Knowledge", 60.0, ProficiencyLevel::Intermediate),
            GaMapping::new("GA2", "Problem Analysis", 40.0, ProficiencyLevel::Advanced),
        ];
        assessment.co_mapping = vec![OutcomeMapping::new("CO2", 100.0)];
        assessment
    }

    #[test]
    fn test_find_ga_mapping() {
        let assessment = mid_term();

        assert_eq!(assessment.ga("GA2").map(|m| m.ga_name.as_str()), Some("Problem Analysis"));
        assert!(assessment.ga("GA9").is_none());
    }

    #[test]
    fn test_mapping_codes_by_kind() {
        let assessment = mid_term();

        assert_eq!(assessment.mapping_codes(MappingKind::Ga), ["GA1", "GA2"]);
        assert_eq!(assessment.mapping_codes(MappingKind::Co), ["CO2"]);
        assert!(assessment.mapping_codes(MappingKind::Po).is_empty());
    }

    #[test]
    fn test_type_labels_round_trip() {
        let json = serde_json::to_string(&AssessmentType::EndTerm).expect("serialize type");
        assert_eq!(json, "\"End-Term\"");

        let parsed: AssessmentType = serde_json::from_str("\"Mid-Term\"").expect("parse type");
        assert_eq!(parsed, AssessmentType::MidTerm);
        assert_eq!(parsed.to_string(), "Mid-Term");
    }

    #[test]
    fn test_label_falls_back_to_kind() {
        let mut assessment = mid_term();
        assert_eq!(assessment.label(), "Mid-Term");

        assessment.title = "Mid-Term 1".to_string();
        assert_eq!(assessment.label(), "Mid-Term 1");
    }
}

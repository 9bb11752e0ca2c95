//! Data models for `GaAnalytics`

pub mod assessment;
pub mod course;
pub mod faculty;
pub mod outcome;
pub mod result;
pub mod student;

pub use assessment::{Assessment, AssessmentType};
pub use course::Course;
pub use faculty::Faculty;
pub use outcome::{GaMapping, MappingKind, OutcomeDef, OutcomeMapping, ProficiencyLevel, WeightedMapping};
pub use result::{GaScore, StudentAssessment};
pub use student::Student;

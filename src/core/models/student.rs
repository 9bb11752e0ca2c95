//! Student model

use serde::{Deserialize, Serialize};

/// A student enrolled in a batch and section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Opaque record id, assigned by the store
    #[serde(default)]
    pub id: String,

    /// Institutional roll number (e.g., "23CS017")
    pub roll_number: String,

    /// Full name
    pub name: String,

    /// Contact email
    pub email: String,

    /// Department (e.g., "Computer Science")
    pub department: String,

    /// School; derived from the department when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,

    /// Cohort label (e.g., "2023-27")
    pub batch: String,

    /// Current semester, starting at 1
    pub semester: u8,

    /// Section within the batch (e.g., "A")
    pub section: String,
}

impl Student {
    /// Create a new student without an id or explicit school
    ///
    /// # Arguments
    /// * `roll_number` - Roll number
    /// * `name` - Full name
    /// * `department` - Owning department
    /// * `batch` - Cohort label
    /// * `section` - Section label
    #[must_use]
    pub fn new(
        roll_number: impl Into<String>,
        name: impl Into<String>,
        department: impl Into<String>,
        batch: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            roll_number: roll_number.into(),
            name: name.into(),
            email: String::new(),
            department: department.into(),
            school: None,
            batch: batch.into(),
            semester: 1,
            section: section.into(),
        }
    }

    /// Whether this student belongs to the given cohort.
    ///
    /// `None` for either filter matches any value.
    #[must_use]
    pub fn in_cohort(&self, batch: Option<&str>, section: Option<&str>) -> bool {
        batch.is_none_or(|b| self.batch == b) && section.is_none_or(|s| self.section == s)
    }
}

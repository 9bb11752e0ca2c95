//! Course model

use super::{MappingKind, OutcomeDef};
use serde::{Deserialize, Serialize};

/// A course offered to a batch, owning its CO and PO catalogs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Opaque record id, assigned by the store
    #[serde(default)]
    pub id: String,

    /// Course code (e.g., "CS2510")
    pub code: String,

    /// Course name (e.g., "Data Structures")
    pub name: String,

    /// Owning department
    pub department: String,

    /// Owning school
    pub school: String,

    /// Cohort label the offering is for
    pub batch: String,

    /// Semester the course runs in
    pub semester: u8,

    /// Credit count (can be fractional)
    pub credits: f32,

    /// Id of the faculty member who owns the course
    #[serde(default)]
    pub faculty_id: String,

    /// Display name of the owning faculty member
    #[serde(default)]
    pub faculty_name: String,

    /// Course outcomes, in declaration order
    #[serde(default)]
    pub co_catalog: Vec<OutcomeDef>,

    /// Program outcomes, in declaration order
    #[serde(default)]
    pub po_catalog: Vec<OutcomeDef>,
}

impl Course {
    /// Create a new course with empty catalogs and no owner
    ///
    /// # Arguments
    /// * `code` - Course code
    /// * `name` - Course name
    /// * `department` - Owning department
    /// * `batch` - Cohort label
    /// * `credits` - Credit count
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        department: impl Into<String>,
        batch: impl Into<String>,
        credits: f32,
    ) -> Self {
        Self {
            id: String::new(),
            code: code.into(),
            name: name.into(),
            department: department.into(),
            school: String::new(),
            batch: batch.into(),
            semester: 1,
            credits,
            faculty_id: String::new(),
            faculty_name: String::new(),
            co_catalog: Vec::new(),
            po_catalog: Vec::new(),
        }
    }

    /// Assign the owning faculty member
    #[must_use]
    pub fn taught_by(mut self, faculty_id: impl Into<String>, faculty_name: impl Into<String>) -> Self {
        self.faculty_id = faculty_id.into();
        self.faculty_name = faculty_name.into();
        self
    }

    /// Append a course outcome; returns `false` if the code is already declared
    pub fn add_course_outcome(&mut self, outcome: OutcomeDef) -> bool {
        push_unique(&mut self.co_catalog, outcome)
    }

    /// Append a program outcome; returns `false` if the code is already declared
    pub fn add_program_outcome(&mut self, outcome: OutcomeDef) -> bool {
        push_unique(&mut self.po_catalog, outcome)
    }

    /// Catalog backing a CO or PO mapping list.
    ///
    /// Graduate attributes are institution-wide and have no course catalog.
    #[must_use]
    pub fn catalog(&self, kind: MappingKind) -> Option<&[OutcomeDef]> {
        match kind {
            MappingKind::Ga => None,
            MappingKind::Co => Some(&self.co_catalog),
            MappingKind::Po => Some(&self.po_catalog),
        }
    }

    /// Whether the given catalog declares `code`
    #[must_use]
    pub fn declares(&self, kind: MappingKind, code: &str) -> bool {
        self.catalog(kind)
            .is_some_and(|catalog| catalog.iter().any(|o| o.code == code))
    }
}

fn push_unique(catalog: &mut Vec<OutcomeDef>, outcome: OutcomeDef) -> bool {
    if catalog.iter().any(|o| o.code == outcome.code) {
        return false;
    }
    catalog.push(outcome);
    true
}

//! Faculty model

use serde::{Deserialize, Serialize};

/// A faculty member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    /// Opaque record id, assigned by the store
    #[serde(default)]
    pub id: String,

    /// Full name
    pub name: String,

    /// Email address, unique across faculty
    pub email: String,

    /// Owning school
    pub school: String,

    /// Owning department
    pub department: String,

    /// Batches taught
    #[serde(default)]
    pub batches: Vec<String>,

    /// Sections taught
    #[serde(default)]
    pub sections: Vec<String>,

    /// Subjects taught
    #[serde(default)]
    pub subjects: Vec<String>,

    /// Initial password handed to the authentication service; never read here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_password: Option<String>,

    /// Whether the account has been activated
    #[serde(default)]
    pub active: bool,
}

impl Faculty {
    /// Create a new, inactive faculty record
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        school: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            email: email.into(),
            school: school.into(),
            department: department.into(),
            batches: Vec::new(),
            sections: Vec::new(),
            subjects: Vec::new(),
            initial_password: None,
            active: false,
        }
    }

    /// Whether `email` identifies this faculty member (case-insensitive)
    #[must_use]
    pub fn has_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}

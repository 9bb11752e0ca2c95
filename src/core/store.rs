//! In-memory record store with JSON snapshot persistence
//!
//! Holds every record kind the engine reads, keyed by opaque string ids.
//! The store is a plain owned value: load it, mutate it, save it back.

use crate::core::engine::Snapshot;
use crate::core::models::{Assessment, Course, Faculty, Student, StudentAssessment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Failures raised by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record of the given kind has this id
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Record kind (e.g., "student")
        kind: &'static str,
        /// Requested id
        id: String,
    },

    /// The write would break a uniqueness rule
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Reading or writing the snapshot file failed
    #[error("Failed to access store file {path}: {source}")]
    Io {
        /// Snapshot path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON for this store
    #[error("Invalid store JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of [`RecordStore::record_result`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert {
    /// A new record was added under this id
    Inserted(String),
    /// The existing record with this id was overwritten
    Replaced(String),
}

impl Upsert {
    /// Id of the stored record
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Inserted(id) | Self::Replaced(id) => id,
        }
    }
}

/// Records addressable by an opaque id
trait Keyed {
    const KIND: &'static str;
    fn key(&self) -> &str;
    fn set_key(&mut self, id: String);
}

macro_rules! keyed {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(impl Keyed for $ty {
            const KIND: &'static str = $kind;
            fn key(&self) -> &str {
                &self.id
            }
            fn set_key(&mut self, id: String) {
                self.id = id;
            }
        })*
    };
}

keyed! {
    Student => "student",
    Course => "course",
    Assessment => "assessment",
    StudentAssessment => "result",
    Faculty => "faculty",
}

fn insert<R: Keyed>(records: &mut Vec<R>, mut record: R) -> String {
    let id = Uuid::new_v4().to_string();
    record.set_key(id.clone());
    records.push(record);
    crate::debug!("Added {} '{}'", R::KIND, id);
    id
}

fn find<'a, R: Keyed>(records: &'a [R], id: &str) -> Option<&'a R> {
    records.iter().find(|r| r.key() == id)
}

fn replace<R: Keyed>(records: &mut [R], id: &str, mut record: R) -> Result<(), StoreError> {
    let slot = records
        .iter_mut()
        .find(|r| r.key() == id)
        .ok_or_else(|| StoreError::NotFound {
            kind: R::KIND,
            id: id.to_string(),
        })?;
    record.set_key(id.to_string());
    *slot = record;
    crate::debug!("Updated {} '{}'", R::KIND, id);
    Ok(())
}

fn remove<R: Keyed>(records: &mut Vec<R>, id: &str) -> Result<R, StoreError> {
    let index = records
        .iter()
        .position(|r| r.key() == id)
        .ok_or_else(|| StoreError::NotFound {
            kind: R::KIND,
            id: id.to_string(),
        })?;
    crate::debug!("Deleted {} '{}'", R::KIND, id);
    Ok(records.remove(index))
}

/// Keyed collections of every record kind plus the department directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordStore {
    students: Vec<Student>,
    courses: Vec<Course>,
    assessments: Vec<Assessment>,
    student_assessments: Vec<StudentAssessment>,
    faculty: Vec<Faculty>,
    /// Department name to owning school
    departments: BTreeMap<String, String>,
}

impl RecordStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Students

    /// Add a student under a fresh id and return it
    pub fn add_student(&mut self, student: Student) -> String {
        insert(&mut self.students, student)
    }

    /// Look up a student
    #[must_use]
    pub fn get_student(&self, id: &str) -> Option<&Student> {
        find(&self.students, id)
    }

    /// Replace a student record, keeping its id
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no student has this id.
    pub fn update_student(&mut self, id: &str, student: Student) -> Result<(), StoreError> {
        replace(&mut self.students, id, student)
    }

    /// Remove a student. Their results stay; see [`Self::purge_student_results`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no student has this id.
    pub fn delete_student(&mut self, id: &str) -> Result<Student, StoreError> {
        remove(&mut self.students, id)
    }

    /// All students, in insertion order
    #[must_use]
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Students of a batch and/or section; `None` matches any
    #[must_use]
    pub fn students_in_cohort(&self, batch: Option<&str>, section: Option<&str>) -> Vec<&Student> {
        self.students.iter().filter(|s| s.in_cohort(batch, section)).collect()
    }

    // Courses

    /// Add a course under a fresh id and return it
    pub fn add_course(&mut self, course: Course) -> String {
        insert(&mut self.courses, course)
    }

    /// Look up a course
    #[must_use]
    pub fn get_course(&self, id: &str) -> Option<&Course> {
        find(&self.courses, id)
    }

    /// Replace a course record, keeping its id
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no course has this id.
    pub fn update_course(&mut self, id: &str, course: Course) -> Result<(), StoreError> {
        replace(&mut self.courses, id, course)
    }

    /// Remove a course
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no course has this id.
    pub fn delete_course(&mut self, id: &str) -> Result<Course, StoreError> {
        remove(&mut self.courses, id)
    }

    /// All courses, in insertion order
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Courses owned by a faculty member
    #[must_use]
    pub fn courses_taught_by(&self, faculty_id: &str) -> Vec<&Course> {
        self.courses.iter().filter(|c| c.faculty_id == faculty_id).collect()
    }

    // Assessments

    /// Add an assessment under a fresh id and return it
    pub fn add_assessment(&mut self, assessment: Assessment) -> String {
        insert(&mut self.assessments, assessment)
    }

    /// Look up an assessment
    #[must_use]
    pub fn get_assessment(&self, id: &str) -> Option<&Assessment> {
        find(&self.assessments, id)
    }

    /// Replace an assessment record, keeping its id
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no assessment has this id.
    pub fn update_assessment(&mut self, id: &str, assessment: Assessment) -> Result<(), StoreError> {
        replace(&mut self.assessments, id, assessment)
    }

    /// Remove an assessment
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no assessment has this id.
    pub fn delete_assessment(&mut self, id: &str) -> Result<Assessment, StoreError> {
        remove(&mut self.assessments, id)
    }

    /// All assessments, in insertion order
    #[must_use]
    pub fn assessments(&self) -> &[Assessment] {
        &self.assessments
    }

    /// Assessments belonging to a course
    #[must_use]
    pub fn assessments_for_course(&self, course_id: &str) -> Vec<&Assessment> {
        self.assessments.iter().filter(|a| a.course_id == course_id).collect()
    }

    // Results

    /// Store a result, replacing any existing one for the same student and
    /// assessment. A replaced record keeps its original id.
    pub fn record_result(&mut self, mut result: StudentAssessment) -> Upsert {
        if let Some(existing) = self.student_assessments.iter_mut().find(|r| r.same_pair(&result)) {
            let id = existing.id.clone();
            result.id.clone_from(&id);
            *existing = result;
            crate::debug!("Replaced result '{}'", id);
            Upsert::Replaced(id)
        } else {
            Upsert::Inserted(insert(&mut self.student_assessments, result))
        }
    }

    /// Look up a result
    #[must_use]
    pub fn get_result(&self, id: &str) -> Option<&StudentAssessment> {
        find(&self.student_assessments, id)
    }

    /// Mutable access to a stored result (e.g., to attach computed GA scores)
    pub fn get_result_mut(&mut self, id: &str) -> Option<&mut StudentAssessment> {
        self.student_assessments.iter_mut().find(|r| r.id == id)
    }

    /// Remove a result
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no result has this id.
    pub fn delete_result(&mut self, id: &str) -> Result<StudentAssessment, StoreError> {
        remove(&mut self.student_assessments, id)
    }

    /// Remove every result of a student; returns how many were removed
    pub fn purge_student_results(&mut self, student_id: &str) -> usize {
        let before = self.student_assessments.len();
        self.student_assessments.retain(|r| r.student_id != student_id);
        let removed = before - self.student_assessments.len();
        crate::info!("Purged {} result(s) of student '{}'", removed, student_id);
        removed
    }

    /// All results, in insertion order
    #[must_use]
    pub fn results(&self) -> &[StudentAssessment] {
        &self.student_assessments
    }

    /// Results recorded against an assessment
    #[must_use]
    pub fn results_for_assessment(&self, assessment_id: &str) -> Vec<&StudentAssessment> {
        self.student_assessments
            .iter()
            .filter(|r| r.assessment_id == assessment_id)
            .collect()
    }

    // Faculty

    /// Add a faculty member under a fresh id and return it
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the email is already registered.
    pub fn add_faculty(&mut self, faculty: Faculty) -> Result<String, StoreError> {
        self.check_email(&faculty.email, None)?;
        Ok(insert(&mut self.faculty, faculty))
    }

    /// Look up a faculty member
    #[must_use]
    pub fn get_faculty(&self, id: &str) -> Option<&Faculty> {
        find(&self.faculty, id)
    }

    /// Replace a faculty record, keeping its id
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no faculty member has this id, or
    /// [`StoreError::Conflict`] if another member already uses the email.
    pub fn update_faculty(&mut self, id: &str, faculty: Faculty) -> Result<(), StoreError> {
        self.check_email(&faculty.email, Some(id))?;
        replace(&mut self.faculty, id, faculty)
    }

    /// Remove a faculty member
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no faculty member has this id.
    pub fn delete_faculty(&mut self, id: &str) -> Result<Faculty, StoreError> {
        remove(&mut self.faculty, id)
    }

    /// All faculty members, in insertion order
    #[must_use]
    pub fn faculty(&self) -> &[Faculty] {
        &self.faculty
    }

    fn check_email(&self, email: &str, except_id: Option<&str>) -> Result<(), StoreError> {
        let taken = self
            .faculty
            .iter()
            .any(|f| Some(f.id.as_str()) != except_id && f.has_email(email));
        if taken {
            return Err(StoreError::Conflict(format!(
                "faculty email '{}' is already registered",
                email.trim()
            )));
        }
        Ok(())
    }

    // Departments

    /// Record which school a department belongs to
    pub fn register_department(&mut self, department: impl Into<String>, school: impl Into<String>) {
        self.departments.insert(department.into(), school.into());
    }

    /// Department to school directory
    #[must_use]
    pub const fn departments(&self) -> &BTreeMap<String, String> {
        &self.departments
    }

    /// School a student belongs to.
    ///
    /// An explicit `school` on the record wins; otherwise it is looked up
    /// from the department directory, falling back to the department name.
    #[must_use]
    pub fn school_for<'a>(&'a self, student: &'a Student) -> &'a str {
        student
            .school
            .as_deref()
            .or_else(|| self.departments.get(&student.department).map(String::as_str))
            .unwrap_or(&student.department)
    }

    /// Borrow every collection at once for the engine
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            students: &self.students,
            courses: &self.courses,
            assessments: &self.assessments,
            results: &self.student_assessments,
        }
    }

    // Persistence

    /// Parse a store from JSON
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Json`] if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the store as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a store snapshot from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or parsed.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json(&contents)?;
        crate::info!(
            "Loaded store from {} ({} students, {} courses, {} assessments, {} results)",
            path.display(),
            store.students.len(),
            store.courses.len(),
            store.assessments.len(),
            store.student_assessments.len()
        );
        Ok(store)
    }

    /// Save the store snapshot to disk, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file can't be written.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_json()?).map_err(io_err)?;
        crate::info!("Saved store to {}", path.display());
        Ok(())
    }
}

//! Student data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::academic_standing::{GPA_MAX, GPA_MIN};

/// Validation errors returned when constructing students and their fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StudentValidationError {
    /// Student identifier is empty.
    #[error("student id must not be empty")]
    EmptyId,
    /// Student identifier has leading or trailing whitespace.
    #[error("student id must not contain surrounding whitespace")]
    IdContainsWhitespace,
    /// Student name is empty once trimmed.
    #[error("student name must not be empty")]
    EmptyName,
    /// Email address does not look like `local@domain`.
    #[error("student email must be a valid address")]
    InvalidEmail,
    /// Semester must be one or greater.
    #[error("semester must be at least 1")]
    SemesterOutOfRange,
    /// GPA lies outside the 0.0 to 4.0 scale.
    #[error("gpa must lie between {min:.1} and {max:.1}", min = GPA_MIN, max = GPA_MAX)]
    GpaOutOfRange,
}

/// Stable student identifier (registration number).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentId(String);

impl StudentId {
    /// Validate and construct a [`StudentId`].
    ///
    /// # Examples
    /// ```
    /// use registrar::domain::StudentId;
    ///
    /// let id = StudentId::new("230209003").expect("valid id");
    /// assert_eq!(id.as_ref(), "230209003");
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, StudentValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(StudentValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(StudentValidationError::IdContainsWhitespace);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for StudentId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<StudentId> for String {
    fn from(value: StudentId) -> Self {
        value.0
    }
}

impl TryFrom<String> for StudentId {
    type Error = StudentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Academic standing classification derived from GPA and semester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcademicStatus {
    /// In good standing.
    Active,
    /// Below the semester band's threshold but not suspended.
    Probation,
    /// Barred from enrolling in any course.
    Suspended,
}

impl AcademicStatus {
    /// Upper-case label matching the serialised form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Probation => "PROBATION",
            Self::Suspended => "SUSPENDED",
        }
    }
}

impl fmt::Display for AcademicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for [`Student::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct StudentDraft {
    /// Registration number.
    pub id: StudentId,
    /// Full name.
    pub name: String,
    /// Address notifications are sent to.
    pub email: String,
    /// Programme of study.
    pub major: String,
    /// Current semester, starting at 1.
    pub semester: u32,
    /// Cumulative GPA on the 0.0 to 4.0 scale.
    pub gpa: f64,
    /// Current standing.
    pub academic_status: AcademicStatus,
}

/// Enrolled student.
///
/// ## Invariants
/// - `name` is non-empty once trimmed.
/// - `email` has a non-empty local part and domain around a single `@`.
/// - `semester >= 1`.
/// - `gpa` lies in `[0.0, 4.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StudentDto", into = "StudentDto")]
pub struct Student {
    id: StudentId,
    name: String,
    email: String,
    major: String,
    semester: u32,
    gpa: f64,
    academic_status: AcademicStatus,
}

impl Student {
    /// Build a student from a draft, enforcing the type invariants.
    pub fn new(draft: StudentDraft) -> Result<Self, StudentValidationError> {
        let StudentDraft {
            id,
            name,
            email,
            major,
            semester,
            gpa,
            academic_status,
        } = draft;

        if name.trim().is_empty() {
            return Err(StudentValidationError::EmptyName);
        }
        if !is_plausible_email(&email) {
            return Err(StudentValidationError::InvalidEmail);
        }
        if semester == 0 {
            return Err(StudentValidationError::SemesterOutOfRange);
        }
        validate_gpa(gpa)?;

        Ok(Self {
            id,
            name,
            email,
            major,
            semester,
            gpa,
            academic_status,
        })
    }

    /// Return a copy carrying a recomputed GPA and status.
    pub fn with_standing(
        self,
        gpa: f64,
        academic_status: AcademicStatus,
    ) -> Result<Self, StudentValidationError> {
        validate_gpa(gpa)?;
        Ok(Self {
            gpa,
            academic_status,
            ..self
        })
    }

    /// Registration number.
    pub fn id(&self) -> &StudentId {
        &self.id
    }

    /// Full name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Notification address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Programme of study.
    pub fn major(&self) -> &str {
        self.major.as_str()
    }

    /// Current semester.
    pub fn semester(&self) -> u32 {
        self.semester
    }

    /// Cumulative GPA.
    pub fn gpa(&self) -> f64 {
        self.gpa
    }

    /// Current standing.
    pub fn academic_status(&self) -> AcademicStatus {
        self.academic_status
    }

    /// Whether the student is barred from enrolling.
    pub fn is_suspended(&self) -> bool {
        self.academic_status == AcademicStatus::Suspended
    }
}

fn validate_gpa(gpa: f64) -> Result<(), StudentValidationError> {
    if (GPA_MIN..=GPA_MAX).contains(&gpa) {
        Ok(())
    } else {
        Err(StudentValidationError::GpaOutOfRange)
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.trim().is_empty()
                && !domain.trim().is_empty()
                && !domain.contains('@')
                && email.trim() == email
        }
        None => false,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
struct StudentDto {
    id: StudentId,
    name: String,
    email: String,
    #[serde(default)]
    major: String,
    semester: u32,
    gpa: f64,
    academic_status: AcademicStatus,
}

impl From<Student> for StudentDto {
    fn from(value: Student) -> Self {
        let Student {
            id,
            name,
            email,
            major,
            semester,
            gpa,
            academic_status,
        } = value;
        Self {
            id,
            name,
            email,
            major,
            semester,
            gpa,
            academic_status,
        }
    }
}

impl TryFrom<StudentDto> for Student {
    type Error = StudentValidationError;

    fn try_from(value: StudentDto) -> Result<Self, Self::Error> {
        Student::new(StudentDraft {
            id: value.id,
            name: value.name,
            email: value.email,
            major: value.major,
            semester: value.semester,
            gpa: value.gpa,
            academic_status: value.academic_status,
        })
    }
}

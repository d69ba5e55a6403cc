//! Enrollment records produced by successful enroll requests.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CourseCode, StudentId};

/// Identifier of a single enrollment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentId(Uuid);

impl EnrollmentId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    /// Awaiting a decision.
    Pending,
    /// Seat granted.
    Approved,
    /// Request refused.
    Rejected,
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        })
    }
}

/// A student's seat in a course.
///
/// Each successful enroll call produces a new record with a fresh
/// [`EnrollmentId`]; records are never reused after a drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    enrollment_id: EnrollmentId,
    student_id: StudentId,
    course_code: CourseCode,
    enrollment_date: DateTime<Utc>,
    status: EnrollmentStatus,
}

impl Enrollment {
    /// Build an enrollment from its parts.
    pub fn new(
        enrollment_id: EnrollmentId,
        student_id: StudentId,
        course_code: CourseCode,
        enrollment_date: DateTime<Utc>,
        status: EnrollmentStatus,
    ) -> Self {
        Self {
            enrollment_id,
            student_id,
            course_code,
            enrollment_date,
            status,
        }
    }

    /// Build a freshly approved enrollment with a random identifier.
    pub fn approved(
        student_id: StudentId,
        course_code: CourseCode,
        enrollment_date: DateTime<Utc>,
    ) -> Self {
        Self::new(
            EnrollmentId::random(),
            student_id,
            course_code,
            enrollment_date,
            EnrollmentStatus::Approved,
        )
    }

    /// Record identifier.
    pub fn enrollment_id(&self) -> EnrollmentId {
        self.enrollment_id
    }

    /// Enrolled student.
    pub fn student_id(&self) -> &StudentId {
        &self.student_id
    }

    /// Course the seat belongs to.
    pub fn course_code(&self) -> &CourseCode {
        &self.course_code
    }

    /// Creation timestamp.
    pub fn enrollment_date(&self) -> DateTime<Utc> {
        self.enrollment_date
    }

    /// Lifecycle state.
    pub fn status(&self) -> EnrollmentStatus {
        self.status
    }
}

//! Port abstraction for the course catalogue and seat counts.
use async_trait::async_trait;

use crate::domain::{Course, CourseCode, StudentId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by course directory adapters.
    pub enum CourseDirectoryError {
        /// Directory could not be reached.
        Connection { message: String } => "course directory connection failed: {message}",
        /// Lookup or mutation failed during execution.
        Query { message: String } => "course directory query failed: {message}",
    }
}

/// Source of truth for courses and prerequisite decisions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseDirectory: Send + Sync {
    /// Fetch a course by code.
    async fn find_by_code(&self, code: &CourseCode)
    -> Result<Option<Course>, CourseDirectoryError>;

    /// Persist a course record, replacing the stored one.
    async fn update(&self, course: &Course) -> Result<(), CourseDirectoryError>;

    /// Whether the student has completed every prerequisite of the course.
    async fn is_prerequisite_met(
        &self,
        student_id: &StudentId,
        course_code: &CourseCode,
    ) -> Result<bool, CourseDirectoryError>;
}

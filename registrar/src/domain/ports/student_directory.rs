//! Port abstraction for student record storage and their errors.
use async_trait::async_trait;

use crate::domain::{CourseGrade, Student, StudentId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by student directory adapters.
    pub enum StudentDirectoryError {
        /// Directory could not be reached.
        Connection { message: String } => "student directory connection failed: {message}",
        /// Lookup or mutation failed during execution.
        Query { message: String } => "student directory query failed: {message}",
    }
}

/// Source of truth for student records and their completed coursework.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    /// Fetch a student by identifier.
    async fn find_by_id(&self, id: &StudentId) -> Result<Option<Student>, StudentDirectoryError>;

    /// Persist a student record, replacing the stored one.
    async fn update(&self, student: &Student) -> Result<(), StudentDirectoryError>;

    /// Completed course grades for a student. Unknown students have none.
    async fn completed_grades(
        &self,
        id: &StudentId,
    ) -> Result<Vec<CourseGrade>, StudentDirectoryError>;
}

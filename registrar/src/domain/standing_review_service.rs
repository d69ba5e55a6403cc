//! Standing review service.
//!
//! Recomputes GPA, status and credit load from a student's completed grades
//! and writes the new GPA and status back to the student directory.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::academic_standing::{
    calculate_gpa, calculate_max_credits, determine_academic_status,
};
use crate::domain::enrollment_service::map_student_directory_error;
use crate::domain::ports::{StandingReport, StandingReview, StudentDirectory};
use crate::domain::{EntityLocks, Error, StudentId};

/// Standing review service implementing the standing driving port.
#[derive(Clone)]
pub struct StandingReviewService<S> {
    students: Arc<S>,
    student_locks: Arc<EntityLocks>,
}

impl<S> StandingReviewService<S> {
    /// Create a service over the student directory.
    pub fn new(students: Arc<S>) -> Self {
        Self {
            students,
            student_locks: Arc::new(EntityLocks::new()),
        }
    }
}

#[async_trait]
impl<S> StandingReview for StandingReviewService<S>
where
    S: StudentDirectory,
{
    async fn review_standing(&self, student_id: &StudentId) -> Result<StandingReport, Error> {
        let _guard = self.student_locks.acquire(student_id.as_ref()).await;

        let student = self
            .students
            .find_by_id(student_id)
            .await
            .map_err(map_student_directory_error)?
            .ok_or_else(|| {
                Error::student_not_found(format!("student {student_id} not found"))
                    .with_details(json!({ "studentId": student_id.as_ref() }))
            })?;
        let grades = self
            .students
            .completed_grades(student_id)
            .await
            .map_err(map_student_directory_error)?;

        let gpa = calculate_gpa(Some(grades.as_slice()))?;
        let status = determine_academic_status(gpa, student.semester())?;
        let max_credits = calculate_max_credits(gpa)?;
        debug!(
            student_id = %student_id,
            graded_courses = grades.len(),
            gpa,
            "standing recomputed"
        );

        let previous_status = student.academic_status();
        let updated = student
            .with_standing(gpa, status)
            .map_err(|err| Error::internal(format!("student {student_id}: {err}")))?;
        self.students
            .update(&updated)
            .await
            .map_err(map_student_directory_error)?;

        let report = StandingReport {
            student_id: student_id.clone(),
            gpa,
            status,
            max_credits,
            previous_status,
        };
        if report.status_changed() {
            info!(
                student_id = %student_id,
                from = %previous_status,
                to = %status,
                gpa,
                "academic status changed"
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
#[path = "standing_review_service_tests.rs"]
mod tests;

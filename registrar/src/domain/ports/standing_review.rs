//! Driving port for recomputing a student's academic standing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{AcademicStatus, Error, StudentId};

/// Outcome of a standing review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingReport {
    /// Reviewed student.
    pub student_id: StudentId,
    /// Recomputed cumulative GPA.
    pub gpa: f64,
    /// Status derived from the GPA and the student's semester.
    pub status: AcademicStatus,
    /// Maximum credits for the next term.
    pub max_credits: u32,
    /// Status held before the review.
    pub previous_status: AcademicStatus,
}

impl StandingReport {
    /// Whether the review moved the student to a different status.
    pub fn status_changed(&self) -> bool {
        self.status != self.previous_status
    }
}

/// Driving port for standing reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StandingReview: Send + Sync {
    /// Recompute GPA and status from completed grades and store them.
    async fn review_standing(&self, student_id: &StudentId) -> Result<StandingReport, Error>;
}

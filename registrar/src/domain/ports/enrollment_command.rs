//! Driving port for enrollment mutations and credit-limit checks.
//!
//! Inbound adapters call this port instead of the concrete service so they
//! never see the directories or the notifier.

use async_trait::async_trait;

use crate::domain::{CourseCode, Enrollment, Error, StudentId};

/// Driving port for enrollment decisions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentCommand: Send + Sync {
    /// Enroll a student in a course.
    ///
    /// Checks run in a fixed order and stop at the first failure:
    /// student exists, student is not suspended, course exists, course has
    /// a free seat, prerequisites are met. On success one seat is taken, the
    /// course is persisted and a confirmation is sent.
    async fn enroll_course(
        &self,
        student_id: &StudentId,
        course_code: &CourseCode,
    ) -> Result<Enrollment, Error>;

    /// Release a student's seat in a course and send a confirmation.
    ///
    /// The student is not checked for an existing enrollment; only the
    /// course seat count guards against releasing a seat nobody holds.
    async fn drop_course(&self, student_id: &StudentId, course_code: &CourseCode)
    -> Result<(), Error>;

    /// Whether `requested_credits` fits within the student's GPA-based load.
    async fn validate_credit_limit(
        &self,
        student_id: &StudentId,
        requested_credits: u32,
    ) -> Result<bool, Error>;
}

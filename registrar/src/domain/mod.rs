//! Domain primitives, services and ports.
//!
//! Purpose: hold the enrollment decision engine and the academic standing
//! calculator together with the validated types they operate on. Nothing in
//! this module performs I/O directly; collaborators sit behind the traits in
//! [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport agnostic failure payload.
//! - Student, Course, CourseGrade, Enrollment: validated records.
//! - EnrollmentService: implements [`ports::EnrollmentCommand`].
//! - StandingReviewService: implements [`ports::StandingReview`].
//! - academic_standing: pure GPA, status and credit-limit functions.

pub mod academic_standing;
pub mod course;
mod enrollment;
mod enrollment_service;
mod entity_locks;
pub mod error;
mod grade;
pub mod ports;
mod standing_review_service;
pub mod student;

pub use self::course::{Course, CourseCode, CourseDraft, CourseValidationError};
pub use self::enrollment::{Enrollment, EnrollmentId, EnrollmentStatus};
pub use self::enrollment_service::EnrollmentService;
pub use self::entity_locks::EntityLocks;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::grade::{CourseGrade, GRADE_POINT_MAX, GRADE_POINT_MIN};
pub use self::standing_review_service::StandingReviewService;
pub use self::student::{
    AcademicStatus, Student, StudentDraft, StudentId, StudentValidationError,
};

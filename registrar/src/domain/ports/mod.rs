//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod course_directory;
mod enrollment_command;
mod notifier;
mod standing_review;
mod student_directory;

#[cfg(test)]
pub use course_directory::MockCourseDirectory;
pub use course_directory::{CourseDirectory, CourseDirectoryError};
#[cfg(test)]
pub use enrollment_command::MockEnrollmentCommand;
pub use enrollment_command::EnrollmentCommand;
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{
    DROP_CONFIRMATION_SUBJECT, ENROLLMENT_CONFIRMATION_SUBJECT, Notifier, NotifierError,
};
#[cfg(test)]
pub use standing_review::MockStandingReview;
pub use standing_review::{StandingReport, StandingReview};
#[cfg(test)]
pub use student_directory::MockStudentDirectory;
pub use student_directory::{StudentDirectory, StudentDirectoryError};

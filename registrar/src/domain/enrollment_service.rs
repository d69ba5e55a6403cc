//! Enrollment decision engine.
//!
//! Implements the [`EnrollmentCommand`] driving port on top of the student
//! and course directories and the notifier. Enroll requests pass a fixed
//! sequence of eligibility checks; the first failing check decides the
//! error and later collaborators are never consulted.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::academic_standing::calculate_max_credits;
use crate::domain::ports::{
    CourseDirectory, CourseDirectoryError, DROP_CONFIRMATION_SUBJECT,
    ENROLLMENT_CONFIRMATION_SUBJECT, EnrollmentCommand, Notifier, StudentDirectory,
    StudentDirectoryError,
};
use crate::domain::{
    Course, CourseCode, CourseValidationError, Enrollment, EntityLocks, Error, Student, StudentId,
};

pub(crate) fn map_student_directory_error(error: StudentDirectoryError) -> Error {
    match error {
        StudentDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("student directory unavailable: {message}"))
        }
        StudentDirectoryError::Query { message } => {
            Error::internal(format!("student directory error: {message}"))
        }
    }
}

fn map_course_directory_error(error: CourseDirectoryError) -> Error {
    match error {
        CourseDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("course directory unavailable: {message}"))
        }
        CourseDirectoryError::Query { message } => {
            Error::internal(format!("course directory error: {message}"))
        }
    }
}

/// Enrollment service implementing the enrollment driving port.
#[derive(Clone)]
pub struct EnrollmentService<S, C, N> {
    students: Arc<S>,
    courses: Arc<C>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
    course_locks: Arc<EntityLocks>,
}

impl<S, C, N> EnrollmentService<S, C, N> {
    /// Create a service over the given collaborators.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use registrar::domain::EnrollmentService;
    /// # use registrar::outbound::{InMemoryCourseDirectory, InMemoryStudentDirectory, TracingNotifier};
    /// let students = Arc::new(InMemoryStudentDirectory::default());
    /// let courses = Arc::new(InMemoryCourseDirectory::new(Arc::clone(&students)));
    /// let service = EnrollmentService::new(
    ///     students,
    ///     courses,
    ///     Arc::new(TracingNotifier),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(
        students: Arc<S>,
        courses: Arc<C>,
        notifier: Arc<N>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            students,
            courses,
            notifier,
            clock,
            course_locks: Arc::new(EntityLocks::new()),
        }
    }
}

impl<S, C, N> EnrollmentService<S, C, N>
where
    S: StudentDirectory,
    C: CourseDirectory,
    N: Notifier,
{
    async fn require_student(&self, student_id: &StudentId) -> Result<Student, Error> {
        self.students
            .find_by_id(student_id)
            .await
            .map_err(map_student_directory_error)?
            .ok_or_else(|| {
                Error::student_not_found(format!("student {student_id} not found"))
                    .with_details(json!({ "studentId": student_id.as_ref() }))
            })
    }

    async fn require_course(&self, course_code: &CourseCode) -> Result<Course, Error> {
        self.courses
            .find_by_code(course_code)
            .await
            .map_err(map_course_directory_error)?
            .ok_or_else(|| {
                Error::course_not_found(format!("course {course_code} not found"))
                    .with_details(json!({ "courseCode": course_code.as_ref() }))
            })
    }

    async fn notify(&self, student: &Student, subject: &str, body: &str) {
        if let Err(err) = self
            .notifier
            .send_email(student.email(), subject, body)
            .await
        {
            warn!(
                student_id = %student.id(),
                subject,
                error = %err,
                "notification could not be delivered"
            );
        }
    }
}

#[async_trait]
impl<S, C, N> EnrollmentCommand for EnrollmentService<S, C, N>
where
    S: StudentDirectory,
    C: CourseDirectory,
    N: Notifier,
{
    async fn enroll_course(
        &self,
        student_id: &StudentId,
        course_code: &CourseCode,
    ) -> Result<Enrollment, Error> {
        let student = self.require_student(student_id).await?;
        if student.is_suspended() {
            return Err(Error::enrollment_rejected(format!(
                "student {student_id} is suspended and cannot enroll"
            ))
            .with_details(json!({
                "studentId": student_id.as_ref(),
                "academicStatus": student.academic_status().as_str(),
            })));
        }

        let guard = self.course_locks.acquire(course_code.as_ref()).await;
        let mut course = self.require_course(course_code).await?;
        if course.is_full() {
            return Err(Error::course_full(format!("course {course_code} is full"))
                .with_details(json!({
                    "courseCode": course_code.as_ref(),
                    "capacity": course.capacity(),
                    "enrolledCount": course.enrolled_count(),
                })));
        }

        let prerequisites_met = self
            .courses
            .is_prerequisite_met(student_id, course_code)
            .await
            .map_err(map_course_directory_error)?;
        if !prerequisites_met {
            let required: Vec<&str> = course.prerequisites().iter().map(AsRef::as_ref).collect();
            return Err(Error::prerequisite_not_met(format!(
                "student {student_id} has not completed the prerequisites for {course_code}"
            ))
            .with_details(json!({
                "courseCode": course_code.as_ref(),
                "prerequisites": required,
            })));
        }

        course
            .record_enrollment()
            .map_err(|err| Error::course_full(format!("course {course_code}: {err}")))?;
        self.courses
            .update(&course)
            .await
            .map_err(map_course_directory_error)?;
        drop(guard);

        let enrollment = Enrollment::approved(
            student_id.clone(),
            course_code.clone(),
            self.clock.utc(),
        );
        info!(
            student_id = %student_id,
            course_code = %course_code,
            enrollment_id = %enrollment.enrollment_id(),
            enrolled_count = course.enrolled_count(),
            "student enrolled"
        );

        let body = format!("You have been enrolled in: {}", course.name());
        self.notify(&student, ENROLLMENT_CONFIRMATION_SUBJECT, &body)
            .await;
        Ok(enrollment)
    }

    async fn drop_course(
        &self,
        student_id: &StudentId,
        course_code: &CourseCode,
    ) -> Result<(), Error> {
        let student = self.require_student(student_id).await?;

        let guard = self.course_locks.acquire(course_code.as_ref()).await;
        let mut course = self.require_course(course_code).await?;
        course.record_drop().map_err(|err| match err {
            CourseValidationError::NoEnrollments => Error::enrollment_rejected(format!(
                "course {course_code} has no enrolled students to drop"
            ))
            .with_details(json!({ "courseCode": course_code.as_ref() })),
            other => Error::internal(format!("course {course_code}: {other}")),
        })?;
        self.courses
            .update(&course)
            .await
            .map_err(map_course_directory_error)?;
        drop(guard);

        info!(
            student_id = %student_id,
            course_code = %course_code,
            enrolled_count = course.enrolled_count(),
            "student dropped course"
        );

        let body = format!("You have dropped: {}", course.name());
        self.notify(&student, DROP_CONFIRMATION_SUBJECT, &body).await;
        Ok(())
    }

    async fn validate_credit_limit(
        &self,
        student_id: &StudentId,
        requested_credits: u32,
    ) -> Result<bool, Error> {
        let student = self.require_student(student_id).await?;
        let max_credits = calculate_max_credits(student.gpa())?;
        Ok(requested_credits <= max_credits)
    }
}

#[cfg(test)]
#[path = "enrollment_service_tests.rs"]
mod tests;

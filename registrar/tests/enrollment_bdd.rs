//! Behaviour-driven development (BDD) tests for enrollment decisions.
//!
//! Scenarios drive the enrollment service against the in-memory directories
//! and a recording notifier, then inspect seat counts and sent mail.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::executor::block_on;
use mockable::DefaultClock;
use registrar::domain::ports::{
    DROP_CONFIRMATION_SUBJECT, ENROLLMENT_CONFIRMATION_SUBJECT, EnrollmentCommand,
};
use registrar::domain::{
    AcademicStatus, Course, CourseCode, CourseDraft, CourseGrade, Enrollment, EnrollmentService,
    EnrollmentStatus, Error, Student, StudentDraft, StudentId,
};
use registrar::outbound::{InMemoryCourseDirectory, InMemoryStudentDirectory, RecordingNotifier};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

// -----------------------------------------------------------------------------
// Test World
// -----------------------------------------------------------------------------

/// Test world holding the directories, notifier and last outcomes.
#[derive(Default, ScenarioState)]
struct EnrollmentWorld {
    students: Slot<Arc<InMemoryStudentDirectory>>,
    courses: Slot<Arc<InMemoryCourseDirectory>>,
    notifier: Slot<Arc<RecordingNotifier>>,
    last_enrollment: Slot<Result<Enrollment, Error>>,
    last_drop: Slot<Result<(), Error>>,
}

impl EnrollmentWorld {
    fn students(&self) -> Arc<InMemoryStudentDirectory> {
        self.students.get().expect("student directory")
    }

    fn courses(&self) -> Arc<InMemoryCourseDirectory> {
        self.courses.get().expect("course directory")
    }

    fn notifier(&self) -> Arc<RecordingNotifier> {
        self.notifier.get().expect("notifier")
    }

    fn service(
        &self,
    ) -> EnrollmentService<InMemoryStudentDirectory, InMemoryCourseDirectory, RecordingNotifier>
    {
        EnrollmentService::new(
            self.students(),
            self.courses(),
            self.notifier(),
            Arc::new(DefaultClock),
        )
    }

    fn add_student(&self, raw_id: &str, gpa: f64, status: AcademicStatus) {
        let student = Student::new(StudentDraft {
            id: student_id(raw_id),
            name: format!("Student {raw_id}"),
            email: format!("{}@pnc.ac.id", raw_id.to_lowercase()),
            major: "Rekayasa Keamanan Siber".to_owned(),
            semester: 5,
            gpa,
            academic_status: status,
        })
        .expect("valid student");
        self.students().insert(student);
    }

    fn add_course(
        &self,
        raw_code: &str,
        capacity: u32,
        enrolled_count: u32,
        prerequisites: BTreeSet<CourseCode>,
    ) {
        let course = Course::new(CourseDraft {
            code: course_code(raw_code),
            name: format!("Course {raw_code}"),
            credits: 3,
            capacity,
            enrolled_count,
            lecturer: "Dr. Smith".to_owned(),
            prerequisites,
        })
        .expect("valid course");
        self.courses().insert(course);
    }

    fn subjects_sent(&self) -> Vec<String> {
        self.notifier()
            .sent()
            .into_iter()
            .map(|email| email.subject)
            .collect()
    }
}

fn student_id(raw: &str) -> StudentId {
    StudentId::new(raw).expect("valid student id")
}

fn course_code(raw: &str) -> CourseCode {
    CourseCode::new(raw).expect("valid course code")
}

#[fixture]
fn world() -> EnrollmentWorld {
    let world = EnrollmentWorld::default();
    let students = Arc::new(InMemoryStudentDirectory::default());
    world
        .courses
        .set(Arc::new(InMemoryCourseDirectory::new(Arc::clone(&students))));
    world.students.set(students);
    world.notifier.set(Arc::new(RecordingNotifier::new()));
    world
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("an active student {student} with GPA {gpa}")]
fn an_active_student(world: &EnrollmentWorld, student: String, gpa: f64) {
    world.add_student(&student, gpa, AcademicStatus::Active);
}

#[given("a suspended student {student} with GPA {gpa}")]
fn a_suspended_student(world: &EnrollmentWorld, student: String, gpa: f64) {
    world.add_student(&student, gpa, AcademicStatus::Suspended);
}

#[given("course {course} with capacity {capacity} and {enrolled} enrolled")]
fn a_course_with_seats(world: &EnrollmentWorld, course: String, capacity: u32, enrolled: u32) {
    world.add_course(&course, capacity, enrolled, BTreeSet::new());
}

#[given("course {course} requiring {prerequisite} with capacity {capacity}")]
fn a_course_with_prerequisite(
    world: &EnrollmentWorld,
    course: String,
    prerequisite: String,
    capacity: u32,
) {
    world.add_course(
        &course,
        capacity,
        0,
        BTreeSet::from([course_code(&prerequisite)]),
    );
}

#[given("{student} passed {course} with grade point {point}")]
fn a_completed_course(world: &EnrollmentWorld, student: String, course: String, point: f64) {
    world
        .students()
        .record_grade(student_id(&student), CourseGrade::new(course_code(&course), 3, point));
}

#[given("the mail relay is down")]
fn the_mail_relay_is_down(world: &EnrollmentWorld) {
    world
        .notifier
        .set(Arc::new(RecordingNotifier::failing("relay refused connection")));
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("{student} enrolls in {course}")]
fn the_student_enrolls(world: &EnrollmentWorld, student: String, course: String) {
    let service = world.service();
    let result = block_on(service.enroll_course(&student_id(&student), &course_code(&course)));
    world.last_enrollment.set(result);
}

#[when("{student} drops {course}")]
fn the_student_drops(world: &EnrollmentWorld, student: String, course: String) {
    let service = world.service();
    let result = block_on(service.drop_course(&student_id(&student), &course_code(&course)));
    world.last_drop.set(result);
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the enrollment is approved")]
fn the_enrollment_is_approved(world: &EnrollmentWorld) {
    let enrollment = world
        .last_enrollment
        .get()
        .expect("enrollment attempted")
        .expect("enrollment succeeded");
    assert_eq!(enrollment.status(), EnrollmentStatus::Approved);
}

#[then("the enrollment fails with {code}")]
fn the_enrollment_fails_with(world: &EnrollmentWorld, code: String) {
    let err = world
        .last_enrollment
        .get()
        .expect("enrollment attempted")
        .expect_err("enrollment failed");
    assert_eq!(err.code().as_str(), code);
}

#[then("the drop succeeds")]
fn the_drop_succeeds(world: &EnrollmentWorld) {
    world
        .last_drop
        .get()
        .expect("drop attempted")
        .expect("drop succeeded");
}

#[then("the drop fails with {code}")]
fn the_drop_fails_with(world: &EnrollmentWorld, code: String) {
    let err = world
        .last_drop
        .get()
        .expect("drop attempted")
        .expect_err("drop failed");
    assert_eq!(err.code().as_str(), code);
}

#[then("course {course} has {count} enrolled")]
fn the_course_has_enrolled(world: &EnrollmentWorld, course: String, count: u32) {
    let stored = world
        .courses()
        .get(&course_code(&course))
        .expect("course exists");
    assert_eq!(stored.enrolled_count(), count);
}

#[then("{student} received an enrollment confirmation")]
fn an_enrollment_confirmation_was_sent(world: &EnrollmentWorld, student: String) {
    let sent = world.notifier().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].address, format!("{}@pnc.ac.id", student.to_lowercase()));
    assert_eq!(sent[0].subject, ENROLLMENT_CONFIRMATION_SUBJECT);
    assert!(sent[0].body.starts_with("You have been enrolled in: "));
}

#[then("{student} received a drop confirmation")]
fn a_drop_confirmation_was_sent(world: &EnrollmentWorld, student: String) {
    let sent = world.notifier().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].address, format!("{}@pnc.ac.id", student.to_lowercase()));
    assert_eq!(sent[0].subject, DROP_CONFIRMATION_SUBJECT);
    assert!(sent[0].body.starts_with("You have dropped: "));
}

#[then("no email was sent")]
fn no_email_was_sent(world: &EnrollmentWorld) {
    assert!(world.subjects_sent().is_empty());
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/enrollment.feature",
    name = "Eligible student enrolls in a course with free seats"
)]
fn eligible_student_enrolls(world: EnrollmentWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/enrollment.feature",
    name = "Suspended student is turned away"
)]
fn suspended_student_is_turned_away(world: EnrollmentWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/enrollment.feature",
    name = "Full course rejects further enrollments"
)]
fn full_course_rejects_enrollments(world: EnrollmentWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/enrollment.feature",
    name = "Unknown course is reported"
)]
fn unknown_course_is_reported(world: EnrollmentWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/enrollment.feature",
    name = "Missing prerequisites block enrollment"
)]
fn missing_prerequisites_block_enrollment(world: EnrollmentWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/enrollment.feature",
    name = "Completed prerequisites open the course"
)]
fn completed_prerequisites_open_the_course(world: EnrollmentWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/enrollment.feature",
    name = "Mail outage does not undo an enrollment"
)]
fn mail_outage_does_not_undo_enrollment(world: EnrollmentWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/enrollment.feature",
    name = "Dropping a course frees a seat"
)]
fn dropping_a_course_frees_a_seat(world: EnrollmentWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/enrollment.feature",
    name = "Dropping from an empty course is refused"
)]
fn dropping_from_an_empty_course_is_refused(world: EnrollmentWorld) {
    let _ = world;
}

//! Tests for the standing review service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockStudentDirectory, StudentDirectoryError};
use crate::domain::{
    AcademicStatus, CourseCode, CourseGrade, ErrorCode, Student, StudentDraft,
};

fn student_id() -> StudentId {
    StudentId::new("230209003").expect("valid student id")
}

fn student(semester: u32, status: AcademicStatus) -> Student {
    Student::new(StudentDraft {
        id: student_id(),
        name: "Amanda Bunga Lestari".to_owned(),
        email: "amandabunga@pnc.ac.id".to_owned(),
        major: "Rekayasa Keamanan Siber".to_owned(),
        semester,
        gpa: 3.0,
        academic_status: status,
    })
    .expect("valid student")
}

fn grade(code: &str, credits: u32, grade_point: f64) -> CourseGrade {
    CourseGrade::new(
        CourseCode::new(code).expect("valid course code"),
        credits,
        grade_point,
    )
}

#[rstest]
#[tokio::test]
async fn review_standing_writes_back_gpa_and_status() {
    let mut students = MockStudentDirectory::new();
    students
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(student(3, AcademicStatus::Active))));
    students.expect_completed_grades().times(1).return_once(|_| {
        Ok(vec![
            grade("KRIP101", 3, 2.0),
            grade("KRIP102", 3, 2.0),
            grade("MATH101", 4, 2.5),
        ])
    });
    students
        .expect_update()
        .withf(|student| {
            student.academic_status() == AcademicStatus::Probation
                && (student.gpa() - 2.2).abs() < 0.01
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = StandingReviewService::new(Arc::new(students));
    let report = service
        .review_standing(&student_id())
        .await
        .expect("review succeeds");

    assert_eq!(report.status, AcademicStatus::Probation);
    assert_eq!(report.previous_status, AcademicStatus::Active);
    assert_eq!(report.max_credits, 18);
    assert!(report.status_changed());
}

#[rstest]
#[tokio::test]
async fn review_standing_without_grades_uses_zero_gpa() {
    let mut students = MockStudentDirectory::new();
    students
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(student(1, AcademicStatus::Active))));
    students
        .expect_completed_grades()
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    students.expect_update().times(1).return_once(|_| Ok(()));

    let service = StandingReviewService::new(Arc::new(students));
    let report = service
        .review_standing(&student_id())
        .await
        .expect("review succeeds");

    assert!(report.gpa.abs() < f64::EPSILON);
    assert_eq!(report.status, AcademicStatus::Probation);
    assert_eq!(report.max_credits, 15);
}

#[rstest]
#[tokio::test]
async fn review_standing_rejects_unknown_student() {
    let mut students = MockStudentDirectory::new();
    students
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(None));
    students.expect_completed_grades().never();
    students.expect_update().never();

    let service = StandingReviewService::new(Arc::new(students));
    let err = service
        .review_standing(&student_id())
        .await
        .expect_err("unknown student");

    assert_eq!(err.code(), ErrorCode::StudentNotFound);
}

#[rstest]
#[tokio::test]
async fn review_standing_refuses_corrupt_grades_without_writing() {
    let mut students = MockStudentDirectory::new();
    students
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(student(5, AcademicStatus::Active))));
    students
        .expect_completed_grades()
        .times(1)
        .return_once(|_| Ok(vec![grade("KRIP101", 3, 4.5)]));
    students.expect_update().never();

    let service = StandingReviewService::new(Arc::new(students));
    let err = service
        .review_standing(&student_id())
        .await
        .expect_err("corrupt grade");

    assert_eq!(err.code(), ErrorCode::InvalidArgument);
}

#[rstest]
#[tokio::test]
async fn review_standing_maps_update_outage() {
    let mut students = MockStudentDirectory::new();
    students
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(student(5, AcademicStatus::Active))));
    students
        .expect_completed_grades()
        .times(1)
        .return_once(|_| Ok(vec![grade("KRIP101", 3, 3.5)]));
    students
        .expect_update()
        .times(1)
        .return_once(|_| Err(StudentDirectoryError::connection("registry offline")));

    let service = StandingReviewService::new(Arc::new(students));
    let err = service
        .review_standing(&student_id())
        .await
        .expect_err("update unavailable");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

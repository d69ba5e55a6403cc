//! In-memory student and course directories.
//!
//! Both directories keep their records behind a mutex and are cheap to
//! clone out of. The course directory consults the student directory's
//! completed grades to decide prerequisite satisfaction.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    CourseDirectory, CourseDirectoryError, StudentDirectory, StudentDirectoryError,
};
use crate::domain::{Course, CourseCode, CourseGrade, Student, StudentId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct StudentRecords {
    students: BTreeMap<StudentId, Student>,
    grades: BTreeMap<StudentId, Vec<CourseGrade>>,
}

/// Student directory backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryStudentDirectory {
    records: Mutex<StudentRecords>,
}

impl InMemoryStudentDirectory {
    /// Insert or replace a student record.
    pub fn insert(&self, student: Student) {
        lock(&self.records)
            .students
            .insert(student.id().clone(), student);
    }

    /// Append a completed grade for a student.
    pub fn record_grade(&self, student_id: StudentId, grade: CourseGrade) {
        lock(&self.records)
            .grades
            .entry(student_id)
            .or_default()
            .push(grade);
    }

    /// Current copy of a student record.
    pub fn get(&self, student_id: &StudentId) -> Option<Student> {
        lock(&self.records).students.get(student_id).cloned()
    }

    /// All students ordered by identifier.
    pub fn students(&self) -> Vec<Student> {
        lock(&self.records).students.values().cloned().collect()
    }

    /// All completed grades keyed by student.
    pub fn grades(&self) -> BTreeMap<StudentId, Vec<CourseGrade>> {
        lock(&self.records).grades.clone()
    }

    /// Codes of courses the student has passed.
    pub fn passed_course_codes(&self, student_id: &StudentId) -> BTreeSet<CourseCode> {
        lock(&self.records)
            .grades
            .get(student_id)
            .map(|grades| {
                grades
                    .iter()
                    .filter(|grade| grade.is_passing())
                    .map(|grade| grade.course_code().clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl StudentDirectory for InMemoryStudentDirectory {
    async fn find_by_id(&self, id: &StudentId) -> Result<Option<Student>, StudentDirectoryError> {
        Ok(self.get(id))
    }

    async fn update(&self, student: &Student) -> Result<(), StudentDirectoryError> {
        let mut records = lock(&self.records);
        match records.students.get_mut(student.id()) {
            Some(stored) => {
                *stored = student.clone();
                Ok(())
            }
            None => Err(StudentDirectoryError::query(format!(
                "student {} does not exist",
                student.id()
            ))),
        }
    }

    async fn completed_grades(
        &self,
        id: &StudentId,
    ) -> Result<Vec<CourseGrade>, StudentDirectoryError> {
        Ok(lock(&self.records)
            .grades
            .get(id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Course directory backed by process memory.
#[derive(Debug)]
pub struct InMemoryCourseDirectory {
    courses: Mutex<BTreeMap<CourseCode, Course>>,
    students: Arc<InMemoryStudentDirectory>,
}

impl InMemoryCourseDirectory {
    /// Create an empty catalogue that reads grades from `students`.
    pub fn new(students: Arc<InMemoryStudentDirectory>) -> Self {
        Self {
            courses: Mutex::new(BTreeMap::new()),
            students,
        }
    }

    /// Insert or replace a course record.
    pub fn insert(&self, course: Course) {
        lock(&self.courses).insert(course.code().clone(), course);
    }

    /// Current copy of a course record.
    pub fn get(&self, code: &CourseCode) -> Option<Course> {
        lock(&self.courses).get(code).cloned()
    }

    /// All courses ordered by code.
    pub fn courses(&self) -> Vec<Course> {
        lock(&self.courses).values().cloned().collect()
    }
}

#[async_trait]
impl CourseDirectory for InMemoryCourseDirectory {
    async fn find_by_code(
        &self,
        code: &CourseCode,
    ) -> Result<Option<Course>, CourseDirectoryError> {
        Ok(self.get(code))
    }

    async fn update(&self, course: &Course) -> Result<(), CourseDirectoryError> {
        let mut courses = lock(&self.courses);
        match courses.get_mut(course.code()) {
            Some(stored) => {
                *stored = course.clone();
                Ok(())
            }
            None => Err(CourseDirectoryError::query(format!(
                "course {} does not exist",
                course.code()
            ))),
        }
    }

    async fn is_prerequisite_met(
        &self,
        student_id: &StudentId,
        course_code: &CourseCode,
    ) -> Result<bool, CourseDirectoryError> {
        let required = self
            .get(course_code)
            .ok_or_else(|| {
                CourseDirectoryError::query(format!("course {course_code} does not exist"))
            })?
            .prerequisites()
            .clone();
        if required.is_empty() {
            return Ok(true);
        }
        let passed = self.students.passed_course_codes(student_id);
        Ok(required.is_subset(&passed))
    }
}

//! Completed-course grade records.

use serde::{Deserialize, Serialize};

use super::CourseCode;

/// Lowest grade point on the four-point scale.
pub const GRADE_POINT_MIN: f64 = 0.0;
/// Highest grade point on the four-point scale.
pub const GRADE_POINT_MAX: f64 = 4.0;

/// Grade earned for one completed course.
///
/// The grade point is stored as recorded. Range checking belongs to the
/// standing calculator, which rejects out-of-scale values as a data
/// integrity error instead of clamping them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseGrade {
    course_code: CourseCode,
    credits: u32,
    grade_point: f64,
}

impl CourseGrade {
    /// Record a grade.
    ///
    /// # Examples
    /// ```
    /// use registrar::domain::{CourseCode, CourseGrade};
    ///
    /// let code = CourseCode::new("KRIP101").expect("valid code");
    /// let grade = CourseGrade::new(code, 3, 4.0);
    /// assert!(grade.is_passing());
    /// ```
    pub fn new(course_code: CourseCode, credits: u32, grade_point: f64) -> Self {
        Self {
            course_code,
            credits,
            grade_point,
        }
    }

    /// Code of the completed course.
    pub fn course_code(&self) -> &CourseCode {
        &self.course_code
    }

    /// Credit weight of the course.
    pub fn credits(&self) -> u32 {
        self.credits
    }

    /// Grade point earned.
    pub fn grade_point(&self) -> f64 {
        self.grade_point
    }

    /// Whether the grade point lies on the four-point scale.
    pub fn has_valid_grade_point(&self) -> bool {
        (GRADE_POINT_MIN..=GRADE_POINT_MAX).contains(&self.grade_point)
    }

    /// Whether the course counts as completed for prerequisite purposes.
    pub fn is_passing(&self) -> bool {
        self.has_valid_grade_point() && self.grade_point > GRADE_POINT_MIN
    }
}

//! Academic standing calculator.
//!
//! Pure functions turning completed grades into a GPA, a GPA and semester
//! into an [`AcademicStatus`], and a GPA into the maximum credit load for a
//! term. Nothing here performs I/O; callers persist the results.

use serde_json::json;

use super::{AcademicStatus, CourseGrade, Error, GRADE_POINT_MAX, GRADE_POINT_MIN};

/// Lowest representable GPA.
pub const GPA_MIN: f64 = GRADE_POINT_MIN;
/// Highest representable GPA.
pub const GPA_MAX: f64 = GRADE_POINT_MAX;

/// Credit ceilings keyed by the lowest GPA that earns them, highest first.
const CREDIT_BANDS: [(f64, u32); 3] = [(3.0, 24), (2.5, 21), (2.0, 18)];
/// Credit ceiling for GPAs below every band.
const BASE_CREDIT_LIMIT: u32 = 15;

/// GPA below which a student is suspended, from the third semester on.
const SUSPENSION_THRESHOLD: f64 = 2.0;

struct StatusThresholds {
    active_from: f64,
    suspended_below: Option<f64>,
}

const fn thresholds_for(semester: u32) -> StatusThresholds {
    match semester {
        0..=2 => StatusThresholds {
            active_from: 2.0,
            suspended_below: None,
        },
        3..=4 => StatusThresholds {
            active_from: 2.25,
            suspended_below: Some(SUSPENSION_THRESHOLD),
        },
        _ => StatusThresholds {
            active_from: 2.5,
            suspended_below: Some(SUSPENSION_THRESHOLD),
        },
    }
}

fn ensure_gpa_in_range(gpa: f64) -> Result<(), Error> {
    if (GPA_MIN..=GPA_MAX).contains(&gpa) {
        Ok(())
    } else {
        Err(
            Error::invalid_argument(format!("gpa must lie between 0.0 and 4.0, got {gpa}"))
                .with_details(json!({ "field": "gpa" })),
        )
    }
}

/// Credit-weighted grade point average.
///
/// An absent or empty grade list yields `0.0`, as does a list whose entries
/// carry no credits. Every grade point is checked before anything is summed,
/// so a single out-of-scale entry fails the whole computation.
///
/// # Errors
/// Returns [`ErrorCode::InvalidArgument`](super::ErrorCode::InvalidArgument)
/// when any grade point lies outside `[0.0, 4.0]`.
///
/// # Examples
/// ```
/// use registrar::domain::academic_standing::calculate_gpa;
/// use registrar::domain::{CourseCode, CourseGrade};
///
/// let grade = |code: &str, credits, point| {
///     CourseGrade::new(CourseCode::new(code).expect("code"), credits, point)
/// };
/// let grades = [
///     grade("KRIP101", 3, 4.0),
///     grade("KRIP102", 3, 3.0),
///     grade("KRIP103", 4, 4.0),
/// ];
/// let gpa = calculate_gpa(Some(grades.as_slice())).expect("valid grades");
/// assert!((gpa - 3.7).abs() < 0.01);
/// assert_eq!(calculate_gpa(None).expect("absent grades"), 0.0);
/// ```
pub fn calculate_gpa(grades: Option<&[CourseGrade]>) -> Result<f64, Error> {
    let Some(grades) = grades else {
        return Ok(0.0);
    };

    if let Some(invalid) = grades.iter().find(|grade| !grade.has_valid_grade_point()) {
        return Err(Error::invalid_argument(format!(
            "grade point for {} must lie between 0.0 and 4.0, got {}",
            invalid.course_code(),
            invalid.grade_point()
        ))
        .with_details(json!({
            "field": "gradePoint",
            "courseCode": invalid.course_code().as_ref(),
        })));
    }

    if grades.iter().all(|grade| grade.credits() == 0) {
        return Ok(0.0);
    }

    let (weighted_points, total_credits) =
        grades
            .iter()
            .fold((0.0_f64, 0.0_f64), |(points, credits), grade| {
                let weight = f64::from(grade.credits());
                (points + weight * grade.grade_point(), credits + weight)
            });

    Ok(weighted_points / total_credits)
}

/// Standing for a GPA in a given semester.
///
/// | semester | active    | probation        | suspended |
/// |----------|-----------|------------------|-----------|
/// | 1–2      | ≥ 2.0     | < 2.0            | never     |
/// | 3–4      | ≥ 2.25    | 2.0 ≤ gpa < 2.25 | < 2.0     |
/// | ≥ 5      | ≥ 2.5     | 2.0 ≤ gpa < 2.5  | < 2.0     |
///
/// # Errors
/// Returns [`ErrorCode::InvalidArgument`](super::ErrorCode::InvalidArgument)
/// when `gpa` lies outside `[0.0, 4.0]` or `semester` is zero.
pub fn determine_academic_status(gpa: f64, semester: u32) -> Result<AcademicStatus, Error> {
    ensure_gpa_in_range(gpa)?;
    if semester == 0 {
        return Err(Error::invalid_argument("semester must be at least 1")
            .with_details(json!({ "field": "semester" })));
    }

    let thresholds = thresholds_for(semester);
    if gpa >= thresholds.active_from {
        return Ok(AcademicStatus::Active);
    }
    match thresholds.suspended_below {
        Some(floor) if gpa < floor => Ok(AcademicStatus::Suspended),
        _ => Ok(AcademicStatus::Probation),
    }
}

/// Maximum credits a student with this GPA may take in one term.
///
/// # Errors
/// Returns [`ErrorCode::InvalidArgument`](super::ErrorCode::InvalidArgument)
/// when `gpa` lies outside `[0.0, 4.0]`.
pub fn calculate_max_credits(gpa: f64) -> Result<u32, Error> {
    ensure_gpa_in_range(gpa)?;
    Ok(CREDIT_BANDS
        .iter()
        .find(|(floor, _)| gpa >= *floor)
        .map_or(BASE_CREDIT_LIMIT, |(_, credits)| *credits))
}

#[cfg(test)]
#[path = "academic_standing_tests.rs"]
mod tests;

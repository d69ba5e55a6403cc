//! Course catalogue model and seat accounting.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors returned when constructing courses or adjusting seats.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CourseValidationError {
    /// Course code is empty.
    #[error("course code must not be empty")]
    EmptyCode,
    /// Course code has leading or trailing whitespace.
    #[error("course code must not contain surrounding whitespace")]
    CodeContainsWhitespace,
    /// Course name is empty once trimmed.
    #[error("course name must not be empty")]
    EmptyName,
    /// Courses must carry at least one credit.
    #[error("course credits must be positive")]
    ZeroCredits,
    /// Enrolled count would exceed capacity.
    #[error("enrolled count {enrolled_count} exceeds capacity {capacity}")]
    CapacityExceeded {
        /// Seats available.
        capacity: u32,
        /// Seats that would be taken.
        enrolled_count: u32,
    },
    /// A drop was requested while no seats are taken.
    #[error("course has no enrolled students to drop")]
    NoEnrollments,
}

/// Stable course code, for example `KRIP101`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseCode(String);

impl CourseCode {
    /// Validate and construct a [`CourseCode`].
    pub fn new(code: impl Into<String>) -> Result<Self, CourseValidationError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(CourseValidationError::EmptyCode);
        }
        if code.trim() != code {
            return Err(CourseValidationError::CodeContainsWhitespace);
        }
        Ok(Self(code))
    }
}

impl AsRef<str> for CourseCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<CourseCode> for String {
    fn from(value: CourseCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for CourseCode {
    type Error = CourseValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Input for [`Course::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    /// Catalogue code.
    pub code: CourseCode,
    /// Display name used in notifications.
    pub name: String,
    /// Credit weight.
    pub credits: u32,
    /// Seats available.
    pub capacity: u32,
    /// Seats taken.
    pub enrolled_count: u32,
    /// Responsible lecturer.
    pub lecturer: String,
    /// Codes that must be completed first.
    pub prerequisites: BTreeSet<CourseCode>,
}

/// A course offering with seat accounting.
///
/// ## Invariants
/// - `credits > 0`.
/// - `enrolled_count <= capacity`, maintained by [`Course::record_enrollment`]
///   and [`Course::record_drop`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CourseDto", into = "CourseDto")]
pub struct Course {
    code: CourseCode,
    name: String,
    credits: u32,
    capacity: u32,
    enrolled_count: u32,
    lecturer: String,
    prerequisites: BTreeSet<CourseCode>,
}

impl Course {
    /// Build a course from a draft, enforcing the type invariants.
    pub fn new(draft: CourseDraft) -> Result<Self, CourseValidationError> {
        let CourseDraft {
            code,
            name,
            credits,
            capacity,
            enrolled_count,
            lecturer,
            prerequisites,
        } = draft;

        if name.trim().is_empty() {
            return Err(CourseValidationError::EmptyName);
        }
        if credits == 0 {
            return Err(CourseValidationError::ZeroCredits);
        }
        if enrolled_count > capacity {
            return Err(CourseValidationError::CapacityExceeded {
                capacity,
                enrolled_count,
            });
        }

        Ok(Self {
            code,
            name,
            credits,
            capacity,
            enrolled_count,
            lecturer,
            prerequisites,
        })
    }

    /// Catalogue code.
    pub fn code(&self) -> &CourseCode {
        &self.code
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Credit weight.
    pub fn credits(&self) -> u32 {
        self.credits
    }

    /// Seats available.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Seats taken.
    pub fn enrolled_count(&self) -> u32 {
        self.enrolled_count
    }

    /// Responsible lecturer.
    pub fn lecturer(&self) -> &str {
        self.lecturer.as_str()
    }

    /// Prerequisite codes in sorted order.
    pub fn prerequisites(&self) -> &BTreeSet<CourseCode> {
        &self.prerequisites
    }

    /// Add a prerequisite; adding an existing code is a no-op.
    pub fn add_prerequisite(&mut self, code: CourseCode) {
        self.prerequisites.insert(code);
    }

    /// Whether every seat is taken.
    pub fn is_full(&self) -> bool {
        self.enrolled_count >= self.capacity
    }

    /// Take one seat.
    pub fn record_enrollment(&mut self) -> Result<(), CourseValidationError> {
        if self.is_full() {
            return Err(CourseValidationError::CapacityExceeded {
                capacity: self.capacity,
                enrolled_count: self.enrolled_count.saturating_add(1),
            });
        }
        self.enrolled_count += 1;
        Ok(())
    }

    /// Release one seat. Fails instead of wrapping below zero.
    pub fn record_drop(&mut self) -> Result<(), CourseValidationError> {
        self.enrolled_count = self
            .enrolled_count
            .checked_sub(1)
            .ok_or(CourseValidationError::NoEnrollments)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
struct CourseDto {
    code: CourseCode,
    name: String,
    credits: u32,
    capacity: u32,
    #[serde(default)]
    enrolled_count: u32,
    #[serde(default)]
    lecturer: String,
    #[serde(default)]
    prerequisites: BTreeSet<CourseCode>,
}

impl From<Course> for CourseDto {
    fn from(value: Course) -> Self {
        let Course {
            code,
            name,
            credits,
            capacity,
            enrolled_count,
            lecturer,
            prerequisites,
        } = value;
        Self {
            code,
            name,
            credits,
            capacity,
            enrolled_count,
            lecturer,
            prerequisites,
        }
    }
}

impl TryFrom<CourseDto> for Course {
    type Error = CourseValidationError;

    fn try_from(value: CourseDto) -> Result<Self, Self::Error> {
        Course::new(CourseDraft {
            code: value.code,
            name: value.name,
            credits: value.credits,
            capacity: value.capacity,
            enrolled_count: value.enrolled_count,
            lecturer: value.lecturer,
            prerequisites: value.prerequisites,
        })
    }
}

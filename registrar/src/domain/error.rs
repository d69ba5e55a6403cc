//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to exit
//! codes, log lines, or any other surface-specific envelope.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// No student exists with the requested identifier.
    StudentNotFound,
    /// No course exists with the requested code.
    CourseNotFound,
    /// The course has no free seats left.
    CourseFull,
    /// The student has not completed the course prerequisites.
    PrerequisiteNotMet,
    /// A general enrollment precondition failed (for example a suspended
    /// student, or dropping from an empty course).
    EnrollmentRejected,
    /// A numeric input to the standing calculator is out of range.
    InvalidArgument,
    /// A collaborator is unreachable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain or a collaborator.
    InternalError,
}

impl ErrorCode {
    /// Stable `snake_case` label matching the serialised form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StudentNotFound => "student_not_found",
            Self::CourseNotFound => "course_not_found",
            Self::CourseFull => "course_full",
            Self::PrerequisiteNotMet => "prerequisite_not_met",
            Self::EnrollmentRejected => "enrollment_rejected",
            Self::InvalidArgument => "invalid_argument",
            Self::ServiceUnavailable => "service_unavailable",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use registrar::domain::{Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::CourseFull, "KRIP101 is full");
/// assert_eq!(err.code(), ErrorCode::CourseFull);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValidationError {
    /// The message was empty or whitespace only.
    EmptyMessage,
}

impl fmt::Display for ErrorValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
        }
    }
}

impl std::error::Error for ErrorValidationError {}

impl Error {
    /// Create a new error, panicking if validation fails.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use registrar::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::course_full("no seats").with_details(json!({ "capacity": 30 }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::StudentNotFound`].
    pub fn student_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StudentNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::CourseNotFound`].
    pub fn course_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CourseNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::CourseFull`].
    pub fn course_full(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CourseFull, message)
    }

    /// Convenience constructor for [`ErrorCode::PrerequisiteNotMet`].
    pub fn prerequisite_not_met(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PrerequisiteNotMet, message)
    }

    /// Convenience constructor for [`ErrorCode::EnrollmentRejected`].
    pub fn enrollment_rejected(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EnrollmentRejected, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            details,
        } = value;

        let mut error = Error::try_new(code, message)?;
        error.details = details;
        Ok(error)
    }
}

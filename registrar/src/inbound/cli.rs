//! Command-line adapter.
//!
//! Parses `registrar` invocations with clap and routes them to the driving
//! ports. Results are rendered as one `key=value` pair per line.

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::academic_standing::{
    calculate_gpa, calculate_max_credits, determine_academic_status,
};
use crate::domain::ports::{EnrollmentCommand, StandingReview};
use crate::domain::{CourseCode, CourseGrade, Error, StudentId};

/// `registrar` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "registrar",
    about = "Enroll students, drop courses and review academic standing",
    version
)]
pub struct Cli {
    /// Snapshot file to operate on. Overrides `REGISTRAR_SNAPSHOT_PATH`.
    #[arg(long, value_name = "path", global = true)]
    pub snapshot: Option<PathBuf>,
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported operations.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Enroll a student in a course.
    Enroll {
        /// Student identifier.
        #[arg(long, value_name = "id", value_parser = parse_student_id)]
        student: StudentId,
        /// Course code.
        #[arg(long, value_name = "code", value_parser = parse_course_code)]
        course: CourseCode,
    },
    /// Drop a student from a course.
    Drop {
        /// Student identifier.
        #[arg(long, value_name = "id", value_parser = parse_student_id)]
        student: StudentId,
        /// Course code.
        #[arg(long, value_name = "code", value_parser = parse_course_code)]
        course: CourseCode,
    },
    /// Check a requested credit load against the student's limit.
    CheckCredits {
        /// Student identifier.
        #[arg(long, value_name = "id", value_parser = parse_student_id)]
        student: StudentId,
        /// Credits the student wants to take.
        #[arg(long, value_name = "n")]
        credits: u32,
    },
    /// Recompute and store a student's GPA and status.
    ReviewStanding {
        /// Student identifier.
        #[arg(long, value_name = "id", value_parser = parse_student_id)]
        student: StudentId,
    },
    /// Compute GPA and credit limit from ad hoc grades.
    Gpa {
        /// Grade as `CODE:CREDITS:POINT`; repeat for each course.
        #[arg(
            long = "grade",
            value_name = "CODE:CREDITS:POINT",
            value_parser = parse_grade,
            required = true
        )]
        grades: Vec<CourseGrade>,
        /// Semester used to derive an academic status.
        #[arg(long, value_name = "n")]
        semester: Option<u32>,
    },
}

impl Command {
    /// Whether the command changes registry state.
    pub fn mutates_registry(&self) -> bool {
        matches!(
            self,
            Self::Enroll { .. } | Self::Drop { .. } | Self::ReviewStanding { .. }
        )
    }
}

/// Ordered `key=value` output of a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    fields: Vec<(&'static str, String)>,
}

impl Report {
    fn with(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    /// Value recorded under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.fields {
            writeln!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Run `command` against the driving ports.
pub async fn execute(
    command: &Command,
    enrollment: &dyn EnrollmentCommand,
    standing: &dyn StandingReview,
) -> Result<Report, Error> {
    match command {
        Command::Enroll { student, course } => {
            let enrollment = enrollment.enroll_course(student, course).await?;
            Ok(Report::default()
                .with("enrollment_id", enrollment.enrollment_id())
                .with("student_id", enrollment.student_id())
                .with("course_code", enrollment.course_code())
                .with("status", enrollment.status())
                .with("enrollment_date", enrollment.enrollment_date().to_rfc3339()))
        }
        Command::Drop { student, course } => {
            enrollment.drop_course(student, course).await?;
            Ok(Report::default()
                .with("student_id", student)
                .with("course_code", course)
                .with("status", "DROPPED"))
        }
        Command::CheckCredits { student, credits } => {
            let within_limit = enrollment.validate_credit_limit(student, *credits).await?;
            Ok(Report::default()
                .with("student_id", student)
                .with("requested_credits", credits)
                .with("within_limit", within_limit))
        }
        Command::ReviewStanding { student } => {
            let report = standing.review_standing(student).await?;
            Ok(Report::default()
                .with("student_id", &report.student_id)
                .with("gpa", format!("{:.2}", report.gpa))
                .with("status", report.status)
                .with("previous_status", report.previous_status)
                .with("max_credits", report.max_credits))
        }
        Command::Gpa { grades, semester } => evaluate_grades(grades, *semester),
    }
}

/// Compute GPA, credit limit and optionally status without touching the
/// registry.
pub fn evaluate_grades(grades: &[CourseGrade], semester: Option<u32>) -> Result<Report, Error> {
    let gpa = calculate_gpa(Some(grades))?;
    let mut report = Report::default()
        .with("gpa", format!("{gpa:.2}"))
        .with("max_credits", calculate_max_credits(gpa)?);
    if let Some(semester) = semester {
        report = report.with("status", determine_academic_status(gpa, semester)?);
    }
    Ok(report)
}

fn parse_student_id(raw: &str) -> Result<StudentId, String> {
    StudentId::new(raw).map_err(|err| err.to_string())
}

fn parse_course_code(raw: &str) -> Result<CourseCode, String> {
    CourseCode::new(raw).map_err(|err| err.to_string())
}

fn parse_grade(raw: &str) -> Result<CourseGrade, String> {
    let mut parts = raw.splitn(3, ':');
    let (Some(code), Some(credits), Some(point)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected CODE:CREDITS:POINT, got `{raw}`"));
    };
    let code = CourseCode::new(code).map_err(|err| err.to_string())?;
    let credits = credits
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("invalid credits `{credits}`: {err}"))?;
    let point = point
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid grade point `{point}`: {err}"))?;
    Ok(CourseGrade::new(code, credits, point))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{MockEnrollmentCommand, MockStandingReview, StandingReport};
    use crate::domain::{AcademicStatus, Enrollment, EnrollmentId, EnrollmentStatus, ErrorCode};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("registrar").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[rstest]
    #[case(&["enroll", "--student", "S1", "--course", "C1"], true)]
    #[case(&["drop", "--student", "S1", "--course", "C1"], true)]
    #[case(&["review-standing", "--student", "S1"], true)]
    #[case(&["check-credits", "--student", "S1", "--credits", "18"], false)]
    #[case(&["gpa", "--grade", "CS101:3:4.0"], false)]
    fn commands_declare_whether_they_mutate(#[case] args: &[&str], #[case] mutates: bool) {
        assert_eq!(parse(args).command.mutates_registry(), mutates);
    }

    #[rstest]
    fn snapshot_flag_is_global() {
        let cli = parse(&["review-standing", "--student", "S1", "--snapshot", "data.json"]);
        assert_eq!(cli.snapshot, Some(PathBuf::from("data.json")));
    }

    #[rstest]
    #[case::missing_point("CS101:3")]
    #[case::bad_credits("CS101:three:4.0")]
    #[case::bad_point("CS101:3:A")]
    #[case::blank_code(":3:4.0")]
    fn malformed_grades_are_rejected(#[case] raw: &str) {
        assert!(parse_grade(raw).is_err());
    }

    #[rstest]
    fn gpa_requires_at_least_one_grade() {
        assert!(Cli::try_parse_from(["registrar", "gpa"]).is_err());
    }

    #[rstest]
    fn evaluate_grades_renders_gpa_limit_and_status() {
        let cli = parse(&[
            "gpa",
            "--grade",
            "KRIP101:3:4.0",
            "--grade",
            "KRIP102:3:3.0",
            "--grade",
            "KRIP103:4:4.0",
            "--semester",
            "5",
        ]);
        let Command::Gpa { grades, semester } = cli.command else {
            panic!("expected gpa command");
        };

        let report = evaluate_grades(&grades, semester).expect("valid grades");

        assert_eq!(report.to_string(), "gpa=3.70\nmax_credits=24\nstatus=ACTIVE\n");
    }

    #[rstest]
    fn evaluate_grades_rejects_out_of_scale_points() {
        let grades = [parse_grade("CS101:3:4.5").expect("parsable grade")];
        let err = evaluate_grades(&grades, None).expect_err("out of scale");
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[rstest]
    #[tokio::test]
    async fn enroll_renders_the_approved_enrollment() {
        let mut enrollment = MockEnrollmentCommand::new();
        enrollment
            .expect_enroll_course()
            .withf(|student, course| student.as_ref() == "S1" && course.as_ref() == "C1")
            .times(1)
            .return_once(|student, course| {
                let date = Utc
                    .with_ymd_and_hms(2026, 8, 31, 8, 0, 0)
                    .single()
                    .expect("valid timestamp");
                Ok(Enrollment::new(
                    EnrollmentId::from_uuid(uuid::Uuid::nil()),
                    student.clone(),
                    course.clone(),
                    date,
                    EnrollmentStatus::Approved,
                ))
            });
        let standing = MockStandingReview::new();

        let cli = parse(&["enroll", "--student", "S1", "--course", "C1"]);
        let report = execute(&cli.command, &enrollment, &standing)
            .await
            .expect("enroll succeeds");

        assert_eq!(report.get("status"), Some("APPROVED"));
        assert_eq!(report.get("course_code"), Some("C1"));
        assert_eq!(
            report.get("enrollment_date"),
            Some("2026-08-31T08:00:00+00:00")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn errors_from_ports_pass_through() {
        let mut enrollment = MockEnrollmentCommand::new();
        enrollment
            .expect_drop_course()
            .times(1)
            .return_once(|_, _| Err(Error::course_not_found("course C9 not found")));
        let standing = MockStandingReview::new();

        let cli = parse(&["drop", "--student", "S1", "--course", "C9"]);
        let err = execute(&cli.command, &enrollment, &standing)
            .await
            .expect_err("unknown course");

        assert_eq!(err.code(), ErrorCode::CourseNotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn check_credits_reports_the_decision() {
        let mut enrollment = MockEnrollmentCommand::new();
        enrollment
            .expect_validate_credit_limit()
            .withf(|_, credits| *credits == 25)
            .times(1)
            .return_once(|_, _| Ok(false));
        let standing = MockStandingReview::new();

        let cli = parse(&["check-credits", "--student", "S1", "--credits", "25"]);
        let report = execute(&cli.command, &enrollment, &standing)
            .await
            .expect("check succeeds");

        assert_eq!(
            report.to_string(),
            "student_id=S1\nrequested_credits=25\nwithin_limit=false\n"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn review_standing_renders_both_statuses() {
        let enrollment = MockEnrollmentCommand::new();
        let mut standing = MockStandingReview::new();
        standing
            .expect_review_standing()
            .times(1)
            .return_once(|student| {
                Ok(StandingReport {
                    student_id: student.clone(),
                    gpa: 1.875,
                    status: AcademicStatus::Suspended,
                    max_credits: 15,
                    previous_status: AcademicStatus::Probation,
                })
            });

        let cli = parse(&["review-standing", "--student", "S1"]);
        let report = execute(&cli.command, &enrollment, &standing)
            .await
            .expect("review succeeds");

        assert_eq!(report.get("gpa"), Some("1.88"));
        assert_eq!(report.get("status"), Some("SUSPENDED"));
        assert_eq!(report.get("previous_status"), Some("PROBATION"));
    }
}

//! JSON registry snapshots.
//!
//! A snapshot carries every student, course and completed grade the
//! in-memory directories hold. Files are read and written through
//! `cap-std` directory handles; writes go to a hidden temporary file in the
//! target directory and are renamed over the destination, so readers never
//! observe a partially written snapshot.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::memory::{InMemoryCourseDirectory, InMemoryStudentDirectory};
use crate::domain::{Course, CourseCode, CourseGrade, Student, StudentId};

/// Errors raised while loading or storing snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Filesystem access failed.
    #[error("snapshot filesystem operation failed ({path}): {message}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error text.
        message: String,
    },
    /// The file is not a valid snapshot document.
    #[error("snapshot {path} is malformed: {message}")]
    Malformed {
        /// Snapshot file.
        path: PathBuf,
        /// Parser error text.
        message: String,
    },
    /// The snapshot could not be encoded.
    #[error("snapshot could not be encoded: {message}")]
    Encode {
        /// Encoder error text.
        message: String,
    },
    /// Two student records share an identifier.
    #[error("snapshot lists student {id} more than once")]
    DuplicateStudent {
        /// Repeated identifier.
        id: StudentId,
    },
    /// Two course records share a code.
    #[error("snapshot lists course {code} more than once")]
    DuplicateCourse {
        /// Repeated code.
        code: CourseCode,
    },
    /// The path does not name a file.
    #[error("snapshot path {path} must name a file")]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },
}

impl SnapshotError {
    fn io(path: impl Into<PathBuf>, error: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.into(),
            message: error.to_string(),
        }
    }
}

/// Serialisable registry contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct RegistrySnapshot {
    /// Student records.
    #[serde(default)]
    pub students: Vec<Student>,
    /// Course records.
    #[serde(default)]
    pub courses: Vec<Course>,
    /// Completed grades keyed by student.
    #[serde(default)]
    pub completed_grades: BTreeMap<StudentId, Vec<CourseGrade>>,
}

/// Directories seeded from a snapshot.
#[derive(Debug, Clone)]
pub struct SeededDirectories {
    /// Student records and grades.
    pub students: Arc<InMemoryStudentDirectory>,
    /// Course catalogue.
    pub courses: Arc<InMemoryCourseDirectory>,
}

impl RegistrySnapshot {
    /// Parse a snapshot document and reject duplicate records.
    pub fn from_json(path: &Path, contents: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self =
            serde_json::from_str(contents).map_err(|err| SnapshotError::Malformed {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        snapshot.ensure_unique()?;
        Ok(snapshot)
    }

    /// Pretty-printed JSON form.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|err| SnapshotError::Encode {
            message: err.to_string(),
        })
    }

    fn ensure_unique(&self) -> Result<(), SnapshotError> {
        let mut student_ids = BTreeSet::new();
        for student in &self.students {
            if !student_ids.insert(student.id()) {
                return Err(SnapshotError::DuplicateStudent {
                    id: student.id().clone(),
                });
            }
        }
        let mut course_codes = BTreeSet::new();
        for course in &self.courses {
            if !course_codes.insert(course.code()) {
                return Err(SnapshotError::DuplicateCourse {
                    code: course.code().clone(),
                });
            }
        }
        Ok(())
    }

    /// Read and parse the snapshot at `path`.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let (dir, file_name) = open_parent(path)?;
        let contents = dir
            .read_to_string(file_name)
            .map_err(|err| SnapshotError::io(path, err))?;
        Self::from_json(path, &contents)
    }

    /// Atomically replace the snapshot at `path`.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let contents = self.to_json()?;
        let (dir, file_name) = open_parent(path)?;
        write_atomic(&dir, file_name, path, &contents)
    }

    /// Seed fresh in-memory directories with this snapshot's records.
    pub fn into_directories(self) -> SeededDirectories {
        let students = Arc::new(InMemoryStudentDirectory::default());
        for student in self.students {
            students.insert(student);
        }
        for (student_id, grades) in self.completed_grades {
            for grade in grades {
                students.record_grade(student_id.clone(), grade);
            }
        }
        let courses = Arc::new(InMemoryCourseDirectory::new(Arc::clone(&students)));
        for course in self.courses {
            courses.insert(course);
        }
        SeededDirectories { students, courses }
    }

    /// Capture the current contents of the directories.
    pub fn capture(directories: &SeededDirectories) -> Self {
        Self {
            students: directories.students.students(),
            courses: directories.courses.courses(),
            completed_grades: directories.students.grades(),
        }
    }
}

fn open_parent(path: &Path) -> Result<(Dir, &str), SnapshotError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| SnapshotError::NotAFile {
            path: path.to_path_buf(),
        })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| SnapshotError::io(parent, err))?;
    Ok((dir, file_name))
}

fn write_atomic(
    dir: &Dir,
    file_name: &str,
    target: &Path,
    contents: &str,
) -> Result<(), SnapshotError> {
    let tmp_name = format!(".{file_name}.tmp.{}", Uuid::new_v4().simple());
    let tmp_path = target.with_file_name(&tmp_name);

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let written = dir
        .open_with(&tmp_name, &options)
        .and_then(|mut file| {
            file.write_all(contents.as_bytes())?;
            file.sync_all()
        });
    if let Err(err) = written {
        discard_temp(dir, &tmp_name);
        return Err(SnapshotError::io(tmp_path, err));
    }

    if let Err(err) = replace(dir, &tmp_name, file_name) {
        discard_temp(dir, &tmp_name);
        return Err(SnapshotError::io(target, err));
    }
    Ok(())
}

#[cfg(windows)]
fn replace(dir: &Dir, tmp_name: &str, file_name: &str) -> io::Result<()> {
    match dir.remove_file(file_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, file_name)
}

#[cfg(not(windows))]
fn replace(dir: &Dir, tmp_name: &str, file_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, file_name)
}

fn discard_temp(dir: &Dir, tmp_name: &str) {
    if dir.remove_file(tmp_name).is_err() {
        // Nothing left to clean up.
    }
}

//! Outbound adapters implementing domain ports.
//!
//! - **memory**: mutex-guarded student and course directories
//! - **notification**: tracing-backed and recording notifiers
//! - **snapshot**: JSON snapshot files that seed and persist the directories
//!
//! Adapters translate between domain types and their storage or transport
//! representation. They contain no enrollment rules.

pub mod memory;
pub mod notification;
pub mod snapshot;

pub use memory::{InMemoryCourseDirectory, InMemoryStudentDirectory};
pub use notification::{RecordingNotifier, SentEmail, TracingNotifier};
pub use snapshot::{RegistrySnapshot, SeededDirectories, SnapshotError};

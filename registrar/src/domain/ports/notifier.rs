//! Port abstraction for outbound student notifications.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notifier adapters.
    pub enum NotifierError {
        /// The message could not be handed to the transport.
        Delivery { message: String } => "notification delivery failed: {message}",
    }
}

/// Subject line sent after a successful enrollment.
pub const ENROLLMENT_CONFIRMATION_SUBJECT: &str = "Enrollment Confirmation";
/// Subject line sent after a successful drop.
pub const DROP_CONFIRMATION_SUBJECT: &str = "Course Drop Confirmation";

/// Delivers short messages to students.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one email.
    async fn send_email(&self, address: &str, subject: &str, body: &str)
    -> Result<(), NotifierError>;
}

//! Notifier adapters.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{Notifier, NotifierError};

/// Emits each notification as a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send_email(
        &self,
        address: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotifierError> {
        if address.trim().is_empty() {
            return Err(NotifierError::delivery("recipient address is empty"));
        }
        info!(
            target: "registrar::notification",
            address,
            subject,
            body,
            "email dispatched"
        );
        Ok(())
    }
}

/// One message captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    /// Recipient address.
    pub address: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
}

/// Keeps every message in memory, optionally failing every delivery.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentEmail>>,
    failure: Option<String>,
}

impl RecordingNotifier {
    /// A notifier that accepts every message.
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier that rejects every message with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    /// Messages accepted so far, oldest first.
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_email(
        &self,
        address: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotifierError> {
        if let Some(message) = &self.failure {
            return Err(NotifierError::delivery(message.as_str()));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentEmail {
                address: address.to_owned(),
                subject: subject.to_owned(),
                body: body.to_owned(),
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn recording_notifier_keeps_messages_in_order() {
        let notifier = RecordingNotifier::new();
        block_on(notifier.send_email("a@pnc.ac.id", "first", "one")).expect("accepted");
        block_on(notifier.send_email("b@pnc.ac.id", "second", "two")).expect("accepted");

        let subjects: Vec<String> = notifier.sent().into_iter().map(|m| m.subject).collect();
        assert_eq!(subjects, ["first", "second"]);
    }

    #[rstest]
    fn failing_notifier_records_nothing() {
        let notifier = RecordingNotifier::failing("relay down");
        let err = block_on(notifier.send_email("a@pnc.ac.id", "subject", "body"))
            .expect_err("rejected");
        assert_eq!(err, NotifierError::delivery("relay down"));
        assert!(notifier.sent().is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn tracing_notifier_rejects_blank_recipient(#[case] address: &str) {
        let err = block_on(TracingNotifier.send_email(address, "subject", "body"))
            .expect_err("blank address");
        assert!(matches!(err, NotifierError::Delivery { .. }));
    }

    #[rstest]
    fn tracing_notifier_accepts_addressed_mail() {
        block_on(TracingNotifier.send_email("a@pnc.ac.id", "subject", "body")).expect("accepted");
    }
}

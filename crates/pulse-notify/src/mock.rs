use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::NotifyError;
use crate::Notifier;

/// Pre-programmed outcome for one delivery attempt.
pub enum MockOutcome {
    Delivered,
    Fail(NotifyError),
}

/// A sent message captured by the mock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    pub to: String,
    pub body: String,
}

/// Mock notifier returning scripted outcomes in sequence.
///
/// Once the script runs out, every further send succeeds. Successful
/// deliveries are captured so tests can assert on payloads.
#[derive(Default)]
pub struct MockNotifier {
    script: Mutex<Vec<MockOutcome>>,
    sent: Mutex<Vec<SentMessage>>,
    call_count: AtomicUsize,
}

impl MockNotifier {
    /// A mock where every send succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock following the given outcome script.
    pub fn scripted(outcomes: Vec<MockOutcome>) -> Self {
        Self {
            script: Mutex::new(outcomes),
            ..Self::default()
        }
    }

    /// Convenience: a mock that always fails with a timeout.
    pub fn always_timeout() -> Self {
        Self::scripted(vec![MockOutcome::Fail(NotifyError::Timeout(
            Duration::from_secs(10),
        ))])
    }

    /// Messages that were actually delivered (send returned Ok).
    pub fn delivered(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let outcome = {
            let mut script = self.script.lock();
            if script.is_empty() {
                MockOutcome::Delivered
            } else {
                script.remove(0)
            }
        };

        match outcome {
            MockOutcome::Delivered => {
                self.sent.lock().push(SentMessage {
                    to: to.to_string(),
                    body: body.to_string(),
                });
                Ok(())
            }
            MockOutcome::Fail(err) => Err(err),
        }
    }
}

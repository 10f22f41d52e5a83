//! Outbound notification for the Pulse pipeline.
//!
//! The dispatcher only knows the [`Notifier`] trait; the concrete
//! transport (a Twilio-style messaging API) lives behind it, and tests
//! inject [`MockNotifier`] instead.

pub mod error;
pub mod mock;
pub mod whatsapp;

pub use error::NotifyError;
pub use mock::{MockNotifier, MockOutcome, SentMessage};
pub use whatsapp::{WhatsAppConfig, WhatsAppNotifier};

use async_trait::async_trait;

/// Delivers a rendered alert to one recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), NotifyError>;
}

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::error::NotifyError;
use crate::Notifier;

/// Connection settings for the messaging API.
pub struct WhatsAppConfig {
    pub account_sid: String,
    pub auth_token: SecretString,
    /// Sender address, e.g. `whatsapp:+14155238886`.
    pub from_address: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Twilio-style WhatsApp notifier.
///
/// POSTs form-encoded messages to
/// `{base_url}/2010-04-01/Accounts/{sid}/Messages.json` with basic auth.
/// The request timeout is bounded by config so a hung provider surfaces
/// as a delivery failure instead of blocking the dispatcher.
pub struct WhatsAppNotifier {
    config: WhatsAppConfig,
    client: reqwest::Client,
}

impl WhatsAppNotifier {
    pub fn new(config: WhatsAppConfig) -> Result<Self, NotifyError> {
        if config.account_sid.is_empty() {
            return Err(NotifyError::NotConfigured("account_sid is empty".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotifyError::Http(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.base_url.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl Notifier for WhatsAppNotifier {
    async fn send(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        let params = [
            ("From", self.config.from_address.as_str()),
            ("To", to),
            ("Body", body),
        ];

        debug!(to, bytes = body.len(), "sending whatsapp message");

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(
                &self.config.account_sid,
                Some(self.config.auth_token.expose_secret()),
            )
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout(self.config.timeout)
                } else {
                    NotifyError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "provider rejected message");
        Err(NotifyError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

//! Settings type definitions with serde defaults.

use serde::{Deserialize, Serialize};

/// Root settings object, one section per subsystem.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseSettings {
    pub store: StoreSettings,
    pub notify: NotifySettings,
    pub enrich: EnrichSettings,
    pub dashboard: DashboardSettings,
}

/// Lead store configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Path to the SQLite database. Relative paths resolve against the
    /// working directory of the pipeline run.
    pub db_path: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    format!("{home}/.pulse/leads.db")
}

/// Outbound notification configuration (Twilio-style messaging API).
///
/// Credentials are empty by default and must come from the settings file
/// or `PULSE_*` environment variables. The auth token is held as a plain
/// string here and wrapped in `SecretString` at the notifier boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifySettings {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender address, e.g. `whatsapp:+14155238886`.
    pub from_address: String,
    /// The officer who receives top-priority alerts.
    pub officer_address: String,
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            account_sid: String::new(),
            auth_token: String::new(),
            from_address: String::new(),
            officer_address: String::new(),
            base_url: "https://api.twilio.com".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl NotifySettings {
    /// Whether enough configuration is present to attempt delivery.
    pub fn is_configured(&self) -> bool {
        !self.account_sid.is_empty()
            && !self.auth_token.is_empty()
            && !self.from_address.is_empty()
            && !self.officer_address.is_empty()
    }
}

/// Enrichment thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichSettings {
    /// Sources at or above this trust score are flagged verified.
    pub trust_threshold: u8,
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self { trust_threshold: 85 }
    }
}

/// Where the officer-facing dossier lives; used to build review links.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub base_url: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let settings = PulseSettings::default();
        assert_eq!(settings.enrich.trust_threshold, 85);
        assert_eq!(settings.notify.timeout_ms, 10_000);
        assert!(!settings.notify.is_configured());
        assert!(settings.store.db_path.ends_with("leads.db"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: PulseSettings =
            serde_json::from_str(r#"{"enrich": {"trust_threshold": 90}}"#).unwrap();
        assert_eq!(settings.enrich.trust_threshold, 90);
        assert_eq!(settings.dashboard.base_url, "http://localhost:3000");
    }

    #[test]
    fn notify_configured_requires_all_fields() {
        let mut notify = NotifySettings {
            account_sid: "AC123".into(),
            auth_token: "tok".into(),
            from_address: "whatsapp:+14155238886".into(),
            officer_address: "whatsapp:+919999999999".into(),
            ..NotifySettings::default()
        };
        assert!(notify.is_configured());
        notify.auth_token.clear();
        assert!(!notify.is_configured());
    }

    #[test]
    fn serde_roundtrip() {
        let settings = PulseSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: PulseSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }
}

//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`PulseSettings::default()`]
//! 2. If `~/.pulse/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `PULSE_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::PulseSettings;

/// Resolve the path to the settings file (`~/.pulse/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".pulse").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<PulseSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<PulseSettings> {
    let defaults = serde_json::to_value(PulseSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: PulseSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Invalid values are logged and ignored (fall back to file/default).
pub fn apply_env_overrides(settings: &mut PulseSettings) {
    if let Some(v) = read_env_string("PULSE_DB_PATH") {
        settings.store.db_path = v;
    }
    if let Some(v) = read_env_string("PULSE_DASHBOARD_URL") {
        settings.dashboard.base_url = v;
    }
    if let Some(v) = read_env_u8("PULSE_TRUST_THRESHOLD", 0, 100) {
        settings.enrich.trust_threshold = v;
    }
    if let Some(v) = read_env_string("PULSE_NOTIFY_ACCOUNT_SID") {
        settings.notify.account_sid = v;
    }
    if let Some(v) = read_env_string("PULSE_NOTIFY_AUTH_TOKEN") {
        settings.notify.auth_token = v;
    }
    if let Some(v) = read_env_string("PULSE_NOTIFY_FROM") {
        settings.notify.from_address = v;
    }
    if let Some(v) = read_env_string("PULSE_NOTIFY_OFFICER") {
        settings.notify.officer_address = v;
    }
    if let Some(v) = read_env_string("PULSE_NOTIFY_BASE_URL") {
        settings.notify.base_url = v;
    }
    if let Some(v) = read_env_u64("PULSE_NOTIFY_TIMEOUT_MS", 100, 120_000) {
        settings.notify.timeout_ms = v;
    }
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u8(name: &str, min: u8, max: u8) -> Option<u8> {
    let val = std::env::var(name).ok()?;
    let result = val.parse::<u8>().ok().filter(|v| (min..=max).contains(v));
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u8 env var, ignoring");
    }
    result
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = val.parse::<u64>().ok().filter(|v| (min..=max).contains(v));
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

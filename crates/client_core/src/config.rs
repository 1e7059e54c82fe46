use std::{fs, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_STORE_BASE_URL: &str =
    "https://frontend-movie-database-default-rtdb.firebaseio.com";
pub const SETTINGS_FILE: &str = "movies.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store_base_url: String,
    pub retry_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_base_url: DEFAULT_STORE_BASE_URL.into(),
            retry_delay_ms: 5_000,
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Parsed base URL of the remote store. Only http and https are accepted.
    pub fn store_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(self.store_base_url.trim())
            .with_context(|| format!("invalid store base url '{}'", self.store_base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "store base url '{}' must use http or https",
                self.store_base_url
            );
        }
        Ok(url)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    store_base_url: Option<String>,
    retry_delay_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `movies.toml` in the working directory, then environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        if let Err(err) = apply_file_overrides(&mut settings, &raw) {
            tracing::warn!("ignoring {SETTINGS_FILE}: {err:#}");
        }
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

pub fn apply_file_overrides(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings =
        toml::from_str(raw).with_context(|| format!("failed to parse {SETTINGS_FILE}"))?;

    if let Some(v) = file_cfg.store_base_url {
        settings.store_base_url = v;
    }
    if let Some(v) = file_cfg.retry_delay_ms.filter(|v| *v > 0) {
        settings.retry_delay_ms = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs.filter(|v| *v > 0) {
        settings.request_timeout_secs = v;
    }
    Ok(())
}

pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("MOVIES_STORE_URL") {
        settings.store_base_url = v;
    }
    if let Some(v) = lookup("APP__STORE_BASE_URL") {
        settings.store_base_url = v;
    }

    if let Some(parsed) = lookup("APP__RETRY_DELAY_MS").and_then(|v| parse_positive(&v)) {
        settings.retry_delay_ms = parsed;
    }

    if let Some(parsed) = lookup("APP__REQUEST_TIMEOUT_SECS").and_then(|v| parse_positive(&v)) {
        settings.request_timeout_secs = parsed;
    }
}

/// Zero would mean a busy retry loop or an instant timeout, so it is ignored.
fn parse_positive(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|v| *v > 0)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

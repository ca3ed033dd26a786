use std::{collections::HashMap, fs, path::Path};

use anyhow::{anyhow, Context};
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::state::OrderingPolicy;

pub const DEFAULT_CONFIG_FILE: &str = "docsync.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    pub server_url: String,
    pub auth_token: Option<String>,
    pub request_timeout_secs: u64,
    pub ordering: OrderingPolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000/api".into(),
            auth_token: None,
            request_timeout_secs: 30,
            ordering: OrderingPolicy::ArrivalOrder,
        }
    }
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the flat TOML file at `path` if readable, then environment
/// overrides looked up through `env`.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => apply_file_values(&mut settings, &file_cfg),
            Err(error) => warn!(path = %path.display(), %error, "ignoring unreadable config file"),
        }
    }

    apply_env_overrides(&mut settings, env);
    settings
}

fn apply_file_values(settings: &mut ClientSettings, file_cfg: &HashMap<String, toml::Value>) {
    if let Some(v) = file_cfg.get("server_url").and_then(toml::Value::as_str) {
        settings.server_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("auth_token").and_then(toml::Value::as_str) {
        settings.auth_token = Some(v.to_string());
    }
    if let Some(v) = file_cfg.get("request_timeout_secs") {
        let parsed = match v {
            toml::Value::Integer(secs) => u64::try_from(*secs).ok(),
            toml::Value::String(secs) => secs.parse().ok(),
            _ => None,
        };
        if let Some(secs) = parsed {
            settings.request_timeout_secs = secs;
        }
    }
    if let Some(v) = file_cfg.get("ordering").and_then(toml::Value::as_str) {
        match v.parse() {
            Ok(ordering) => settings.ordering = ordering,
            Err(error) => warn!(%error, "ignoring ordering from config file"),
        }
    }
}

pub fn apply_env_overrides(settings: &mut ClientSettings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("DOCSYNC_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("DOCSYNC_AUTH_TOKEN") {
        settings.auth_token = Some(v);
    }
    if let Some(v) = env("APP__AUTH_TOKEN") {
        settings.auth_token = Some(v);
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    if let Some(v) = env("APP__ORDERING") {
        if let Ok(ordering) = v.parse() {
            settings.ordering = ordering;
        }
    }
}

/// Trims the url, drops trailing slashes and assumes `http://` when no scheme is
/// given. Fails when the result is not an absolute http(s) url.
pub fn normalize_server_url(raw_server_url: &str) -> anyhow::Result<String> {
    let raw_server_url = raw_server_url.trim();
    if raw_server_url.is_empty() {
        return Ok(ClientSettings::default().server_url);
    }

    let with_scheme = if raw_server_url.contains("://") {
        raw_server_url.to_string()
    } else {
        format!("http://{raw_server_url}")
    };
    let normalized = with_scheme.trim_end_matches('/').to_string();

    let url = Url::parse(&normalized)
        .with_context(|| format!("invalid server url '{raw_server_url}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "unsupported scheme '{}' in server url '{raw_server_url}'",
            url.scheme()
        ));
    }

    Ok(normalized)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

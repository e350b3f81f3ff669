use std::{collections::HashMap, fs, io, path::Path, time::Duration};

use anyhow::Context;
use client_core::ShowfileEndpoints;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "showctl.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub status_path: String,
    pub directory_path: String,
    pub command_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        let endpoints = ShowfileEndpoints::default();
        Self {
            base_url: "http://127.0.0.1/json".into(),
            timeout_secs: 5,
            poll_interval_ms: 1000,
            status_path: endpoints.status,
            directory_path: endpoints.directory,
            command_path: endpoints.command,
        }
    }
}

impl Settings {
    pub fn endpoints(&self) -> ShowfileEndpoints {
        ShowfileEndpoints {
            status: self.status_path.clone(),
            directory: self.directory_path.clone(),
            command: self.command_path.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(50))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FileValue {
    Text(String),
    Integer(i64),
}

impl FileValue {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Integer(value) => value.to_string(),
        }
    }
}

/// Defaults, then the config file, then the environment.
///
/// A missing default config file is fine; an explicitly named one must exist.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound && config_path.is_none() => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: HashMap<String, FileValue> = toml::from_str(raw)?;
    let file_cfg: HashMap<String, String> = file_cfg
        .into_iter()
        .map(|(key, value)| (key, value.into_text()))
        .collect();

    if let Some(v) = file_cfg.get("base_url") {
        settings.base_url = v.clone();
    }
    if let Some(v) = file_cfg.get("timeout_secs") {
        settings.timeout_secs = v
            .parse()
            .with_context(|| format!("timeout_secs must be an integer, got '{v}'"))?;
    }
    if let Some(v) = file_cfg.get("poll_interval_ms") {
        settings.poll_interval_ms = v
            .parse()
            .with_context(|| format!("poll_interval_ms must be an integer, got '{v}'"))?;
    }
    if let Some(v) = file_cfg.get("status_path") {
        settings.status_path = v.clone();
    }
    if let Some(v) = file_cfg.get("directory_path") {
        settings.directory_path = v.clone();
    }
    if let Some(v) = file_cfg.get("command_path") {
        settings.command_path = v.clone();
    }
    Ok(())
}

/// Unparseable numeric overrides are ignored.
fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SHOWCTL_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = lookup("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = lookup("APP__TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.timeout_secs = parsed;
        }
    }
    if let Some(v) = lookup("APP__POLL_INTERVAL_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.poll_interval_ms = parsed;
        }
    }

    if let Some(v) = lookup("APP__COMMAND_PATH") {
        settings.command_path = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

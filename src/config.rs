//! Configuration loader and validator for the CMS content adapter.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
    #[error("Missing cms.base_url. Set it in the config file or via CMS_BASE_URL (e.g. https://your-cms-site.com)")]
    MissingBaseUrl,
}

/// Root configuration struct mirroring the YAML schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub app: App,
    pub cms: Cms,
    #[serde(default)]
    pub contact: Contact,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    pub listen_addr: String,
}

/// Upstream CMS connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cms {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_menu_id")]
    pub menu_id: String,
}

/// Contact form forwarding settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    #[serde(default = "default_form_id")]
    pub form_id: String,
}

impl Default for Contact {
    fn default() -> Self {
        Self {
            form_id: default_form_id(),
        }
    }
}

fn default_cache_ttl_seconds() -> u64 {
    60
}

fn default_request_timeout_seconds() -> u64 {
    10
}

fn default_menu_id() -> String {
    "main".into()
}

fn default_form_id() -> String {
    "website_contact".into()
}

impl Cms {
    /// Base URL without a trailing slash, or `MissingBaseUrl` when unset.
    pub fn base_url(&self) -> Result<&str, ConfigError> {
        self.base_url
            .as_deref()
            .map(|b| b.trim().trim_end_matches('/'))
            .filter(|b| !b.is_empty())
            .ok_or(ConfigError::MissingBaseUrl)
    }

    /// Basic-auth pair, only when both halves are non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let user = self.username.as_deref().filter(|u| !u.is_empty())?;
        let pass = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((user, pass))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Config {
    /// Overlay `CMS_BASE_URL`, `CMS_USERNAME` and `CMS_PASSWORD` on top of the file values.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CMS_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.cms.base_url = Some(v);
        }
        if let Some(v) = lookup("CMS_USERNAME") {
            self.cms.username = Some(v);
        }
        if let Some(v) = lookup("CMS_PASSWORD") {
            self.cms.password = Some(v);
        }
    }
}

/// Load configuration from a YAML file, apply environment overrides and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let mut cfg: Config = serde_yaml::from_str(&content)?;
    cfg.apply_env_overrides(|key| std::env::var(key).ok());
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.app.listen_addr.trim().is_empty() {
        return Err(ConfigError::Invalid("app.listen_addr must be non-empty"));
    }

    if let Some(base) = cfg.cms.base_url.as_deref().filter(|b| !b.trim().is_empty()) {
        match Url::parse(base.trim()) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            _ => return Err(ConfigError::Invalid("cms.base_url must be an http(s) URL")),
        }
    }
    if cfg.cms.request_timeout_seconds == 0 {
        return Err(ConfigError::Invalid("cms.request_timeout_seconds must be > 0"));
    }
    // cache_ttl_seconds == 0 disables the response cache
    if cfg.cms.menu_id.trim().is_empty() {
        return Err(ConfigError::Invalid("cms.menu_id must be non-empty"));
    }

    if cfg.contact.form_id.trim().is_empty() {
        return Err(ConfigError::Invalid("contact.form_id must be non-empty"));
    }

    Ok(())
}

/// Example configuration shipped with the crate.
pub fn example() -> &'static str {
    r#"app:
  listen_addr: "127.0.0.1:3000"

cms:
  base_url: "https://cms.example.com/"
  username: ""
  password: ""
  cache_ttl_seconds: 60
  request_timeout_seconds: 10
  menu_id: "main"

contact:
  form_id: "website_contact"
"#
}

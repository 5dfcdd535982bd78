//! Client configuration: backend base URL selection, timeouts, upload policy.
//!
//! Values come from three places, highest precedence first: command-line
//! flags, an optional TOML file, and the host heuristic in
//! [`resolve_base_url`].

use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ClientError;

/// Backend used when the front end runs against a local host.
pub const LOCAL_BASE_URL: &str = "http://127.0.0.1:8000";
/// Backend used everywhere else.
pub const DEPLOYED_BASE_URL: &str = "https://legas-ai-app.onrender.com";

/// True for `localhost` and any loopback address (`127.0.0.1`, `::1`, ...).
pub fn is_local_host(host: &str) -> bool {
    let host = host.trim().trim_start_matches('[').trim_end_matches(']');
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    host.parse::<IpAddr>()
        .map(|ip| ip.is_loopback())
        .unwrap_or(false)
}

/// Pick the backend for the host the front end is served from. An unknown
/// host is treated as a deployment.
pub fn resolve_base_url(host: Option<&str>) -> &'static str {
    match host {
        Some(h) if is_local_host(h) => LOCAL_BASE_URL,
        _ => DEPLOYED_BASE_URL,
    }
}

/// Runtime configuration for [`crate::transport::HttpBackend`] and the
/// session controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash (e.g. `http://127.0.0.1:8000`).
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout. Analyses run an LLM server side, so this is long.
    pub request_timeout: Duration,
    /// Refuse uploads whose content is not recognisably a PDF.
    pub require_pdf: bool,
}

impl ClientConfig {
    /// Create a config with defaults.
    ///
    /// - connect_timeout: 5 s
    /// - request_timeout: 120 s
    /// - require_pdf: true
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(120),
            require_pdf: true,
        }
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Merge a file config and command-line overrides.
    pub fn from_sources(file: &FileConfig, overrides: &Overrides) -> Result<Self, ClientError> {
        let host = overrides.host.as_deref().or(file.host.as_deref());
        let base_url = overrides
            .base_url
            .clone()
            .or_else(|| file.base_url.clone())
            .unwrap_or_else(|| resolve_base_url(host).to_string());

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base URL must start with http:// or https://, got '{base_url}'"
            )));
        }

        let mut cfg = ClientConfig::new(base_url);
        if let Some(secs) = file.connect_timeout_secs {
            cfg.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.request_timeout_secs {
            cfg.request_timeout = Duration::from_secs(secs);
        }
        if let Some(require) = file.require_pdf {
            cfg.require_pdf = require;
        }
        if overrides.allow_any_file {
            cfg.require_pdf = false;
        }
        Ok(cfg)
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub host: Option<String>,
    pub allow_any_file: bool,
}

/// On-disk TOML config. Every field is optional.
///
/// ```toml
/// host = "localhost"
/// request_timeout_secs = 300
/// require_pdf = true
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub host: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub require_pdf: Option<bool>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self, ClientError> {
        toml::from_str(text).map_err(|e| ClientError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&text)
    }
}

//! Application configuration structures.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::ContestYears;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Recognized contest years
    #[serde(default)]
    pub contest: ContestConfig,

    /// Upstream feed endpoints and HTTP behavior
    #[serde(default)]
    pub feed: FeedConfig,

    /// Merge behavior of the synchronizer
    #[serde(default)]
    pub sync: SyncConfig,

    /// Read API settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Contest years as an immutable value for the engine and synchronizer.
    pub fn years(&self) -> Result<ContestYears> {
        ContestYears::new(self.contest.years.clone())
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        self.years()
            .map_err(|e| AppError::validation(e.to_string()))?;

        if self.feed.user_agent.trim().is_empty() {
            return Err(AppError::validation("feed.user_agent is empty"));
        }
        if self.feed.timeout_secs == 0 {
            return Err(AppError::validation("feed.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.feed.organizations_url(2014)).map_err(|e| {
            AppError::validation(format!("feed.organizations_url is not a URL: {e}"))
        })?;
        url::Url::parse(&self.feed.tasks_url("org", 2014))
            .map_err(|e| AppError::validation(format!("feed.tasks_url is not a URL: {e}")))?;
        if !self.feed.tasks_url.contains("{org}") {
            return Err(AppError::validation(
                "feed.tasks_url must contain an {org} placeholder",
            ));
        }
        self.server.bind.parse::<SocketAddr>().map_err(|e| {
            AppError::validation(format!("server.bind '{}': {e}", self.server.bind))
        })?;
        Ok(())
    }
}

/// Contest year settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestConfig {
    /// Every year the tracker knows about; the maximum is the active year
    #[serde(default = "defaults::years")]
    pub years: Vec<i32>,
}

impl Default for ContestConfig {
    fn default() -> Self {
        Self {
            years: defaults::years(),
        }
    }
}

/// Upstream feed endpoints and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Organization list URL, `{year}` is substituted
    #[serde(default = "defaults::organizations_url")]
    pub organizations_url: String,

    /// Task list URL, `{year}` and `{org}` are substituted
    #[serde(default = "defaults::tasks_url")]
    pub tasks_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between upstream requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl FeedConfig {
    pub fn organizations_url(&self, year: i32) -> String {
        self.organizations_url.replace("{year}", &year.to_string())
    }

    pub fn tasks_url(&self, org: &str, year: i32) -> String {
        self.tasks_url
            .replace("{year}", &year.to_string())
            .replace("{org}", org)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            organizations_url: defaults::organizations_url(),
            tasks_url: defaults::tasks_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// How the synchronizer decides that an organization already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgMatch {
    /// Same short name in the same year
    #[default]
    NameAndYear,
    /// Same short name in any year
    Name,
}

/// Synchronizer settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub org_match: OrgMatch,
}

/// Read API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "defaults::bind")]
    pub bind: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: defaults::bind(),
            json_logs: false,
        }
    }
}

mod defaults {
    // Contest defaults
    pub fn years() -> Vec<i32> {
        vec![2014, 2013, 2012]
    }

    // Feed defaults
    pub fn organizations_url() -> String {
        "https://www.google-melange.com/gci/org/list/public/google/gci{year}?fmt=json".into()
    }
    pub fn tasks_url() -> String {
        "https://www.google-melange.com/gci/org/google/gci{year}/{org}?fmt=json&limit=1000&idx=1"
            .into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; yagcil/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        100
    }

    // Server defaults
    pub fn bind() -> String {
        "127.0.0.1:5000".into()
    }
}

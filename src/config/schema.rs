use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::grouping::GroupMode;
use crate::output::OutputFormat;

/// Default HTTP request timeout when none is configured
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings read from ~/.config/orko/config.yaml
///
/// Example YAML:
/// ```yaml
/// api_url: https://github.example.com/api/v3
/// cache_dir: /var/tmp/orko
/// request_timeout: 45s
/// repos:
///   - mobify/portal_app
/// group: weekday
/// format: csv
/// working_hours_only: true
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// GitHub API base URL (default: https://api.github.com)
    #[serde(default)]
    pub api_url: Option<String>,

    /// Where HTTP responses are cached
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Request timeout as a humantime string, e.g. "30s" or "2m"
    #[serde(default)]
    pub request_timeout: Option<String>,

    /// Repositories to query when none are given on the command line
    #[serde(default)]
    pub repos: Vec<String>,

    #[serde(default)]
    pub group: Option<GroupMode>,

    #[serde(default)]
    pub format: Option<OutputFormat>,

    #[serde(default)]
    pub working_hours_only: Option<bool>,
}

impl Config {
    pub fn request_timeout(&self) -> anyhow::Result<Duration> {
        match &self.request_timeout {
            Some(value) => humantime::parse_duration(value.trim()).map_err(|e| {
                anyhow::anyhow!("Invalid request_timeout '{}': {}", value, e)
            }),
            None => Ok(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

//! Configuration management for the media health monitor

use crate::obfuscate::Redactor;
use clap::{Parser, ValueEnum};
use reqwest::Url;
use serde::Serialize;
use std::time::Duration;

/// Status check for Radarr and Sonarr
#[derive(Parser, Debug, Clone)]
#[command(name = "media_check")]
#[command(version, about = "Check availability of Radarr and Sonarr", long_about = None)]
pub struct Cli {
    /// Radarr base URL
    #[arg(long = "url-a", visible_alias = "radarr-url", env = "url_radarr", default_value = "")]
    pub url_a: String,

    /// Sonarr base URL
    #[arg(long = "url-b", visible_alias = "sonarr-url", env = "url_sonarr", default_value = "")]
    pub url_b: String,

    /// Radarr API token
    #[arg(
        long = "token-a",
        visible_alias = "radarr-token",
        env = "apikey_radarr",
        default_value = "",
        hide_env_values = true
    )]
    pub token_a: String,

    /// Sonarr API token
    #[arg(
        long = "token-b",
        visible_alias = "sonarr-token",
        env = "apikey_sonarr",
        default_value = "",
        hide_env_values = true
    )]
    pub token_b: String,

    /// Enable debug logging (URLs and API keys are logged unmasked)
    #[arg(long)]
    pub debug: bool,

    /// Keep polling instead of checking once
    #[arg(long)]
    pub daemon: bool,

    /// Seconds between checks in daemon mode
    #[arg(long, value_name = "SECONDS", env = "CHECK_INTERVAL_SECONDS", default_value_t = 300)]
    pub interval: u64,

    /// HTTP timeout for each status request
    #[arg(long, value_name = "SECONDS", env = "HTTP_TIMEOUT_SECONDS", default_value_t = 10)]
    pub timeout: u64,

    /// Log output format
    #[arg(long, value_enum, env = "LOG_FORMAT", default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Info,
    Debug,
}

impl Verbosity {
    /// Default filter directive when `RUST_LOG` is not set
    pub fn as_filter(&self) -> &'static str {
        match self {
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
        }
    }

    pub fn is_debug(&self) -> bool {
        matches!(self, Verbosity::Debug)
    }
}

/// A monitored backend exposing `/api/v3/system/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceTarget {
    pub name: String,
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: String,
}

impl ServiceTarget {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn status_url(&self) -> String {
        format!("{}/api/v3/system/status", self.base_url.trim_end_matches('/'))
    }
}

/// Resolved configuration, immutable once the monitor starts
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub radarr: ServiceTarget,
    pub sonarr: ServiceTarget,

    /// Poll forever instead of a single check
    pub daemon: bool,

    /// Pause between daemon cycles
    pub interval: Duration,

    /// HTTP timeout for status requests
    pub http_timeout: Duration,

    pub verbosity: Verbosity,

    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            radarr: ServiceTarget::new("Radarr", "", ""),
            sonarr: ServiceTarget::new("Sonarr", "", ""),
            daemon: false,
            interval: Duration::from_secs(300),
            http_timeout: Duration::from_secs(10),
            verbosity: Verbosity::Info,
            log_format: LogFormat::Text,
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            radarr: ServiceTarget::new("Radarr", cli.url_a, cli.token_a),
            sonarr: ServiceTarget::new("Sonarr", cli.url_b, cli.token_b),
            daemon: cli.daemon,
            interval: Duration::from_secs(cli.interval),
            http_timeout: Duration::from_secs(cli.timeout),
            verbosity: if cli.debug {
                Verbosity::Debug
            } else {
                Verbosity::Info
            },
            log_format: cli.log_format,
        }
    }
}

impl Config {
    /// Parse command line arguments, falling back to environment variables
    pub fn from_args() -> Self {
        Cli::parse().into()
    }

    /// Credential policy for log output. Only `--debug` unmasks; a
    /// `RUST_LOG` override never does.
    pub fn redactor(&self) -> Redactor {
        Redactor::new(self.verbosity.is_debug())
    }

    /// Targets in check order
    pub fn targets(&self) -> Vec<ServiceTarget> {
        vec![self.radarr.clone(), self.sonarr.clone()]
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for target in [&self.radarr, &self.sonarr] {
            if target.base_url.is_empty() {
                return Err(format!("{} URL cannot be empty", target.name));
            }

            match Url::parse(&target.base_url) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => {
                    return Err(format!(
                        "{} URL must use http or https, got {}",
                        target.name,
                        url.scheme()
                    ));
                }
                Err(e) => return Err(format!("{} URL is invalid: {}", target.name, e)),
            }
        }

        if self.interval.is_zero() {
            return Err("interval must be greater than 0".to_string());
        }

        if self.http_timeout.is_zero() {
            return Err("timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

//! Media Server Health Monitor Library
//!
//! This library checks the `/api/v3/system/status` endpoint of Radarr and
//! Sonarr, logs UP/DOWN status with credentials masked, and can keep polling
//! as a daemon.

pub mod config;
pub mod errors;
pub mod monitor;
pub mod obfuscate;
pub mod status;
pub mod transport;

pub use config::{Cli, Config, LogFormat, ServiceTarget, Verbosity};
pub use errors::{CheckError, MonitorError, Result};
pub use monitor::{RunMode, RunOutcome, ServiceHealthMonitor};
pub use obfuscate::{Redactor, obfuscate, obfuscate_url};
pub use status::{CheckResult, CycleReport, SystemStatus, format_uptime};
pub use transport::StatusClient;

//! Health monitor polling the configured media services

use crate::config::{Config, ServiceTarget};
use crate::errors::{CheckError, MonitorError, Result};
use crate::obfuscate::Redactor;
use crate::status::{CheckResult, CycleReport, UNKNOWN};
use crate::transport::StatusClient;

use chrono::Utc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span, instrument};

/// How `run` should behave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Check every target once
    Once,
    /// Check, sleep, repeat until cancelled
    Daemon { interval: Duration },
}

impl RunMode {
    pub fn from_config(config: &Config) -> Self {
        if config.daemon {
            RunMode::Daemon {
                interval: config.interval,
            }
        } else {
            RunMode::Once
        }
    }
}

/// Summary of a finished `run`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub cycles: u64,
    /// Cycles with at least one target down
    pub failed_cycles: u64,
    /// Result of the most recent cycle
    pub all_up: bool,
    pub interrupted: bool,
}

impl RunOutcome {
    fn record(&mut self, report: &CycleReport) {
        self.cycles += 1;
        self.all_up = report.all_up();
        if !self.all_up {
            self.failed_cycles += 1;
        }
    }

    /// 0 when everything was up or the daemon was stopped, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.interrupted || self.all_up { 0 } else { 1 }
    }
}

/// Checks each target's status endpoint and logs UP/DOWN
pub struct ServiceHealthMonitor {
    targets: Vec<ServiceTarget>,
    client: StatusClient,
    redactor: Redactor,
}

impl ServiceHealthMonitor {
    pub fn new(targets: Vec<ServiceTarget>, client: StatusClient, redactor: Redactor) -> Self {
        Self {
            targets,
            client,
            redactor,
        }
    }

    /// Build a monitor for the Radarr and Sonarr targets in `config`
    pub fn from_config(config: &Config, redactor: Redactor) -> Result<Self> {
        config.validate().map_err(MonitorError::Config)?;

        let client = StatusClient::new(config.http_timeout)?;
        Ok(Self::new(config.targets(), client, redactor))
    }

    pub fn targets(&self) -> &[ServiceTarget] {
        &self.targets
    }

    /// Check a single target. Failures are logged and reported as down,
    /// never returned.
    #[instrument(skip(self, target), fields(service = %target.name))]
    pub async fn check_service(&self, target: &ServiceTarget) -> CheckResult {
        let url = target.status_url();

        info!(
            "Calling {} API: {} with API key: {}",
            target.name,
            self.redactor.url(&url),
            self.redactor.key(&target.api_key)
        );

        if self.redactor.reveals() {
            debug!(
                "Sending GET to {} with headers {{\"X-Api-Key\": \"{}\"}}",
                url, target.api_key
            );
        }

        match self.client.fetch_status(target).await {
            Ok(status) => {
                info!("{} API call successful.", target.name);
                CheckResult::from_status(status, Utc::now())
            }
            Err(CheckError::MalformedResponse(e)) => {
                info!("{} API call successful.", target.name);
                error!("Failed to parse {} status JSON: {}", target.name, e);
                CheckResult::up_unknown()
            }
            Err(CheckError::HttpStatus { status, body }) => {
                error!(
                    "{} API call failed, status {}: {}",
                    target.name, status, body
                );
                CheckResult::down()
            }
            Err(CheckError::Transport(e)) => {
                let timed_out = e.is_timeout();
                // reqwest errors carry the request URL
                let e = if self.redactor.reveals() { e } else { e.without_url() };
                if timed_out {
                    error!(
                        "Error contacting {}: timed out after {:?} ({})",
                        target.name,
                        self.client.timeout(),
                        e
                    );
                } else {
                    error!("Error contacting {}: {}", target.name, e);
                }
                CheckResult::down()
            }
        }
    }

    /// Check every target in order and log one line per target
    pub async fn check_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        for target in &self.targets {
            let result = self.check_service(target).await;
            report.results.push((target.name.clone(), result));
        }

        for (name, result) in &report.results {
            log_result(name, result);
        }

        report
    }

    /// True iff every target is up
    pub async fn check_all(&self) -> bool {
        self.check_cycle().await.all_up()
    }

    /// Run once, or loop until `cancel` fires in daemon mode.
    ///
    /// Cancellation is honoured before a cycle starts and while sleeping.
    /// A request already in flight runs to completion or timeout.
    pub async fn run(&self, mode: RunMode, cancel: CancellationToken) -> RunOutcome {
        let mut outcome = RunOutcome::default();

        let interval = match mode {
            RunMode::Once => {
                let report = self.check_cycle().await;
                outcome.record(&report);
                return outcome;
            }
            RunMode::Daemon { interval } => interval,
        };

        info!("Running in daemon mode.");

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let cycle = outcome.cycles + 1;
            let report = self
                .check_cycle()
                .instrument(info_span!("cycle", n = cycle))
                .await;
            outcome.record(&report);

            debug!(
                "Cycle {} finished with {} target(s) down, next check in {:?}",
                cycle,
                report.down_count(),
                interval
            );

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        info!("Stopped by user.");
        outcome.interrupted = true;
        outcome
    }
}

fn log_result(name: &str, result: &CheckResult) {
    if result.up {
        info!(
            "{} (v{}) is UP. Started: {}, Uptime: {}",
            name,
            result.version.as_deref().unwrap_or(UNKNOWN),
            result.start_time.as_deref().unwrap_or("None"),
            result.uptime.as_deref().unwrap_or(UNKNOWN)
        );
    } else {
        error!("{} is DOWN.", name);
    }
}

//! Media Server Health Monitor Binary

use media_check::{Config, LogFormat, RunMode, ServiceHealthMonitor};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = Config::from_args();

    initialize_tracing(&config);

    info!("Starting media_check v{}", env!("CARGO_PKG_VERSION"));

    let monitor = match ServiceHealthMonitor::from_config(&config, config.redactor()) {
        Ok(monitor) => monitor,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let mode = RunMode::from_config(&config);
    let cancel = CancellationToken::new();

    if let RunMode::Daemon { .. } = mode {
        let shutdown_token = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to wait for shutdown signal: {}", e);
                return;
            }
            info!("Received interrupt, stopping after the current check");
            shutdown_token.cancel();
        });
    }

    let outcome = monitor.run(mode, cancel).await;
    std::process::exit(outcome.exit_code());
}

/// Initialize logging: text with millisecond timestamps, or JSON
fn initialize_tracing(config: &Config) {
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(config.verbosity.as_filter()))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter_layer);

    match config.log_format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .json();
            registry.with(fmt_layer).init();
        }
        LogFormat::Text => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                ));
            registry.with(fmt_layer).init();
        }
    }
}

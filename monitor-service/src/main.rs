//! VitalGuard Monitor - Main Entry Point

mod logic;
pub mod constants;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use logic::config::MonitorConfig;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!(
        "Starting {} Monitor v{}...",
        constants::APP_NAME,
        constants::APP_VERSION
    );

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match MonitorConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration load failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        log::error!("Configuration invalid: {}", e);
        std::process::exit(2);
    }

    log::info!("Monitoring channel {}", config.channel_id);
    log::info!(
        "   Poll interval: {}s, batch size: {}",
        config.poll_interval_secs,
        config.batch_size
    );
    log::info!(
        "   Variant: {}",
        if config.fever_detection {
            "fever-aware (alerts 0-5)"
        } else {
            "risk-only (alerts 0-2)"
        }
    );
    if let Some(sink) = &config.log_sink_url {
        log::info!("   Log sink: {}", sink);
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    let ctrl_c_flag = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Shutdown requested, finishing current cycle...");
            ctrl_c_flag.store(true, Ordering::Relaxed);
        }
    });

    logic::monitor_loop::run(config, shutdown).await;

    log::info!("Monitor shut down cleanly");
}

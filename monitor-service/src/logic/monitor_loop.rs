//! Monitor Loop
//!
//! The polling driver: fetch a batch, derive features, score it, map the
//! newest assessment to an alert, publish, then sleep until the next
//! cycle. A failed cycle is logged and retried on the next tick; only a
//! shutdown request stops the loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::constants::{APP_NAME, APP_VERSION};
use crate::logic::alert::{self, AlertCode};
use crate::logic::config::MonitorConfig;
use crate::logic::errors::{CycleError, InsufficientDataError};
use crate::logic::features;
use crate::logic::ingest::TelemetryClient;
use crate::logic::model::{self, RiskAssessment};
use crate::logic::sink::SinkClient;
use crate::logic::status::{self, StatusSnapshot};

/// Shutdown checks happen at least this often while sleeping.
const SLEEP_TICK_MS: u64 = 500;

/// What one successful cycle produced.
pub struct CycleOutcome {
    pub samples_fetched: usize,
    pub samples_scored: usize,
    pub assessment: RiskAssessment,
    pub alert: AlertCode,
    pub published_entry: Option<u64>,
}

// ============================================================================
// LOOP
// ============================================================================

/// Run polling cycles until the shutdown flag is set.
pub async fn run(config: MonitorConfig, shutdown: Arc<AtomicBool>) {
    let client = TelemetryClient::new(&config);
    let sink = SinkClient::from_config(&config);

    let startup = format!(
        "{} v{} session {} watching channel {} every {}s",
        APP_NAME,
        APP_VERSION,
        status::session_id(),
        config.channel_id,
        config.poll_interval_secs
    );
    log::info!("{}", startup);
    if let Some(sink) = &sink {
        sink.mirror(&startup).await;
    }

    let mut cycle: u64 = 0;
    while !shutdown.load(Ordering::Relaxed) {
        cycle += 1;

        match run_cycle(&client, &config).await {
            Ok(outcome) => {
                let summary = format!(
                    "cycle {}: {} fetched, {} scored, risk {:.1} ({}), alert {}",
                    cycle,
                    outcome.samples_fetched,
                    outcome.samples_scored,
                    outcome.assessment.risk_score,
                    outcome.assessment.risk_level,
                    outcome.alert
                );
                log::info!("{}", summary);
                if let Some(sink) = &sink {
                    sink.mirror(&summary).await;
                }

                status::set_status(StatusSnapshot {
                    cycle,
                    updated_at: Some(Utc::now()),
                    samples_fetched: outcome.samples_fetched,
                    samples_scored: outcome.samples_scored,
                    risk_score: Some(outcome.assessment.risk_score),
                    risk_level: Some(outcome.assessment.risk_level),
                    alert_code: Some(outcome.alert.value()),
                    published_entry: outcome.published_entry,
                    last_error: None,
                });
            }
            Err(e) => {
                match &e {
                    CycleError::Fetch(fetch) => {
                        log::warn!("Cycle {} fetch failed, retrying next cycle: {}", cycle, fetch);
                    }
                    CycleError::Insufficient(insufficient) => {
                        log::warn!("Cycle {} skipped: {}", cycle, insufficient);
                    }
                }

                // Keep the last good assessment visible alongside the error
                let mut snapshot = status::get_status();
                snapshot.cycle = cycle;
                snapshot.updated_at = Some(Utc::now());
                snapshot.last_error = Some(e.to_string());
                status::set_status(snapshot);
            }
        }

        sleep_with_shutdown(Duration::from_secs(config.poll_interval_secs), &shutdown).await;
    }

    log::info!("Monitor stopped after {} cycles", cycle);
}

/// One full pipeline pass. Publish failures do not fail the cycle; the
/// outcome just records that nothing was written.
async fn run_cycle(
    client: &TelemetryClient,
    config: &MonitorConfig,
) -> Result<CycleOutcome, CycleError> {
    let samples = client.fetch_feeds(config.batch_size).await?;
    let samples_fetched = samples.len();

    let extracted = features::extract_batch(&samples, config)?;
    let assessments = model::score_batch(&extracted, config)?;
    let samples_scored = assessments.len();

    let Some(assessment) = assessments.last().cloned() else {
        return Err(InsufficientDataError {
            stage: "risk scoring",
            available: 0,
            required: 1,
        }
        .into());
    };

    let alert = alert::alert_for(&assessment, config);

    let published_entry = match client.publish_alert(alert.value()).await {
        Ok(entry_id) => Some(entry_id),
        Err(e) => {
            log::warn!("Publish failed, alert {} dropped: {}", alert, e);
            None
        }
    };

    Ok(CycleOutcome {
        samples_fetched,
        samples_scored,
        assessment,
        alert,
        published_entry,
    })
}

/// Sleep in short ticks so a shutdown request interrupts promptly.
async fn sleep_with_shutdown(total: Duration, shutdown: &AtomicBool) {
    let mut remaining = total;
    while !remaining.is_zero() {
        if shutdown.load(Ordering::Relaxed) {
            return;
        }
        let tick = remaining.min(Duration::from_millis(SLEEP_TICK_MS));
        tokio::time::sleep(tick).await;
        remaining -= tick;
    }
}

// ============================================================================
// TESTS
// ============================================================================

//! Log Sink Mirror
//!
//! Best-effort mirroring of cycle summaries to the companion log server.
//! Failures are debug-logged and never surface to the caller; the sink
//! is an observer of the pipeline, not a participant.

use std::time::Duration;

use crate::logic::config::MonitorConfig;

pub struct SinkClient {
    url: String,
    http_client: reqwest::Client,
}

impl SinkClient {
    /// None when no sink is configured.
    pub fn from_config(config: &MonitorConfig) -> Option<Self> {
        let url = config
            .log_sink_url
            .as_ref()?
            .trim_end_matches('/')
            .to_string();
        if url.is_empty() {
            return None;
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Some(Self { url, http_client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Post one line to the sink.
    pub async fn mirror(&self, line: &str) {
        let url = format!("{}/log", self.url);
        match self
            .http_client
            .post(&url)
            .body(line.to_string())
            .send()
            .await
        {
            Ok(response) if !response.status().is_success() => {
                log::debug!("Log sink returned status {}", response.status());
            }
            Ok(_) => {}
            Err(e) => {
                log::debug!("Log sink unreachable: {}", e);
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_sink_configured() {
        let config = MonitorConfig {
            log_sink_url: None,
            ..MonitorConfig::default()
        };
        assert!(SinkClient::from_config(&config).is_none());

        let blank = MonitorConfig {
            log_sink_url: Some(String::new()),
            ..MonitorConfig::default()
        };
        assert!(SinkClient::from_config(&blank).is_none());
    }

    #[test]
    fn test_sink_url_is_normalized() {
        let config = MonitorConfig {
            log_sink_url: Some("http://127.0.0.1:5000/".to_string()),
            ..MonitorConfig::default()
        };
        let sink = SinkClient::from_config(&config).unwrap();
        assert_eq!(sink.url(), "http://127.0.0.1:5000");
    }
}

//! Telemetry Store Client
//!
//! HTTP client for the two store endpoints the monitor touches: reading
//! the channel feed and writing the alert status field back.

use std::time::Duration;

use crate::logic::config::MonitorConfig;
use crate::logic::errors::{FetchError, PublishError};
use crate::logic::ingest::feed::{ChannelFeed, VitalSample};

/// Channel field that carries the published alert status.
const ALERT_FIELD: &str = "field2";

pub struct TelemetryClient {
    base_url: String,
    channel_id: String,
    read_api_key: String,
    write_api_key: String,
    http_client: reqwest::Client,
}

impl TelemetryClient {
    pub fn new(config: &MonitorConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            channel_id: config.channel_id.clone(),
            read_api_key: config.read_api_key.clone(),
            write_api_key: config.write_api_key.clone(),
            http_client,
        }
    }

    /// Fetch the newest `results` entries and convert them to typed
    /// samples, oldest first as the store returns them.
    pub async fn fetch_feeds(&self, results: usize) -> Result<Vec<VitalSample>, FetchError> {
        let url = format!(
            "{}/channels/{}/feeds.json?api_key={}&results={}",
            self.base_url, self.channel_id, self.read_api_key, results
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let feed: ChannelFeed = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        feed_to_samples(feed)
    }

    /// Publish an alert code to the status field. The store answers with
    /// the new entry id, or the literal `0` when the update was rejected.
    pub async fn publish_alert(&self, code: u8) -> Result<u64, PublishError> {
        let url = format!(
            "{}/update.json?api_key={}&{}={}",
            self.base_url, self.write_api_key, ALERT_FIELD, code
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| PublishError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PublishError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PublishError::Network(e.to_string()))?;

        match body.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(PublishError::Rejected),
            Ok(entry_id) => Ok(entry_id),
        }
    }
}

/// Convert a decoded feed into typed samples. An empty feed list maps to
/// `FetchError::EmptyResult`, never to an empty vector.
fn feed_to_samples(feed: ChannelFeed) -> Result<Vec<VitalSample>, FetchError> {
    if feed.feeds.is_empty() {
        return Err(FetchError::EmptyResult);
    }

    Ok(feed.feeds.iter().map(|entry| entry.to_sample()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_feed(json: &str) -> ChannelFeed {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_empty_feed_is_an_error() {
        let feed = decode_feed(r#"{"channel": {"id": 7}, "feeds": []}"#);
        assert!(matches!(feed_to_samples(feed), Err(FetchError::EmptyResult)));
    }

    #[test]
    fn test_feed_entries_convert_in_order() {
        let feed = decode_feed(
            r#"{
                "channel": {"id": 7, "name": "ward-3", "last_entry_id": 2},
                "feeds": [
                    {"created_at": "2026-08-25T10:00:00Z", "entry_id": 1,
                     "field1": "36.8", "field3": "72", "field4": "98", "field7": "0.9"},
                    {"created_at": "2026-08-25T10:00:15Z", "entry_id": 2,
                     "field1": "36.9", "field3": "74", "field4": "97", "field7": "1.0"}
                ]
            }"#,
        );

        let samples = feed_to_samples(feed).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].entry_id, 1);
        assert_eq!(samples[1].entry_id, 2);
        assert_eq!(samples[1].heart_rate, Some(74.0));
    }
}

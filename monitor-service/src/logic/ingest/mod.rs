//! Telemetry ingest: wire format, parsing, and the store client.

pub mod client;
pub mod feed;

pub use client::TelemetryClient;
pub use feed::{ChannelFeed, FeedEntry, VitalSample};

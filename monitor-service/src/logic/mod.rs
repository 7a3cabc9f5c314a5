//! Logic Module - The Monitoring Pipeline
//!
//! Modules in the order data flows through a cycle: ingest fetches and
//! types feed rows, features derives the vectors, model standardizes and
//! scores, alert folds in fever status, and monitor_loop drives the
//! cadence. config, status, sink and errors support all of them.

pub mod alert;
pub mod config;
pub mod errors;
pub mod features;
pub mod ingest;
pub mod model;
pub mod monitor_loop;
pub mod sink;
pub mod status;

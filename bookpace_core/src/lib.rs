#![forbid(unsafe_code)]

//! Core domain model and business logic for the bookpace reading tracker.
//!
//! This crate provides:
//! - Domain types (cadence, books, progress outcomes)
//! - Completion-date estimation and variance math
//! - Shelf persistence and the progress event log
//! - Completed-book stats and CSV export

pub mod types;
pub mod error;
pub mod estimator;
pub mod config;
pub mod logging;
pub mod log;
pub mod store;
pub mod export;
pub mod stats;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use estimator::{
    days_between, days_from_estimate, estimated_completion_date, reading_days_needed,
};
pub use export::export_finished;
pub use log::{read_events, EventSink, JsonlSink, ProgressEvent};
pub use stats::{average_text, summarize, variance_text, CompletedSummary};
pub use store::Shelf;

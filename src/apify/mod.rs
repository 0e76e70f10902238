//! Remote job client for the Apify platform
//!
//! Submits suite URLs to the extraction actor, waits for the run and reads
//! back its dataset.

pub mod client;
pub mod types;

pub use client::{ApifyClient, JobRunner};
pub use types::{ContentRef, DatasetItem, PageMetadata, RunInfo, RunStatus};

//! Source Curator library
//!
//! Filtering, scoring, deduplication and merging of Legado book source
//! collections.

pub mod config;
pub mod dedupe;
pub mod error;
pub mod jobs;
pub mod models;
pub mod policy;
pub mod probe;
pub mod scoring;
pub mod storage;
pub mod utils;

pub use error::{CurateError, Result};
pub use models::{BookSource, RemovalReason, RemovedSource, Scored};

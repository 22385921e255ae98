//! dogsync - mirror Datadog configuration resources to local JSON
//!
//! The crate mirrors remote configuration objects (dashboards, monitors,
//! reference tables, ...) into a file-backed, diff-friendly snapshot and
//! can push local edits back. One trait-based resource-type contract
//! drives every REST shape through a single concurrency-bounded listing
//! engine with graceful degradation to id-only enumeration.

pub mod cli;
pub mod config;
pub mod datadog;
pub mod error;
pub mod output;
pub mod resource;
pub mod storage;

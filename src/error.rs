//! Error taxonomy for dogsync
//!
//! Every failure surfaced by the core carries enough context (resource-type
//! path, id, or file path) to diagnose without re-running at a higher
//! verbosity.

use std::path::PathBuf;

/// Errors produced by the resource, storage, and transport layers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Non-success response or transport failure on a remote call.
    /// Not retried at this layer.
    #[error("{method} {path} failed{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Remote {
        method: &'static str,
        path: String,
        status: Option<u16>,
        message: String,
    },

    /// No local file exists for the requested resource.
    #[error("no local file at {}", .path.display())]
    NotFound { path: PathBuf },

    /// A pagination walk failed. Recovered by the listing engine via
    /// fallback to id-only enumeration, unless the underlying failure is
    /// an authentication one.
    #[error("pagination failed for {type_path}: {source}")]
    Pagination {
        type_path: String,
        #[source]
        source: Box<Error>,
    },

    /// Canonicalization or write failure. Fatal for that single write.
    #[error("failed to write {}: {message}", .path.display())]
    Persistence { path: PathBuf, message: String },

    /// No resource type governs the given local path.
    #[error("no resource type found for {}", .path.display())]
    Lookup { path: PathBuf },
}

impl Error {
    /// True when the underlying remote failure is an authentication or
    /// authorization rejection. The listing engine refuses to downgrade
    /// these to id-only output: a 401 is not "pagination unsupported".
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Error::Remote {
                status: Some(401 | 403),
                ..
            } => true,
            Error::Pagination { source, .. } => source.is_auth_failure(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

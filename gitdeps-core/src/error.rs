use std::path::PathBuf;
use thiserror::Error;

use crate::object::ObjectHash;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure category, for callers that branch on what went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Decompression,
    Format,
    NoQualifyingAncestor,
    Io,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("object {hash} not found at {}", .path.display())]
    ObjectNotFound { hash: ObjectHash, path: PathBuf },

    #[error("ref '{0}' not found")]
    RefNotFound(String),

    #[error("not a git repository: {}", .0.display())]
    RepositoryNotFound(PathBuf),

    #[error("failed to decompress object {hash}: {source}")]
    Decompression {
        hash: ObjectHash,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed object {hash}: {reason}")]
    Format { hash: ObjectHash, reason: String },

    #[error("invalid object hash '{0}'")]
    InvalidHash(String),

    #[error("no commit at or before {cutoff} reachable from {start}")]
    NoQualifyingAncestor {
        start: ObjectHash,
        cutoff: chrono::DateTime<chrono::Utc>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ObjectNotFound { .. } | Error::RefNotFound(_) | Error::RepositoryNotFound(_) => {
                ErrorKind::NotFound
            }
            Error::Decompression { .. } => ErrorKind::Decompression,
            Error::Format { .. } | Error::InvalidHash(_) => ErrorKind::Format,
            Error::NoQualifyingAncestor { .. } => ErrorKind::NoQualifyingAncestor,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn format(hash: &ObjectHash, reason: impl Into<String>) -> Self {
        Error::Format {
            hash: hash.clone(),
            reason: reason.into(),
        }
    }
}

// top-level error for the public API

use std::{fmt, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("hub query failed for '{url}': {reason}")]
    Hub { url: String, reason: String },

    #[error("cannot list files of repository '{repo_id}': {reason}")]
    RepositoryAccess { repo_id: String, reason: String },

    #[error("download of '{file}' from '{repo_id}' failed: {reason}")]
    DownloadFailed {
        repo_id: String,
        file: String,
        reason: String,
    },

    #[error("invalid {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("{operation} failed for '{path}'")]
    FileSystem {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type SyncResult<T> = std::result::Result<T, SyncError>;

impl SyncError {
    pub fn file_system(
        operation: &'static str,
        path: impl Into<PathBuf>,
        err: impl Into<std::io::Error>,
    ) -> Self {
        Self::FileSystem {
            operation,
            path: path.into(),
            source: err.into(),
        }
    }

    pub(crate) fn download_failed(repo_id: &str, file: &str, reason: impl Into<String>) -> Self {
        Self::DownloadFailed {
            repo_id: repo_id.to_string(),
            file: file.to_string(),
            reason: reason.into(),
        }
    }
}

/// Why a single model was left out of a run.
///
/// None of these stop the batch; they are collected into the
/// [`SyncReport`](crate::SyncReport) next to the models that made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The repository file listing could not be fetched.
    RepositoryAccess(String),
    /// The listing had no `.gguf` artifact at all.
    NoSuitableArtifact,
    /// Normalizing the id left nothing usable as a config name.
    InvalidName,
    /// Another model in this run already claimed the same local name.
    NameCollision(String),
    /// The fetcher reported a failure.
    DownloadFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::RepositoryAccess(reason) => {
                write!(f, "repository not accessible: {reason}")
            }
            SkipReason::NoSuitableArtifact => write!(f, "no suitable GGUF file"),
            SkipReason::InvalidName => write!(f, "model id does not yield a usable name"),
            SkipReason::NameCollision(name) => {
                write!(f, "local name '{name}' already used in this run")
            }
            SkipReason::DownloadFailed(reason) => write!(f, "download failed: {reason}"),
        }
    }
}

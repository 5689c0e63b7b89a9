use std::path::{Path, PathBuf};

use hf_hub::api::sync::{Api, ApiBuilder, ApiError};

use super::{destination_path, Fetcher};
use crate::error::{SyncError, SyncResult};

/// Locks older than this are left over from a crashed download.
const STALE_LOCK_SECS: u64 = 7200;

/// Downloads through `hf-hub`'s blocking API into the shared Hugging Face
/// cache, then copies the blob into the destination directory.
#[derive(Debug, Clone)]
pub struct HfHubFetcher {
    hf_token: Option<String>,
    progress: bool,
}

impl HfHubFetcher {
    pub fn new(hf_token: Option<String>) -> Self {
        Self {
            hf_token,
            progress: true,
        }
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    fn api(&self) -> Result<Api, ApiError> {
        ApiBuilder::new()
            .with_progress(self.progress)
            .with_token(self.hf_token.clone())
            .build()
    }

    fn download_to_cache(&self, api: &Api, repo_id: &str, file_name: &str) -> Result<PathBuf, ApiError> {
        match api.model(repo_id.to_string()).get(file_name) {
            Ok(path) => Ok(path),
            Err(ApiError::LockAcquisition(lock_path)) if is_lock_stale(&lock_path) => {
                remove_stale_lock(&lock_path)?;
                api.model(repo_id.to_string()).get(file_name)
            }
            Err(e) => Err(e),
        }
    }
}

impl Fetcher for HfHubFetcher {
    fn fetch(&self, repo_id: &str, file_name: &str, dest_dir: &Path) -> SyncResult<PathBuf> {
        crate::info!("Downloading {file_name} from {repo_id}...");
        let api = self
            .api()
            .map_err(|e| SyncError::download_failed(repo_id, file_name, e.to_string()))?;
        let cached = self
            .download_to_cache(&api, repo_id, file_name)
            .map_err(|e| SyncError::download_failed(repo_id, file_name, e.to_string()))?;

        let destination = destination_path(dest_dir, file_name);
        crate::debug!("Copying {} to {}", cached.display(), destination.display());
        std::fs::copy(&cached, &destination)
            .map_err(|e| SyncError::file_system("copy cached model file", &destination, e))?;

        crate::info!("Successfully downloaded {file_name} to {}", dest_dir.display());
        Ok(destination)
    }
}

fn remove_stale_lock(lock_path: &Path) -> Result<(), ApiError> {
    crate::warn!("Removing stale lock {}", lock_path.display());
    std::fs::remove_file(lock_path)?;
    Ok(())
}

fn is_lock_stale(lock_path: &Path) -> bool {
    std::fs::metadata(lock_path)
        .and_then(|metadata| metadata.modified())
        .ok()
        .and_then(|modified| modified.elapsed().ok())
        .is_some_and(|age| age.as_secs() > STALE_LOCK_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_or_missing_lock_is_not_stale() {
        let tmp = tempfile::tempdir().unwrap();
        let lock = tmp.path().join("blob.lock");
        assert!(!is_lock_stale(&lock));
        std::fs::write(&lock, b"").unwrap();
        assert!(!is_lock_stale(&lock));
    }

    #[test]
    fn stale_lock_removal_reports_io_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let lock = tmp.path().join("blob.lock");
        std::fs::write(&lock, b"").unwrap();

        remove_stale_lock(&lock).unwrap();
        assert!(!lock.exists());

        let err = remove_stale_lock(&lock).unwrap_err();
        assert!(matches!(err, ApiError::IoError(_)), "{err:?}");
    }

    #[test]
    #[ignore = "downloads from huggingface.co"]
    fn simple_get() {
        let tmp = tempfile::tempdir().unwrap();
        let path = HfHubFetcher::new(None)
            .with_progress(false)
            .fetch("julien-c/dummy-unknown", "config.json", tmp.path())
            .unwrap();
        assert_eq!(path, tmp.path().join("config.json"));
        assert!(path.exists());
    }
}

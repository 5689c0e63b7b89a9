//! In-memory stand-ins for the hub and the downloader.
#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use llm_model_sync::{
    fetch::destination_path, CatalogQuery, Fetcher, ModelCatalog, ModelDescriptor, SyncError,
    SyncResult,
};

/// Serves a fixed listing; repositories without an entry fail like a private repo.
#[derive(Default)]
pub struct FakeCatalog {
    pub models: Vec<ModelDescriptor>,
    pub files: HashMap<String, Vec<String>>,
    pub queries: Arc<Mutex<Vec<CatalogQuery>>>,
    pub listed: Arc<Mutex<Vec<String>>>,
}

impl FakeCatalog {
    pub fn new(models: &[(&str, u64)]) -> Self {
        Self {
            models: models
                .iter()
                .map(|(id, downloads)| ModelDescriptor::new(*id, *downloads))
                .collect(),
            ..Default::default()
        }
    }

    pub fn with_files(mut self, repo_id: &str, files: &[&str]) -> Self {
        self.files.insert(
            repo_id.to_string(),
            files.iter().map(|f| f.to_string()).collect(),
        );
        self
    }
}

impl ModelCatalog for FakeCatalog {
    fn trending_models(&self, query: &CatalogQuery) -> SyncResult<Vec<ModelDescriptor>> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(self.models.iter().take(query.limit).cloned().collect())
    }

    fn list_repo_files(&self, repo_id: &str) -> SyncResult<Vec<String>> {
        self.listed.lock().unwrap().push(repo_id.to_string());
        self.files
            .get(repo_id)
            .cloned()
            .ok_or_else(|| SyncError::RepositoryAccess {
                repo_id: repo_id.to_string(),
                reason: "401 Unauthorized".to_string(),
            })
    }
}

/// Writes a small placeholder file instead of downloading.
#[derive(Default)]
pub struct FakeFetcher {
    pub failing: HashSet<String>,
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeFetcher {
    pub fn failing_for(mut self, repo_id: &str) -> Self {
        self.failing.insert(repo_id.to_string());
        self
    }
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, repo_id: &str, file_name: &str, dest_dir: &Path) -> SyncResult<PathBuf> {
        self.calls
            .lock()
            .unwrap()
            .push((repo_id.to_string(), file_name.to_string()));

        if self.failing.contains(repo_id) {
            return Err(SyncError::DownloadFailed {
                repo_id: repo_id.to_string(),
                file: file_name.to_string(),
                reason: "exit status: 1".to_string(),
            });
        }

        let destination = destination_path(dest_dir, file_name);
        std::fs::write(&destination, b"GGUF")
            .map_err(|e| SyncError::file_system("write fake model", &destination, e))?;
        Ok(destination)
    }
}

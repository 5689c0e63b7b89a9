//! Hub access
//! ==========
//!
//! The model hub is treated as two black-box services: a popularity-sorted
//! search and a per-repository file listing. [`ModelCatalog`] is the seam the
//! pipeline talks to; [`HubClient`] is the HTTP implementation, and tests swap
//! in an in-memory catalog.

pub mod client;

use serde::Deserialize;

pub use client::HubClient;

use crate::error::SyncResult;

/// One entry of the hub's model listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelDescriptor {
    /// `owner/name`
    pub id: String,
    #[serde(default)]
    pub downloads: u64,
}

impl ModelDescriptor {
    pub fn new<S: Into<String>>(id: S, downloads: u64) -> Self {
        Self {
            id: id.into(),
            downloads,
        }
    }
}

/// Parameters of the trending-model search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub library: String,
    pub sort: String,
    /// `-1` for descending.
    pub direction: i8,
    pub limit: usize,
}

impl CatalogQuery {
    /// Most downloaded first, filtered by library tag.
    pub fn trending<S: Into<String>>(library: S, limit: usize) -> Self {
        Self {
            library: library.into(),
            sort: "downloads".to_string(),
            direction: -1,
            limit,
        }
    }
}

pub trait ModelCatalog {
    /// Ordered as the hub returns it; callers must not re-sort.
    fn trending_models(&self, query: &CatalogQuery) -> SyncResult<Vec<ModelDescriptor>>;

    /// Paths of every file in the repository.
    fn list_repo_files(&self, repo_id: &str) -> SyncResult<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_tolerates_missing_downloads_and_extra_fields() {
        let parsed: Vec<ModelDescriptor> = serde_json::from_str(
            r#"[
                {"_id": "x", "id": "TheBloke/Mistral-7B-Instruct-v0.2-GGUF", "downloads": 1200, "likes": 3,
                 "modelId": "TheBloke/Mistral-7B-Instruct-v0.2-GGUF"},
                {"id": "bartowski/gemma-2-2b-it-GGUF"}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            vec![
                ModelDescriptor::new("TheBloke/Mistral-7B-Instruct-v0.2-GGUF", 1200),
                ModelDescriptor::new("bartowski/gemma-2-2b-it-GGUF", 0),
            ]
        );
    }

    #[test]
    fn trending_query_sorts_by_downloads_descending() {
        let query = CatalogQuery::trending("gguf", 100);
        assert_eq!(query.sort, "downloads");
        assert_eq!(query.direction, -1);
        assert_eq!(query.limit, 100);
    }
}

//! Blocking HTTP client for the Hugging Face hub API, backed by [`ureq`].
//!
//! Only two endpoints are used:
//! * `GET /api/models?filter=<library>&sort=downloads&direction=-1&limit=<n>`
//! * `GET /api/models/<owner>/<name>` whose `siblings[].rfilename` is the file listing

use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize};
use ureq::Agent;

use super::{CatalogQuery, ModelCatalog, ModelDescriptor};
use crate::{
    config::SyncConfig,
    error::{SyncError, SyncResult},
};

/// Applies to connect + read + write of each hub request.
const TIMEOUT: Duration = Duration::from_secs(60);

const USER_AGENT: &str = concat!("llm_model_sync/", env!("CARGO_PKG_VERSION"));

#[derive(Debug)]
pub struct HubClient {
    agent: Agent,
    /// e.g. `https://huggingface.co`, no trailing slash.
    endpoint: String,
    hf_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    #[serde(default)]
    siblings: Vec<RepoSibling>,
}

#[derive(Debug, Deserialize)]
struct RepoSibling {
    rfilename: String,
}

impl HubClient {
    pub fn new<S: Into<String>>(endpoint: S, hf_token: Option<String>) -> Self {
        let agent = Agent::new_with_config(
            Agent::config_builder()
                .timeout_global(Some(TIMEOUT))
                .build(),
        );
        Self {
            agent,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            hf_token,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.hub_endpoint.clone(), config.load_hf_token())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// GET + JSON decode. Errors come back as a human readable reason; the
    /// callers decide which [`SyncError`] variant they belong to.
    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, String> {
        let mut request = self.agent.get(url).header("User-Agent", USER_AGENT);
        for (key, value) in query {
            request = request.query(*key, value);
        }
        if let Some(token) = &self.hf_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        crate::debug!("GET {url} {query:?}");
        match request.call() {
            Ok(mut resp) => resp
                .body_mut()
                .read_json::<T>()
                .map_err(|e| format!("invalid response body: {e}")),
            Err(ureq::Error::StatusCode(code)) => Err(format!("HTTP {code}")),
            Err(ureq::Error::Timeout(_)) => Err(format!("timed out after {TIMEOUT:?}")),
            Err(other) => Err(other.to_string()),
        }
    }
}

impl ModelCatalog for HubClient {
    fn trending_models(&self, query: &CatalogQuery) -> SyncResult<Vec<ModelDescriptor>> {
        let url = format!("{}/api/models", self.endpoint);
        let params = [
            ("filter", query.library.clone()),
            ("sort", query.sort.clone()),
            ("direction", query.direction.to_string()),
            ("limit", query.limit.to_string()),
        ];
        let models: Vec<ModelDescriptor> = self
            .get_json(&url, &params)
            .map_err(|reason| SyncError::Hub {
                url: url.clone(),
                reason,
            })?;
        crate::debug!("Hub returned {} models", models.len());
        Ok(models)
    }

    fn list_repo_files(&self, repo_id: &str) -> SyncResult<Vec<String>> {
        let url = format!("{}/api/models/{}", self.endpoint, repo_id);
        let info: RepoInfo =
            self.get_json(&url, &[])
                .map_err(|reason| SyncError::RepositoryAccess {
                    repo_id: repo_id.to_string(),
                    reason,
                })?;
        Ok(info
            .siblings
            .into_iter()
            .map(|sibling| sibling.rfilename)
            .collect())
    }
}

//! Run configuration
//! =================
//!
//! Every knob the pipeline reads lives on [`SyncConfig`]. It is built once
//! (from the CLI or fluently in code) and passed by reference through the
//! run; nothing is read from process-wide state afterwards.
//!
//! ```rust
//! use llm_model_sync::SyncConfig;
//!
//! let config = SyncConfig::builder()
//!     .num_models(3)
//!     .small_only(true)
//!     .categories(vec!["llama".to_string(), "mistral".to_string()])
//!     .output_dir("/tmp/models")
//!     .config_dir("/tmp/config")
//!     .build();
//! assert!(config.validate().is_ok());
//! ```

use std::path::PathBuf;

use dotenvy::dotenv;

use crate::error::{SyncError, SyncResult};

pub const DEFAULT_NUM_MODELS: usize = 5;
pub const DEFAULT_MODELS_DIR: &str = "/opt/localai/models";
pub const DEFAULT_CONFIG_DIR: &str = "/opt/localai/config";
pub const DEFAULT_HUB_ENDPOINT: &str = "https://huggingface.co";
pub const DEFAULT_SEARCH_LIMIT: usize = 100;
pub const DEFAULT_LIBRARY: &str = "gguf";
pub const DEFAULT_HF_CLI: &str = "huggingface-cli";
pub const DEFAULT_HF_TOKEN_ENV_VAR: &str = "HUGGING_FACE_TOKEN";

/// Which tool performs the byte transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Downloader {
    /// Shell out to `huggingface-cli download`.
    #[default]
    Cli,
    /// Download in-process through the `hf-hub` cache.
    HfHub,
}

#[derive(Debug, Clone, bon::Builder)]
#[builder(on(PathBuf, into))]
pub struct SyncConfig {
    /// Upper bound on the number of candidates taken from the hub listing.
    #[builder(default = DEFAULT_NUM_MODELS)]
    pub num_models: usize,

    /// Keep only ids carrying a small parameter-count marker (1b–8b).
    #[builder(default)]
    pub small_only: bool,

    /// Case-insensitive substrings; an id must contain one of them. Empty keeps all.
    #[builder(default)]
    pub categories: Vec<String>,

    /// Where model files are downloaded to.
    #[builder(default = PathBuf::from(DEFAULT_MODELS_DIR))]
    pub output_dir: PathBuf,

    /// Where `<name>.yaml` service configs are written.
    #[builder(default = PathBuf::from(DEFAULT_CONFIG_DIR))]
    pub config_dir: PathBuf,

    /// Write `gpt-3.5-turbo.yaml` / `gpt-4.yaml` aliases after the run.
    #[builder(default)]
    pub create_aliases: bool,

    /// Stop after printing the candidate list.
    #[builder(default)]
    pub list_only: bool,

    #[builder(default = DEFAULT_HUB_ENDPOINT.to_string())]
    pub hub_endpoint: String,

    /// How many descriptors are requested from the hub before local filtering.
    /// Raised to `num_models` when smaller, see [`SyncConfig::query_limit`].
    #[builder(default = DEFAULT_SEARCH_LIMIT)]
    pub search_limit: usize,

    /// Library tag used to filter the hub listing.
    #[builder(default = DEFAULT_LIBRARY.to_string())]
    pub library: String,

    #[builder(default)]
    pub downloader: Downloader,

    /// Program invoked by [`Downloader::Cli`].
    #[builder(default = DEFAULT_HF_CLI.to_string())]
    pub hf_cli_program: String,

    pub hf_token: Option<String>,

    #[builder(default = DEFAULT_HF_TOKEN_ENV_VAR.to_string())]
    pub hf_token_env_var: String,

    /// Overrides CPU detection when computing the thread count.
    pub cpu_cores: Option<usize>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SyncConfig {
    pub fn validate(&self) -> SyncResult<()> {
        if self.num_models == 0 {
            return Err(SyncError::InvalidConfig {
                field: "num_models",
                reason: "must be at least 1".into(),
            });
        }
        if self.hub_endpoint.trim().is_empty() {
            return Err(SyncError::InvalidConfig {
                field: "hub_endpoint",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Listing size actually requested from the hub; never below `num_models`.
    pub fn query_limit(&self) -> usize {
        self.search_limit.max(self.num_models)
    }

    /// Explicit token first, then the configured env var (after loading `.env`).
    pub fn load_hf_token(&self) -> Option<String> {
        if let Some(hf_token) = &self.hf_token {
            crate::trace!("Using hf_token from parameter");
            return Some(hf_token.to_owned());
        }

        dotenv().ok();

        match dotenvy::var(&self.hf_token_env_var) {
            Ok(hf_token) if !hf_token.trim().is_empty() => Some(hf_token),
            _ => {
                crate::trace!(
                    "{} not found in dotenv, nor was it set manually",
                    self.hf_token_env_var
                );
                None
            }
        }
    }
}

/// Splits a `--include-categories` value: comma separated, trimmed, empties dropped.
pub fn parse_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn defaults_match_the_localai_layout() {
        let config = SyncConfig::default();
        assert_eq!(config.num_models, 5);
        assert_eq!(config.output_dir, PathBuf::from("/opt/localai/models"));
        assert_eq!(config.config_dir, PathBuf::from("/opt/localai/config"));
        assert_eq!(config.search_limit, 100);
        assert_eq!(config.library, "gguf");
        assert_eq!(config.downloader, Downloader::Cli);
        assert!(config.categories.is_empty());
        assert!(!config.small_only && !config.list_only && !config.create_aliases);
    }

    #[test]
    fn categories_are_trimmed_and_empties_dropped() {
        assert_eq!(
            parse_categories(" llama, mistral,,gemma ,"),
            vec!["llama", "mistral", "gemma"]
        );
        assert!(parse_categories(" , ").is_empty());
    }

    #[test]
    fn zero_models_is_rejected() {
        let err = SyncConfig::builder().num_models(0).build().validate();
        assert!(matches!(
            err,
            Err(SyncError::InvalidConfig {
                field: "num_models",
                ..
            })
        ));
    }

    #[test]
    fn more_models_than_search_limit_is_valid() {
        let config = SyncConfig::builder()
            .num_models(150)
            .search_limit(100)
            .build();
        assert!(config.validate().is_ok());
        assert_eq!(config.query_limit(), 150);
        assert_eq!(SyncConfig::default().query_limit(), 100);
    }

    #[test]
    #[serial]
    fn explicit_token_wins_over_env() {
        std::env::set_var("LLM_MODEL_SYNC_TEST_TOKEN", "from-env");
        let config = SyncConfig::builder()
            .hf_token("explicit".to_string())
            .hf_token_env_var("LLM_MODEL_SYNC_TEST_TOKEN".to_string())
            .build();
        assert_eq!(config.load_hf_token().as_deref(), Some("explicit"));
        std::env::remove_var("LLM_MODEL_SYNC_TEST_TOKEN");
    }

    #[test]
    #[serial]
    fn token_falls_back_to_env_var() {
        std::env::set_var("LLM_MODEL_SYNC_TEST_TOKEN", "from-env");
        let config = SyncConfig::builder()
            .hf_token_env_var("LLM_MODEL_SYNC_TEST_TOKEN".to_string())
            .build();
        assert_eq!(config.load_hf_token().as_deref(), Some("from-env"));
        std::env::remove_var("LLM_MODEL_SYNC_TEST_TOKEN");
        assert_eq!(config.load_hf_token(), None);
    }
}

//! Fetchers
//! ========
//!
//! Moving the bytes is delegated: [`HfCliFetcher`] shells out to
//! `huggingface-cli`, [`HfHubFetcher`] goes through the `hf-hub` cache. Both
//! leave the file at [`destination_path`]. Skipping files that are already
//! present is the pipeline's job, so a fetcher always downloads when called.

pub mod cli;
pub mod hub;

use std::path::{Path, PathBuf};

pub use cli::HfCliFetcher;
pub use hub::HfHubFetcher;

use crate::{
    config::{Downloader, SyncConfig},
    error::SyncResult,
};

pub trait Fetcher {
    /// Downloads `file_name` of `repo_id` into `dest_dir`, returning the local path.
    fn fetch(&self, repo_id: &str, file_name: &str, dest_dir: &Path) -> SyncResult<PathBuf>;
}

/// `dest_dir/<basename of file_name>`; repository sub-folders are flattened.
pub fn destination_path(dest_dir: &Path, file_name: &str) -> PathBuf {
    dest_dir.join(file_base_name(file_name))
}

/// Last path component of a repository file path.
pub fn file_base_name(file_name: &str) -> &str {
    Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_name)
}

pub fn fetcher_for(config: &SyncConfig) -> Box<dyn Fetcher> {
    match config.downloader {
        Downloader::Cli => Box::new(HfCliFetcher::new(
            config.hf_cli_program.clone(),
            config.load_hf_token(),
        )),
        Downloader::HfHub => Box::new(HfHubFetcher::new(config.load_hf_token())),
    }
}

use crate::{error::SkipReason, hub::ModelCatalog};

pub const ARTIFACT_EXTENSION: &str = ".gguf";

/// Best size/quality trade-off for CPU inference.
pub const PRIMARY_QUANTIZATION: &str = "Q4_K_M";

/// Tried in order when no [`PRIMARY_QUANTIZATION`] file exists.
pub const FALLBACK_QUANTIZATIONS: [&str; 6] = ["Q4_0", "Q4_K", "Q3_K", "Q5_K", "Q2_K", "Q8_0"];

/// Picks the file to download from a repository listing.
///
/// Only `.gguf` files are considered. The primary quantization wins, then the
/// fallbacks in order, then any `.gguf` file; within a tier the
/// lexicographically smallest name is taken so the choice is deterministic.
pub fn select_artifact<S: AsRef<str>>(files: &[S]) -> Option<&str> {
    let archives: Vec<&str> = files
        .iter()
        .map(|f| f.as_ref())
        .filter(|f| f.ends_with(ARTIFACT_EXTENSION))
        .collect();

    std::iter::once(PRIMARY_QUANTIZATION)
        .chain(FALLBACK_QUANTIZATIONS)
        .find_map(|marker| {
            archives
                .iter()
                .copied()
                .filter(|f| f.contains(marker))
                .min()
        })
        .or_else(|| archives.iter().copied().min())
}

/// Lists `repo_id` and selects its artifact. A listing failure is logged and
/// becomes a skip, never an error for the whole run.
pub fn resolve_artifact(catalog: &dyn ModelCatalog, repo_id: &str) -> Result<String, SkipReason> {
    let files = match catalog.list_repo_files(repo_id) {
        Ok(files) => files,
        Err(e) => {
            crate::warn!("Error accessing repository {repo_id}: {e}");
            return Err(SkipReason::RepositoryAccess(e.to_string()));
        }
    };

    match select_artifact(&files) {
        Some(file) => {
            crate::debug!("Selected {file} from {} files in {repo_id}", files.len());
            Ok(file.to_string())
        }
        None => {
            crate::warn!("No suitable GGUF file found for {repo_id}, skipping.");
            Err(SkipReason::NoSuitableArtifact)
        }
    }
}

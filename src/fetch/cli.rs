use std::{
    path::{Path, PathBuf},
    process::Command,
};

use super::{destination_path, Fetcher};
use crate::error::{SyncError, SyncResult};

/// Runs `huggingface-cli download <repo> <file> --local-dir <dir>`.
///
/// The CLI keeps the repository's folder layout under `--local-dir`; a file
/// that came from a sub-folder is moved up so it sits at
/// [`destination_path`].
#[derive(Debug, Clone)]
pub struct HfCliFetcher {
    program: String,
    hf_token: Option<String>,
}

impl HfCliFetcher {
    pub fn new<S: Into<String>>(program: S, hf_token: Option<String>) -> Self {
        Self {
            program: program.into(),
            hf_token,
        }
    }

    fn command(&self, repo_id: &str, file_name: &str, dest_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("download")
            .arg(repo_id)
            .arg(file_name)
            .arg("--local-dir")
            .arg(dest_dir)
            .arg("--local-dir-use-symlinks")
            .arg("False");
        if let Some(token) = &self.hf_token {
            cmd.env("HF_TOKEN", token);
        }
        cmd
    }
}

impl Fetcher for HfCliFetcher {
    fn fetch(&self, repo_id: &str, file_name: &str, dest_dir: &Path) -> SyncResult<PathBuf> {
        crate::info!("Downloading {file_name} from {repo_id}...");
        let mut cmd = self.command(repo_id, file_name, dest_dir);
        // Not `{cmd:?}`: that would print HF_TOKEN.
        crate::trace!(
            "Running {} {:?}",
            self.program,
            cmd.get_args().collect::<Vec<_>>()
        );

        let status = cmd.status().map_err(|e| {
            SyncError::download_failed(
                repo_id,
                file_name,
                format!("could not run `{}`: {e}", self.program),
            )
        })?;
        if !status.success() {
            return Err(SyncError::download_failed(
                repo_id,
                file_name,
                format!("`{}` exited with {status}", self.program),
            ));
        }

        let destination = destination_path(dest_dir, file_name);
        let nested = dest_dir.join(file_name);
        if nested != destination && nested.is_file() {
            std::fs::rename(&nested, &destination)
                .map_err(|e| SyncError::file_system("move downloaded file", &nested, e))?;
        }
        if !destination.exists() {
            crate::warn!(
                "`{}` succeeded but {} is missing",
                self.program,
                destination.display()
            );
        }

        crate::info!("Successfully downloaded {file_name} to {}", dest_dir.display());
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_carries_local_dir_and_symlink_flags() {
        let fetcher = HfCliFetcher::new("huggingface-cli", Some("hf_secret".into()));
        let cmd = fetcher.command(
            "TheBloke/phi-2-GGUF",
            "phi-2.Q4_K_M.gguf",
            Path::new("/opt/localai/models"),
        );
        let args: Vec<_> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "download",
                "TheBloke/phi-2-GGUF",
                "phi-2.Q4_K_M.gguf",
                "--local-dir",
                "/opt/localai/models",
                "--local-dir-use-symlinks",
                "False",
            ]
        );
        assert!(cmd
            .get_envs()
            .any(|(k, v)| k == "HF_TOKEN" && v.is_some_and(|v| v == "hf_secret")));
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_returns_flattened_destination() {
        let tmp = tempfile::tempdir().unwrap();
        let path = HfCliFetcher::new("true", None)
            .fetch("org/model-GGUF", "sub/model.Q4_K_M.gguf", tmp.path())
            .unwrap();
        assert_eq!(path, tmp.path().join("model.Q4_K_M.gguf"));
    }

    #[cfg(unix)]
    #[test]
    fn nested_download_is_moved_to_destination() {
        let tmp = tempfile::tempdir().unwrap();
        // Stand in for what the CLI would have written.
        std::fs::create_dir_all(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("sub/model.Q4_K_M.gguf"), b"GGUF").unwrap();

        let path = HfCliFetcher::new("true", None)
            .fetch("org/model-GGUF", "sub/model.Q4_K_M.gguf", tmp.path())
            .unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"GGUF");
        assert!(!tmp.path().join("sub/model.Q4_K_M.gguf").exists());
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_download_failed() {
        let tmp = tempfile::tempdir().unwrap();
        let err = HfCliFetcher::new("false", None)
            .fetch("org/model-GGUF", "model.gguf", tmp.path())
            .unwrap_err();
        assert!(matches!(err, SyncError::DownloadFailed { ref file, .. } if file == "model.gguf"));
    }

    #[test]
    fn missing_program_is_download_failed() {
        let tmp = tempfile::tempdir().unwrap();
        let err = HfCliFetcher::new("definitely-not-a-real-hf-cli", None)
            .fetch("org/model-GGUF", "model.gguf", tmp.path())
            .unwrap_err();
        assert!(err.to_string().contains("could not run"), "{err}");
    }
}

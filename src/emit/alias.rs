//! OpenAI-style aliases: copies of an existing model config published under
//! the name an OpenAI client would ask for.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use super::config::{config_file_name, DEFAULT_CONTEXT_SIZE};
use crate::error::{SyncError, SyncResult};

pub const ALIAS_CONTEXT_SIZE: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasSlot {
    pub alias: &'static str,
    /// The first downloaded name containing any of these is the source.
    pub patterns: &'static [&'static str],
    /// Replaces the default context size in the copy.
    pub context_size: Option<u32>,
}

pub const GPT_35_TURBO: AliasSlot = AliasSlot {
    alias: "gpt-3.5-turbo",
    patterns: &["phi", "gemma-2", "mistral", "llama-3-1b"],
    context_size: None,
};

pub const GPT_4: AliasSlot = AliasSlot {
    alias: "gpt-4",
    patterns: &["llama-3-8", "mistral-7", "llama-3.1-8"],
    context_size: Some(ALIAS_CONTEXT_SIZE),
};

pub const ALIAS_SLOTS: [AliasSlot; 2] = [GPT_35_TURBO, GPT_4];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasOutcome {
    Created {
        alias: &'static str,
        source: String,
        path: PathBuf,
    },
    NoCandidate {
        alias: &'static str,
    },
    SourceMissing {
        alias: &'static str,
        source: String,
    },
}

impl fmt::Display for AliasOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasOutcome::Created { alias, source, .. } => {
                write!(f, "{alias} -> {source}")
            }
            AliasOutcome::NoCandidate { alias } => {
                write!(f, "{alias}: no matching model downloaded")
            }
            AliasOutcome::SourceMissing { alias, source } => {
                write!(f, "{alias}: source config {} missing", config_file_name(source))
            }
        }
    }
}

impl AliasSlot {
    pub fn pick<'a>(&self, names: &'a [String]) -> Option<&'a str> {
        names
            .iter()
            .find(|name| {
                let name = name.to_lowercase();
                self.patterns.iter().any(|p| name.contains(p))
            })
            .map(String::as_str)
    }

    /// Rewrites the `name: <source>` line and, if set, the context size.
    pub fn rewrite(&self, config: &str, source: &str) -> String {
        let source_line = format!("name: {source}");
        let mut out: String = config
            .split_inclusive('\n')
            .map(|line| {
                if line.trim_end_matches(|c| c == '\r' || c == '\n') == source_line {
                    let ending = &line[source_line.len()..];
                    format!("name: {}{ending}", self.alias)
                } else {
                    line.to_string()
                }
            })
            .collect();

        if let Some(context_size) = self.context_size {
            out = out.replace(
                &format!("context_size: {DEFAULT_CONTEXT_SIZE}"),
                &format!("context_size: {context_size}"),
            );
        }
        out
    }
}

/// Writes one alias config if a source model matches.
pub fn create_alias(config_dir: &Path, slot: &AliasSlot, names: &[String]) -> SyncResult<AliasOutcome> {
    let Some(source) = slot.pick(names) else {
        crate::info!("No downloaded model suits the {} alias", slot.alias);
        return Ok(AliasOutcome::NoCandidate { alias: slot.alias });
    };

    let source_path = config_dir.join(config_file_name(source));
    let config = match std::fs::read_to_string(&source_path) {
        Ok(config) => config,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            crate::warn!(
                "Config {} for the {} alias is missing, skipping",
                source_path.display(),
                slot.alias
            );
            return Ok(AliasOutcome::SourceMissing {
                alias: slot.alias,
                source: source.to_string(),
            });
        }
        Err(e) => return Err(SyncError::file_system("read alias source config", source_path, e)),
    };

    let alias_path = config_dir.join(config_file_name(slot.alias));
    std::fs::write(&alias_path, slot.rewrite(&config, source))
        .map_err(|e| SyncError::file_system("write alias config", &alias_path, e))?;
    crate::info!("Created {} alias pointing to {source}", slot.alias);

    Ok(AliasOutcome::Created {
        alias: slot.alias,
        source: source.to_string(),
        path: alias_path,
    })
}

pub fn create_aliases(config_dir: &Path, names: &[String]) -> SyncResult<Vec<AliasOutcome>> {
    if names.is_empty() {
        crate::info!("No models available for creating aliases.");
        return Ok(Vec::new());
    }
    crate::info!("Creating OpenAI-compatible aliases...");
    ALIAS_SLOTS
        .iter()
        .map(|slot| create_alias(config_dir, slot, names))
        .collect()
}

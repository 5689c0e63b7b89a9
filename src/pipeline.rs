//! Pipeline
//! ========
//!
//! ```text
//! catalog query ─→ candidate filter ─→ per candidate:
//!                                        resolve artifact ─→ local name ─→ fetch ─→ write config
//!                                      then (optional) aliases
//! ```
//!
//! Strictly sequential; nothing reads back from a later stage. Per-model
//! failures become a [`SkipReason`] in the [`SyncReport`]. Only directory
//! setup, the catalog query, and config writes can fail the run.

use std::{
    collections::HashSet,
    fmt::{self, Write},
    path::PathBuf,
};

use indenter::indented;

use crate::{
    config::SyncConfig,
    emit::{
        create_aliases, detect_cpu_cores, recommended_threads, write_service_config,
        AliasOutcome, ServiceConfig,
    },
    error::{SkipReason, SyncError, SyncResult},
    fetch::{destination_path, fetcher_for, file_base_name, Fetcher},
    hub::{CatalogQuery, HubClient, ModelCatalog, ModelDescriptor},
    select::{local_model_name, resolve_artifact, CandidateFilter},
};

/// A model that made it all the way to a written config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedModel {
    pub model_id: String,
    pub name: String,
    /// Path inside the repository.
    pub file_name: String,
    pub local_path: PathBuf,
    pub config_path: PathBuf,
    /// The file was already on disk, so no download ran.
    pub already_present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOutcome {
    pub model: ModelDescriptor,
    pub result: Result<DownloadedModel, SkipReason>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub candidates: Vec<ModelDescriptor>,
    pub outcomes: Vec<ModelOutcome>,
    pub aliases: Vec<AliasOutcome>,
    pub list_only: bool,
}

impl SyncReport {
    pub fn downloaded(&self) -> impl Iterator<Item = &DownloadedModel> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn downloaded_names(&self) -> Vec<String> {
        self.downloaded().map(|m| m.name.clone()).collect()
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&ModelDescriptor, &SkipReason)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|reason| (&o.model, reason)))
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        if self.list_only {
            return writeln!(f, "- Listed {} models (nothing downloaded)", self.candidates.len());
        }

        let names = self.downloaded_names();
        writeln!(f, "- Downloaded {} models", names.len())?;
        if !names.is_empty() {
            writeln!(f, "- Models:")?;
            for name in &names {
                writeln!(indented(f).with_str("  "), "- {name}")?;
            }
        }

        let skipped: Vec<_> = self.skipped().collect();
        if !skipped.is_empty() {
            writeln!(f, "- Skipped:")?;
            for (model, reason) in skipped {
                writeln!(indented(f).with_str("  "), "- {}: {reason}", model.id)?;
            }
        }

        if !self.aliases.is_empty() {
            writeln!(f, "- Aliases:")?;
            for alias in &self.aliases {
                writeln!(indented(f).with_str("  "), "- {alias}")?;
            }
        }
        Ok(())
    }
}

pub struct ModelSync {
    config: SyncConfig,
    catalog: Box<dyn ModelCatalog>,
    fetcher: Box<dyn Fetcher>,
}

impl ModelSync {
    pub fn new(
        config: SyncConfig,
        catalog: Box<dyn ModelCatalog>,
        fetcher: Box<dyn Fetcher>,
    ) -> Self {
        Self {
            config,
            catalog,
            fetcher,
        }
    }

    /// Hub client and fetcher as the config asks for.
    pub fn from_config(config: SyncConfig) -> SyncResult<Self> {
        config.validate()?;
        let catalog = Box::new(HubClient::from_config(&config));
        let fetcher = fetcher_for(&config);
        Ok(Self::new(config, catalog, fetcher))
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn prepare_directories(&self) -> SyncResult<()> {
        for dir in [&self.config.output_dir, &self.config.config_dir] {
            std::fs::create_dir_all(dir)
                .map_err(|e| SyncError::file_system("create directory", dir, e))?;
        }
        Ok(())
    }

    /// Queries the hub and narrows the listing to at most `num_models` candidates.
    pub fn discover(&self) -> SyncResult<Vec<ModelDescriptor>> {
        crate::info!("Searching for trending {} models...", self.config.library);
        let query = CatalogQuery::trending(self.config.library.clone(), self.config.query_limit());
        let models = self.catalog.trending_models(&query)?;

        let filter = CandidateFilter::new(
            self.config.num_models,
            &self.config.categories,
            self.config.small_only,
        );
        let candidates = filter.apply(&models);
        crate::debug!(
            "{} of {} hub models qualify",
            candidates.len(),
            models.len()
        );
        Ok(candidates)
    }

    /// Resolves, downloads, and configures each candidate in order.
    pub fn sync(&self, candidates: &[ModelDescriptor]) -> SyncResult<SyncReport> {
        let cores = self.config.cpu_cores.unwrap_or_else(detect_cpu_cores);
        let threads = recommended_threads(cores);
        crate::debug!("Using {threads} threads per model ({cores} cores)");

        let mut used_names = HashSet::new();
        let mut outcomes = Vec::with_capacity(candidates.len());
        for model in candidates {
            let result = self.sync_model(model, threads, &mut used_names)?;
            outcomes.push(ModelOutcome {
                model: model.clone(),
                result,
            });
        }

        let mut report = SyncReport {
            candidates: candidates.to_vec(),
            outcomes,
            aliases: Vec::new(),
            list_only: false,
        };

        let names = report.downloaded_names();
        if self.config.create_aliases && !names.is_empty() {
            report.aliases = create_aliases(&self.config.config_dir, &names)?;
        }
        Ok(report)
    }

    /// Validate, prepare, discover, and (unless list-only) sync.
    pub fn run(&self) -> SyncResult<SyncReport> {
        self.config.validate()?;
        self.prepare_directories()?;
        let candidates = self.discover()?;
        if self.config.list_only {
            return Ok(SyncReport {
                candidates,
                list_only: true,
                ..Default::default()
            });
        }
        self.sync(&candidates)
    }

    /// `Ok(Err(_))` is a skipped model; `Err(_)` aborts the run.
    fn sync_model(
        &self,
        model: &ModelDescriptor,
        threads: usize,
        used_names: &mut HashSet<String>,
    ) -> SyncResult<Result<DownloadedModel, SkipReason>> {
        let file_name = match resolve_artifact(self.catalog.as_ref(), &model.id) {
            Ok(file_name) => file_name,
            Err(reason) => return Ok(Err(reason)),
        };

        let Some(name) = local_model_name(&model.id) else {
            crate::warn!("Cannot derive a local name from {}, skipping.", model.id);
            return Ok(Err(SkipReason::InvalidName));
        };
        if used_names.contains(&name) {
            crate::warn!(
                "{} maps to '{name}', which another model already uses in this run; skipping.",
                model.id
            );
            return Ok(Err(SkipReason::NameCollision(name)));
        }

        let output_dir = &self.config.output_dir;
        let destination = destination_path(output_dir, &file_name);
        let already_present = destination.exists();
        let local_path = if already_present {
            crate::info!(
                "Model file {} already exists, skipping download.",
                file_base_name(&file_name)
            );
            destination
        } else {
            match self.fetcher.fetch(&model.id, &file_name, output_dir) {
                Ok(path) => path,
                Err(e) => {
                    crate::error!("Error downloading model {}/{file_name}: {e}", model.id);
                    return Ok(Err(SkipReason::DownloadFailed(e.to_string())));
                }
            }
        };

        let service_config =
            ServiceConfig::for_model(name.clone(), file_base_name(&file_name), threads);
        let config_path = write_service_config(&self.config.config_dir, &service_config)?;
        used_names.insert(name.clone());

        Ok(Ok(DownloadedModel {
            model_id: model.id.clone(),
            name,
            file_name,
            local_path,
            config_path,
            already_present,
        }))
    }
}

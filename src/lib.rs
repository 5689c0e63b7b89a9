//! llm_model_sync
//! ==============
//!
//! Finds the most downloaded GGUF models on the Hugging Face hub, picks the
//! best CPU-friendly quantization of each, downloads it, and writes a LocalAI
//! model definition next to it. Optionally publishes `gpt-3.5-turbo` and
//! `gpt-4` aliases so OpenAI clients can talk to the local models unchanged.
//!
//! ```rust,no_run
//! use llm_model_sync::{ModelSync, SyncConfig};
//!
//! # fn main() -> llm_model_sync::SyncResult<()> {
//! let config = SyncConfig::builder()
//!     .num_models(3)
//!     .small_only(true)
//!     .output_dir("/opt/localai/models")
//!     .config_dir("/opt/localai/config")
//!     .create_aliases(true)
//!     .build();
//!
//! let report = ModelSync::from_config(config)?.run()?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```
//!
//! The hub and the downloader sit behind the [`ModelCatalog`] and [`Fetcher`]
//! traits; [`ModelSync::new`] accepts any implementation of either.

pub mod config;
pub mod emit;
pub mod error;
pub mod fetch;
pub mod hub;
pub mod logging;
pub mod pipeline;
pub mod select;

pub use config::{parse_categories, Downloader, SyncConfig};
pub use emit::{AliasOutcome, ServiceConfig};
pub use error::{SkipReason, SyncError, SyncResult};
pub use fetch::{Fetcher, HfCliFetcher, HfHubFetcher};
pub use hub::{CatalogQuery, HubClient, ModelCatalog, ModelDescriptor};
pub use logging::LoggingConfig;
pub use pipeline::{DownloadedModel, ModelOutcome, ModelSync, SyncReport};

#[allow(unused_imports)]
pub(crate) use tracing::{debug, error, info, span, trace, warn, Level};

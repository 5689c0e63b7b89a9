//! llm-model-sync: keep a LocalAI install stocked with trending GGUF models
//! ======================================================================
//!
//! ```bash
//! llm-model-sync --num-models 3 --small-only --create-aliases
//! llm-model-sync --list-only --include-categories llama,mistral
//! ```
//!
//! | Flag                          | Default                  |
//! |-------------------------------|--------------------------|
//! | `--num-models <N>`            | `5`                      |
//! | `--small-only`                | off                      |
//! | `--output-dir <PATH>`         | `/opt/localai/models`    |
//! | `--config-dir <PATH>`         | `/opt/localai/config`    |
//! | `--create-aliases`            | off                      |
//! | `--list-only`                 | off                      |
//! | `--include-categories <LIST>` | _(all)_                  |
//! | `--hub-endpoint <URL>`        | `https://huggingface.co` |
//! | `--downloader <KIND>`         | `cli` (or `hf-hub`)      |
//!
//! ## Exit codes
//! * `0`: finished (individual models may have been skipped)
//! * `1`: fatal error (directories, hub query, config write)
//! * `2`: argument parsing error (from **clap**)

use std::{path::PathBuf, process::ExitCode};

use llm_model_sync::{
    config::{
        DEFAULT_CONFIG_DIR, DEFAULT_HF_CLI, DEFAULT_HUB_ENDPOINT, DEFAULT_MODELS_DIR,
        DEFAULT_NUM_MODELS, DEFAULT_SEARCH_LIMIT,
    },
    *,
};

const RESTART_HINT: &str = "cd /opt/localai && docker-compose restart localai";

#[derive(Debug, clap::Parser)]
#[command(name = "llm-model-sync", version, about)]
struct Cli {
    /// Maximum number of models to download.
    #[arg(long, default_value_t = DEFAULT_NUM_MODELS)]
    num_models: usize,

    /// Only take models with a 1b–8b size marker in their id.
    #[arg(long)]
    small_only: bool,

    /// Directory the model files are downloaded to.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_MODELS_DIR)]
    output_dir: PathBuf,

    /// Directory the LocalAI model configs are written to.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_DIR)]
    config_dir: PathBuf,

    /// Also write gpt-3.5-turbo / gpt-4 alias configs.
    #[arg(long)]
    create_aliases: bool,

    /// Print the candidate list and exit without downloading.
    #[arg(long)]
    list_only: bool,

    /// Comma separated substrings; a model id must contain one of them.
    #[arg(long, value_name = "LIST")]
    include_categories: Option<String>,

    #[arg(long, value_name = "URL", default_value = DEFAULT_HUB_ENDPOINT)]
    hub_endpoint: String,

    /// How many models to request from the hub before filtering.
    #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    search_limit: usize,

    #[arg(long, value_enum, default_value_t = Downloader::Cli)]
    downloader: Downloader,

    /// Program used by the `cli` downloader.
    #[arg(long = "hf-cli", value_name = "PROGRAM", default_value = DEFAULT_HF_CLI)]
    hf_cli_program: String,

    /// Hugging Face token; falls back to HUGGING_FACE_TOKEN (or a .env file).
    #[arg(long)]
    hf_token: Option<String>,

    /// Also write rolling log files here.
    #[arg(long, value_name = "PATH")]
    log_dir: Option<PathBuf>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// No log output, only the listing and summary.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn sync_config(&self) -> SyncConfig {
        let categories = self
            .include_categories
            .as_deref()
            .map(parse_categories)
            .unwrap_or_default();

        SyncConfig::builder()
            .num_models(self.num_models)
            .small_only(self.small_only)
            .categories(categories)
            .output_dir(self.output_dir.clone())
            .config_dir(self.config_dir.clone())
            .create_aliases(self.create_aliases)
            .list_only(self.list_only)
            .hub_endpoint(self.hub_endpoint.clone())
            .search_limit(self.search_limit)
            .downloader(self.downloader)
            .hf_cli_program(self.hf_cli_program.clone())
            .maybe_hf_token(self.hf_token.clone())
            .build()
    }
}

fn main() -> ExitCode {
    let cli = <Cli as clap::Parser>::parse();

    let mut logging = LoggingConfig::new()
        .verbosity(cli.verbose)
        .logging_enabled(!cli.quiet)
        .log_dir(cli.log_dir.clone());
    if let Err(e) = logging.load_logger() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> SyncResult<()> {
    let report = ModelSync::from_config(cli.sync_config())?.run()?;

    println!("Found {} models:", report.candidates.len());
    for (i, model) in report.candidates.iter().enumerate() {
        println!("{}. {} (Downloads: {})", i + 1, model.id, model.downloads);
    }

    if report.list_only {
        println!("List-only mode - exiting without downloading.");
        return Ok(());
    }

    println!();
    print!("{report}");
    println!();
    println!("Restart LocalAI to pick up the new models:");
    println!("  {RESTART_HINT}");
    Ok(())
}

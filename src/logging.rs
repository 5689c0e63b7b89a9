use std::{fs::create_dir_all, path::PathBuf};

use tracing_subscriber::layer::SubscriberExt;

use crate::error::{SyncError, SyncResult};

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: tracing::Level,
    pub logging_enabled: bool,
    pub logger_name: String,
    /// When set, an hourly rolling log file is written here as well.
    pub log_dir: Option<PathBuf>,
    pub _tracing_guard: Option<std::sync::Arc<tracing::subscriber::DefaultGuard>>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            logging_enabled: true,
            logger_name: "llm_model_sync".to_string(),
            log_dir: None,
            _tracing_guard: None,
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Default::default()
    }

    /// Maps the CLI `-v` count onto a level: 0 → INFO, 1 → DEBUG, 2+ → TRACE.
    pub fn verbosity(mut self, count: u8) -> Self {
        self.level = match count {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };
        self
    }

    pub fn logging_enabled(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    pub fn log_dir(mut self, log_dir: Option<PathBuf>) -> Self {
        self.log_dir = log_dir;
        self
    }

    /// Installs the subscriber for the current thread. It stays active for as
    /// long as this config (and so the guard) is alive.
    pub fn load_logger(&mut self) -> SyncResult<()> {
        self._tracing_guard = if self.logging_enabled {
            Some(std::sync::Arc::new(self.create_logger()?))
        } else {
            None
        };
        Ok(())
    }

    fn create_logger(&self) -> SyncResult<tracing::subscriber::DefaultGuard> {
        let filter = tracing_subscriber::EnvFilter::builder()
            .with_default_directive(self.level.into())
            .from_env_lossy();

        let terminal_layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_ansi(false)
            .with_writer(std::io::stdout);

        let file_layer = match &self.log_dir {
            Some(log_dir) => {
                create_dir_all(log_dir)
                    .map_err(|e| SyncError::file_system("create log directory", log_dir, e))?;

                let file_appender = tracing_appender::rolling::RollingFileAppender::builder()
                    .rotation(tracing_appender::rolling::Rotation::HOURLY)
                    .max_log_files(6)
                    .filename_prefix(&self.logger_name)
                    .filename_suffix("log")
                    .build(log_dir)
                    .map_err(|e| SyncError::InvalidConfig {
                        field: "log_dir",
                        reason: e.to_string(),
                    })?;

                Some(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_ansi(false)
                        .with_writer(file_appender),
                )
            }
            None => None,
        };

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(terminal_layer);

        Ok(tracing::subscriber::set_default(subscriber))
    }
}

use std::path::{Path, PathBuf};

use sysinfo::{CpuRefreshKind, RefreshKind};

use crate::error::{SyncError, SyncResult};

pub const DEFAULT_BACKEND: &str = "llama-cpp";
pub const DEFAULT_CONTEXT_SIZE: u32 = 2048;
pub const MIN_THREADS: usize = 2;
pub const MAX_THREADS: usize = 8;

/// Mount point of the models directory inside the LocalAI container.
pub const CONTAINER_MODELS_DIR: &str = "/models";

pub const CONFIG_EXTENSION: &str = "yaml";

/// Instruction-bracket chat template (Go template syntax, read by LocalAI).
const CHAT_TEMPLATE: &str = r#"template:
  chat:
    template: |
      <s>{{- if .System }}
      {{.System}}
      {{- end }}
      {{- range $i, $message := .Messages }}
      {{- if eq $message.Role "user" }}
      [INST] {{ $message.Content }} [/INST]
      {{- else if eq $message.Role "assistant" }}
      {{ $message.Content }}
      {{- end }}
      {{- end }}
"#;

/// A LocalAI model definition, one file per model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub name: String,
    pub backend: String,
    pub model_path: String,
    pub context_size: u32,
    pub threads: usize,
    pub f16: bool,
}

impl ServiceConfig {
    pub fn for_model<S: Into<String>>(name: S, file_base_name: &str, threads: usize) -> Self {
        Self {
            name: name.into(),
            backend: DEFAULT_BACKEND.to_string(),
            model_path: format!("{CONTAINER_MODELS_DIR}/{file_base_name}"),
            context_size: DEFAULT_CONTEXT_SIZE,
            threads,
            f16: true,
        }
    }

    pub fn file_name(&self) -> String {
        config_file_name(&self.name)
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "name: {}\n\
             backend: {}\n\
             parameters:\n  \
             model: {}\n  \
             context_size: {}\n  \
             threads: {}\n  \
             f16: {}\n",
            self.name, self.backend, self.model_path, self.context_size, self.threads, self.f16,
        );
        out.push_str(CHAT_TEMPLATE);
        out
    }
}

pub fn config_file_name(name: &str) -> String {
    format!("{name}.{CONFIG_EXTENSION}")
}

/// Half the cores, clamped to `[MIN_THREADS, MAX_THREADS]`.
pub fn recommended_threads(cpu_cores: usize) -> usize {
    (cpu_cores / 2).clamp(MIN_THREADS, MAX_THREADS)
}

/// Logical CPU count.
pub fn detect_cpu_cores() -> usize {
    let sys = sysinfo::System::new_with_specifics(
        RefreshKind::nothing().with_cpu(CpuRefreshKind::everything()),
    );
    match sys.cpus().len() {
        0 => std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
        n => n,
    }
}

/// Writes `<config_dir>/<name>.yaml`, replacing any existing file.
pub fn write_service_config(config_dir: &Path, config: &ServiceConfig) -> SyncResult<PathBuf> {
    let path = config_dir.join(config.file_name());
    std::fs::write(&path, config.render())
        .map_err(|e| SyncError::file_system("write service config", &path, e))?;
    crate::info!("Created configuration for {}", config.name);
    Ok(path)
}

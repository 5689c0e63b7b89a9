pub mod alias;
pub mod config;

pub use alias::{
    create_alias, create_aliases, AliasOutcome, AliasSlot, ALIAS_CONTEXT_SIZE, ALIAS_SLOTS,
    GPT_35_TURBO, GPT_4,
};
pub use config::{
    detect_cpu_cores, recommended_threads, write_service_config, ServiceConfig, DEFAULT_BACKEND,
    DEFAULT_CONTEXT_SIZE,
};

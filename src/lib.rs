pub mod backend;
pub mod config;
pub mod core;
pub mod domain;
pub mod text;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig, BackendKind};
pub use core::{engine::CorrectionEngine, pipeline::CorrectionPipeline};
pub use utils::error::{ProofError, Result};

pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::{ProofError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_range,
    validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Remote managed Cortex-style SQL service.
    Cortex,
    /// Local Ollama server.
    Ollama,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Cortex => "cortex",
            BackendKind::Ollama => "ollama",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "proof-etl")]
#[command(about = "Batch Japanese proofreading for game-localization spreadsheets")]
pub struct CliConfig {
    #[arg(long, help = "Input CSV file with the text column to proofread")]
    pub input: Option<String>,

    #[arg(long, value_enum, default_value = "ollama")]
    pub backend: BackendKind,

    #[arg(long, default_value = "http://localhost:11434")]
    pub endpoint: String,

    #[arg(long, default_value = "llama3")]
    pub model: String,

    #[arg(long, default_value = "TransText")]
    pub text_column: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "100", help = "Delay between rows, for backend rate limits")]
    pub pacing_ms: u64,

    #[arg(long, default_value = "60", help = "Per-call timeout for the ollama backend")]
    pub request_timeout_secs: u64,

    #[arg(long, help = "Bearer token for the cortex backend (falls back to CORTEX_TOKEN)")]
    pub token: Option<String>,

    #[arg(long, help = "Load pipeline settings from a TOML profile instead of flags")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| std::env::var("CORTEX_TOKEN").ok())
    }
}

impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn input_file(&self) -> &str {
        self.input.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn text_column(&self) -> &str {
        &self.text_column
    }

    fn pacing_ms(&self) -> u64 {
        self.pacing_ms
    }

    fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let input = self
            .input
            .as_deref()
            .ok_or_else(|| ProofError::MissingConfigError {
                field: "input".to_string(),
            })?;
        validate_file_extension("input", input, &["csv"])?;
        validate_url("endpoint", &self.endpoint)?;
        validate_non_empty_string("model", &self.model)?;
        validate_non_empty_string("text_column", &self.text_column)?;
        validate_path("output_path", &self.output_path)?;
        validate_range("pacing_ms", self.pacing_ms, 0, 60_000)?;
        validate_range("request_timeout_secs", self.request_timeout_secs, 1, 600)?;
        Ok(())
    }
}

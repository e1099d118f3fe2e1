use crate::config::BackendKind;
use crate::core::ConfigProvider;
use crate::utils::error::{ProofError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_range,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// TOML run profile, the file-based alternative to CLI flags. Values may
/// reference environment variables as `${VAR_NAME}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineSection,
    pub source: SourceSection,
    pub input: InputSection,
    pub load: LoadSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSection {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    pub backend: BackendKind,
    pub endpoint: String,
    pub model: String,
    pub token: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSection {
    pub file: String,
    pub text_column: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadSection {
    pub output_path: String,
    pub pacing_ms: Option<u64>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProofError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ProofError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` with the environment value; unset variables
    /// are left as-is so validation can point at them.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    /// Token for the remote backend, ignoring unresolved placeholders.
    pub fn token(&self) -> Option<&str> {
        self.source
            .token
            .as_deref()
            .filter(|t| !t.is_empty() && !t.starts_with("${"))
    }
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn model(&self) -> &str {
        &self.source.model
    }

    fn input_file(&self) -> &str {
        &self.input.file
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn text_column(&self) -> &str {
        self.input.text_column.as_deref().unwrap_or("TransText")
    }

    fn pacing_ms(&self) -> u64 {
        self.load.pacing_ms.unwrap_or(100)
    }

    fn request_timeout_secs(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(60)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validate_url("source.endpoint", &self.source.endpoint)?;
        validate_non_empty_string("source.model", &self.source.model)?;
        validate_file_extension("input.file", &self.input.file, &["csv"])?;
        validate_path("load.output_path", &self.load.output_path)?;
        validate_range("load.pacing_ms", self.pacing_ms(), 0, 60_000)?;
        validate_range(
            "source.timeout_seconds",
            self.request_timeout_secs(),
            1,
            600,
        )?;
        if self.source.backend == BackendKind::Cortex && self.token().is_none() {
            return Err(ProofError::MissingConfigError {
                field: "source.token".to_string(),
            });
        }
        Ok(())
    }
}

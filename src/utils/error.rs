use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProofError {
    #[error("required column '{column}' not found; available columns: {}", available.join(", "))]
    SchemaError {
        column: String,
        available: Vec<String>,
    },

    #[error("backend connection failed: {message}")]
    ConnectionError { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("backend returned an unexpected response: {message}")]
    BackendError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

impl ProofError {
    /// Exit code reported by the CLI for a fatal error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProofError::ConfigError { .. }
            | ProofError::InvalidConfigValueError { .. }
            | ProofError::MissingConfigError { .. } => 2,
            ProofError::ConnectionError { .. } => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProofError>;

pub mod cortex;
pub mod ollama;
pub mod prompt;

pub use cortex::CortexBackend;
pub use ollama::OllamaBackend;

use crate::text::enforce_output_contract;
use crate::utils::error::{ProofError, Result};
use prompt::normalize_reply;
use std::time::Duration;

/// Post-processing shared by both backends: collapse the backend-specific
/// "no correction" framing to the empty string, then hold the reply to the
/// tag-preservation and width-conversion rules.
pub fn finalize_reply(source: &str, raw: &str) -> String {
    let normalized = normalize_reply(raw);
    if normalized.is_empty() {
        normalized
    } else {
        enforce_output_contract(source, &normalized)
    }
}

/// Builds a backend from profile settings. `kind` is `cortex` or `ollama`;
/// the token is only required for the remote variant.
pub fn from_settings(
    kind: &str,
    endpoint: &str,
    model: &str,
    token: Option<&str>,
    timeout_secs: u64,
) -> Result<Box<dyn crate::domain::ports::CorrectionBackend>> {
    match kind {
        "cortex" => {
            let token = token.ok_or_else(|| ProofError::MissingConfigError {
                field: "token".to_string(),
            })?;
            Ok(Box::new(CortexBackend::new(endpoint, token, model)))
        }
        "ollama" => Ok(Box::new(OllamaBackend::new(
            endpoint,
            model,
            Duration::from_secs(timeout_secs),
        )?)),
        other => Err(ProofError::InvalidConfigValueError {
            field: "backend".to_string(),
            value: other.to_string(),
            reason: "expected 'cortex' or 'ollama'".to_string(),
        }),
    }
}

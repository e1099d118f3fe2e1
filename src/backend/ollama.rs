use crate::backend::finalize_reply;
use crate::backend::prompt::local_prompt;
use crate::domain::ports::CorrectionBackend;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Local correction backend speaking the Ollama generate API. Every call is
/// a stateless `POST /api/generate` with a bounded timeout; there is no
/// session to establish or probe.
pub struct OllamaBackend {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaBackend {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CorrectionBackend for OllamaBackend {
    async fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    async fn correct(&self, text: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": local_prompt(text),
            "stream": false,
        });

        let response = self
            .client
            .post(self.generate_url())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: GenerateResponse = response.json().await?;
        Ok(finalize_reply(text, &payload.response))
    }
}

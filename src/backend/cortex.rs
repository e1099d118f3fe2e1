use crate::backend::finalize_reply;
use crate::backend::prompt::remote_prompt;
use crate::domain::ports::CorrectionBackend;
use crate::utils::error::{ProofError, Result};
use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::Mutex;

/// Remote correction backend speaking a Cortex-style SQL-over-HTTP API:
/// a single `SELECT SNOWFLAKE.CORTEX.COMPLETE(model, prompt)` statement is
/// posted per text unit, authenticated with a bearer token.
///
/// The HTTP session is established lazily once per process and validated
/// before each batch with a `SELECT 1` round trip. A failed probe tears the
/// session down and retries exactly once; a second failure fails the whole
/// run. Individual statements have no explicit timeout, matching the
/// service's own behavior.
pub struct CortexBackend {
    base_url: String,
    token: String,
    model: String,
    session: Mutex<Option<Client>>,
}

impl CortexBackend {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            model: model.into(),
            session: Mutex::new(None),
        }
    }

    fn statements_url(&self) -> String {
        format!("{}/api/v2/statements", self.base_url.trim_end_matches('/'))
    }

    async fn session_client(&self) -> Client {
        let mut session = self.session.lock().await;
        session.get_or_insert_with(Client::new).clone()
    }

    async fn reset_session(&self) {
        let mut session = self.session.lock().await;
        *session = None;
    }

    /// Runs one SQL statement and returns the first cell of the first row.
    async fn execute_statement(
        &self,
        client: &Client,
        statement: &str,
        bindings: serde_json::Value,
    ) -> Result<String> {
        let body = serde_json::json!({
            "statement": statement,
            "bindings": bindings,
        });

        let response = client
            .post(self.statements_url())
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        payload["data"][0][0]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ProofError::BackendError {
                message: "statement result has no data[0][0] text cell".to_string(),
            })
    }

    async fn probe(&self, client: &Client) -> Result<()> {
        self.execute_statement(client, "SELECT 1", serde_json::json!({}))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl CorrectionBackend for CortexBackend {
    async fn ensure_ready(&self) -> Result<()> {
        let client = self.session_client().await;
        if let Err(first) = self.probe(&client).await {
            tracing::warn!("liveness probe failed ({first}), re-establishing session");
            self.reset_session().await;
            let client = self.session_client().await;
            if let Err(second) = self.probe(&client).await {
                return Err(ProofError::ConnectionError {
                    message: format!("probe failed after reconnect: {second}"),
                });
            }
        }
        Ok(())
    }

    async fn correct(&self, text: &str) -> Result<String> {
        let client = self.session_client().await;
        let prompt = remote_prompt(text);
        let raw = self
            .execute_statement(
                &client,
                "SELECT SNOWFLAKE.CORTEX.COMPLETE(?, ?)",
                serde_json::json!({
                    "1": { "type": "TEXT", "value": self.model },
                    "2": { "type": "TEXT", "value": prompt },
                }),
            )
            .await?;
        Ok(finalize_reply(text, &raw))
    }
}

use crate::domain::model::{BatchOutcome, CorrectionResult, InputRow, SheetTable};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn model(&self) -> &str;
    fn input_file(&self) -> &str;
    fn output_path(&self) -> &str;
    fn text_column(&self) -> &str;
    fn pacing_ms(&self) -> u64;
    fn request_timeout_secs(&self) -> u64;
}

/// One text unit in, corrected text out. Implementations normalize their
/// backend-specific "no correction needed" framing to the empty string so
/// the merger never sees it.
#[async_trait]
pub trait CorrectionBackend: Send + Sync {
    /// Validated before each batch. The remote variant probes its session
    /// and re-establishes it once; the local variant has nothing to check.
    async fn ensure_ready(&self) -> Result<()>;

    async fn correct(&self, text: &str) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<(SheetTable, Vec<InputRow>)>;
    async fn connect(&self) -> Result<()>;
    async fn correct_rows(&self, rows: &[InputRow]) -> Result<BatchOutcome>;
    async fn load(&self, table: SheetTable, results: Vec<CorrectionResult>) -> Result<String>;
}

use crate::core::selector::select_rows;
use crate::domain::model::{BatchOutcome, CorrectionResult, InputRow, SheetTable};
use crate::domain::ports::{ConfigProvider, CorrectionBackend, Pipeline, Storage};
use crate::utils::error::{ProofError, Result};
use crate::utils::progress::ProgressReporter;
use std::path::Path;
use std::time::Duration;

/// The batch correction pipeline: read the tabular artifact, send each
/// non-blank target cell to the backend one at a time, and write the table
/// back with an appended `corrected` column.
pub struct CorrectionPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    backend: Box<dyn CorrectionBackend>,
    reporter: Box<dyn ProgressReporter>,
}

impl<S: Storage, C: ConfigProvider> CorrectionPipeline<S, C> {
    pub fn new(
        storage: S,
        config: C,
        backend: Box<dyn CorrectionBackend>,
        reporter: Box<dyn ProgressReporter>,
    ) -> Self {
        Self {
            storage,
            config,
            backend,
            reporter,
        }
    }

    fn output_file(&self) -> Result<String> {
        let input = self.config.input_file();
        let stem = Path::new(input)
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ProofError::ProcessingError {
                message: format!("cannot derive output name from input file '{input}'"),
            })?;
        Ok(format!(
            "{}/{}_corrected.csv",
            self.config.output_path().trim_end_matches('/'),
            stem
        ))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CorrectionPipeline<S, C> {
    async fn extract(&self) -> Result<(SheetTable, Vec<InputRow>)> {
        let data = self.storage.read_file(self.config.input_file()).await?;

        let mut reader = csv::Reader::from_reader(data.as_slice());
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        let table = SheetTable { headers, rows };
        let selected = select_rows(&table, self.config.text_column())?;
        Ok((table, selected))
    }

    async fn connect(&self) -> Result<()> {
        self.backend.ensure_ready().await
    }

    async fn correct_rows(&self, rows: &[InputRow]) -> Result<BatchOutcome> {
        let total = rows.len();
        let mut results = Vec::with_capacity(total);
        let mut failed_rows = 0;

        for row in rows {
            let corrected = match &row.text {
                Some(text) => {
                    self.reporter.on_row(row.index + 1, total);
                    match self.backend.correct(text).await {
                        Ok(corrected) => corrected,
                        Err(e) => {
                            // Row-level failures never abort the batch.
                            self.reporter
                                .on_row_warning(row.index, &format!("correction failed: {e}"));
                            failed_rows += 1;
                            String::new()
                        }
                    }
                }
                None => String::new(),
            };
            results.push(CorrectionResult {
                index: row.index,
                corrected,
            });

            let pacing = self.config.pacing_ms();
            if pacing > 0 {
                tokio::time::sleep(Duration::from_millis(pacing)).await;
            }
        }

        Ok(BatchOutcome {
            results,
            failed_rows,
        })
    }

    async fn load(&self, table: SheetTable, results: Vec<CorrectionResult>) -> Result<String> {
        if results.len() != table.rows.len() {
            return Err(ProofError::ProcessingError {
                message: format!(
                    "result count {} does not match row count {}",
                    results.len(),
                    table.rows.len()
                ),
            });
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        let mut headers = table.headers.clone();
        headers.push("corrected".to_string());
        writer.write_record(&headers)?;

        for (row, result) in table.rows.iter().zip(&results) {
            let mut record = row.clone();
            record.push(result.corrected.clone());
            writer.write_record(&record)?;
        }

        let data = writer
            .into_inner()
            .map_err(|e| ProofError::ProcessingError {
                message: format!("flushing output failed: {e}"),
            })?;

        let output_file = self.output_file()?;
        tracing::debug!("writing {} bytes to {}", data.len(), output_file);
        self.storage.write_file(&output_file, &data).await?;
        Ok(output_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::progress::SilentProgress;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put_file(&self, path: &str, data: &[u8]) {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files.lock().await.get(path).cloned().ok_or_else(|| {
                ProofError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {path}"),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    #[derive(Clone)]
    struct MockConfig;

    impl ConfigProvider for MockConfig {
        fn endpoint(&self) -> &str {
            "http://localhost:11434"
        }
        fn model(&self) -> &str {
            "llama3"
        }
        fn input_file(&self) -> &str {
            "strings.csv"
        }
        fn output_path(&self) -> &str {
            "output"
        }
        fn text_column(&self) -> &str {
            "TransText"
        }
        fn pacing_ms(&self) -> u64 {
            0
        }
        fn request_timeout_secs(&self) -> u64 {
            60
        }
    }

    /// Scripted backend: maps input text to a canned reply, optionally
    /// failing on chosen inputs. Counts every call.
    struct ScriptedBackend {
        replies: HashMap<String, String>,
        fail_on: Vec<String>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedBackend {
        fn new(replies: &[(&str, &str)]) -> Self {
            Self {
                replies: replies
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                fail_on: Vec::new(),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing_on(mut self, text: &str) -> Self {
            self.fail_on.push(text.to_string());
            self
        }

        fn call_counter(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.calls)
        }
    }

    #[async_trait]
    impl CorrectionBackend for ScriptedBackend {
        async fn ensure_ready(&self) -> Result<()> {
            Ok(())
        }

        async fn correct(&self, text: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.iter().any(|t| t == text) {
                return Err(ProofError::ProcessingError {
                    message: "simulated timeout".to_string(),
                });
            }
            Ok(self.replies.get(text).cloned().unwrap_or_default())
        }
    }

    fn pipeline_with(
        storage: MockStorage,
        backend: ScriptedBackend,
    ) -> CorrectionPipeline<MockStorage, MockConfig> {
        CorrectionPipeline::new(
            storage,
            MockConfig,
            Box::new(backend),
            Box::new(SilentProgress),
        )
    }

    const INPUT_CSV: &str = "\
Key,TransText,Note
k1,一つ目の文,a
k2,,b
k3,三つ目の文,c
";

    #[tokio::test]
    async fn test_extract_selects_non_blank_rows() {
        let storage = MockStorage::new();
        storage.put_file("strings.csv", INPUT_CSV.as_bytes()).await;
        let pipeline = pipeline_with(storage, ScriptedBackend::new(&[]));

        let (table, rows) = pipeline.extract().await.unwrap();

        assert_eq!(table.headers, vec!["Key", "TransText", "Note"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].text.as_deref(), Some("一つ目の文"));
        assert_eq!(rows[1].text, None);
        assert_eq!(rows[2].text.as_deref(), Some("三つ目の文"));
    }

    #[tokio::test]
    async fn test_extract_missing_column_is_schema_error() {
        let storage = MockStorage::new();
        storage
            .put_file("strings.csv", b"Key,SourceText\nk1,a\n")
            .await;
        let pipeline = pipeline_with(storage, ScriptedBackend::new(&[]));

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, ProofError::SchemaError { .. }));
    }

    #[tokio::test]
    async fn test_blank_rows_never_reach_backend() {
        let storage = MockStorage::new();
        storage.put_file("strings.csv", INPUT_CSV.as_bytes()).await;
        let backend =
            ScriptedBackend::new(&[("一つ目の文", "一つ目の文・修正"), ("三つ目の文", "")]);
        let calls = backend.call_counter();
        let pipeline = pipeline_with(storage, backend);

        let (_, rows) = pipeline.extract().await.unwrap();
        let outcome = pipeline.correct_rows(&rows).await.unwrap();

        // Only the two non-blank rows reach the backend.
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.results[0].corrected, "一つ目の文・修正");
        assert_eq!(outcome.results[1].corrected, "");
        assert_eq!(outcome.results[2].corrected, "");
        assert_eq!(outcome.failed_rows, 0);
    }

    #[tokio::test]
    async fn test_row_failure_is_isolated() {
        let rows: Vec<InputRow> = (0..5)
            .map(|index| InputRow {
                index,
                text: Some(format!("文{index}")),
            })
            .collect();

        let replies: Vec<(String, String)> = (0..5)
            .map(|i| (format!("文{i}"), format!("文{i}・修正")))
            .collect();
        let reply_refs: Vec<(&str, &str)> = replies
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let storage = MockStorage::new();
        let pipeline = pipeline_with(
            storage,
            ScriptedBackend::new(&reply_refs).failing_on("文2"),
        );

        let outcome = pipeline.correct_rows(&rows).await.unwrap();

        assert_eq!(outcome.results.len(), 5);
        assert_eq!(outcome.failed_rows, 1);
        assert_eq!(outcome.results[2].corrected, "");
        for i in [0usize, 1, 3, 4] {
            assert_eq!(outcome.results[i].corrected, format!("文{i}・修正"));
        }
    }

    #[tokio::test]
    async fn test_load_appends_corrected_column() {
        let storage = MockStorage::new();
        storage.put_file("strings.csv", INPUT_CSV.as_bytes()).await;
        let pipeline = pipeline_with(storage.clone(), ScriptedBackend::new(&[]));

        let (table, _) = pipeline.extract().await.unwrap();
        let results = vec![
            CorrectionResult {
                index: 0,
                corrected: "直した文".to_string(),
            },
            CorrectionResult {
                index: 1,
                corrected: String::new(),
            },
            CorrectionResult {
                index: 2,
                corrected: String::new(),
            },
        ];

        let output = pipeline.load(table, results).await.unwrap();
        assert_eq!(output, "output/strings_corrected.csv");

        let written = storage.get_file(&output).await.unwrap();
        let mut reader = csv::Reader::from_reader(written.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, vec!["Key", "TransText", "Note", "corrected"]);

        let records: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], vec!["k1", "一つ目の文", "a", "直した文"]);
        assert_eq!(records[1], vec!["k2", "", "b", ""]);
        assert_eq!(records[2], vec!["k3", "三つ目の文", "c", ""]);
    }

    #[tokio::test]
    async fn test_load_rejects_result_count_mismatch() {
        let storage = MockStorage::new();
        storage.put_file("strings.csv", INPUT_CSV.as_bytes()).await;
        let pipeline = pipeline_with(storage, ScriptedBackend::new(&[]));

        let (table, _) = pipeline.extract().await.unwrap();
        let err = pipeline.load(table, vec![]).await.unwrap_err();
        assert!(matches!(err, ProofError::ProcessingError { .. }));
    }
}

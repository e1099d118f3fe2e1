use httpmock::prelude::*;
use proof_etl::backend::CortexBackend;
use proof_etl::domain::model::RunState;
use proof_etl::utils::progress::SilentProgress;
use proof_etl::{BackendKind, CliConfig, CorrectionEngine, CorrectionPipeline, LocalStorage, ProofError};
use tempfile::TempDir;

fn cli_config(endpoint: &str) -> CliConfig {
    CliConfig {
        input: Some("strings.csv".to_string()),
        backend: BackendKind::Cortex,
        endpoint: endpoint.to_string(),
        model: "claude-3-5-sonnet".to_string(),
        text_column: "TransText".to_string(),
        output_path: "out".to_string(),
        pacing_ms: 0,
        request_timeout_secs: 60,
        token: Some("token".to_string()),
        config: None,
        verbose: false,
    }
}

fn engine_for(
    temp_dir: &TempDir,
    server: &MockServer,
) -> CorrectionEngine<CorrectionPipeline<LocalStorage, CliConfig>> {
    let base = temp_dir.path().to_str().unwrap().to_string();
    let backend = CortexBackend::new(server.base_url(), "token", "claude-3-5-sonnet");
    let pipeline = CorrectionPipeline::new(
        LocalStorage::new(base),
        cli_config(&server.base_url()),
        Box::new(backend),
        Box::new(SilentProgress),
    );
    CorrectionEngine::new(pipeline)
}

#[tokio::test]
async fn test_failed_probe_aborts_before_any_correction() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("strings.csv"),
        "Key,TransText\nk1,直す文\n",
    )
    .unwrap();

    let server = MockServer::start();
    let probe_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v2/statements")
            .body_contains("SELECT 1");
        then.status(503);
    });
    let complete_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v2/statements")
            .body_contains("CORTEX.COMPLETE");
        then.status(200)
            .json_body(serde_json::json!({ "data": [["x"]] }));
    });

    let mut engine = engine_for(&temp_dir, &server);
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, ProofError::ConnectionError { .. }));
    assert_eq!(engine.state(), RunState::Failed);
    // One initial probe plus one probe after the reconnect, then abort
    // before row zero is ever sent.
    probe_mock.assert_hits(2);
    complete_mock.assert_hits(0);
    assert!(!temp_dir.path().join("out/strings_corrected.csv").exists());
}

#[tokio::test]
async fn test_remote_sentinel_run_writes_empty_corrections() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("strings.csv"),
        "Key,TransText\nk1,問題ない文\nk2,直る文\n",
    )
    .unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/v2/statements")
            .body_contains("SELECT 1");
        then.status(200)
            .json_body(serde_json::json!({ "data": [["1"]] }));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/v2/statements")
            .body_contains("問題ない文");
        then.status(200)
            .json_body(serde_json::json!({ "data": [["NO_CHANGES"]] }));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/v2/statements")
            .body_contains("直る文");
        then.status(200)
            .json_body(serde_json::json!({ "data": [["直った文"]] }));
    });

    let mut engine = engine_for(&temp_dir, &server);
    let output_path = engine.run().await.unwrap();
    assert_eq!(engine.state(), RunState::Done);
    assert_eq!(output_path, "out/strings_corrected.csv");

    let written =
        std::fs::read_to_string(temp_dir.path().join("out/strings_corrected.csv")).unwrap();
    assert_eq!(
        written,
        "Key,TransText,corrected\nk1,問題ない文,\nk2,直る文,直った文\n"
    );
}

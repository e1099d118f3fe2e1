use crate::domain::model::{RunState, RunSummary};
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use chrono::Utc;

/// Drives a pipeline through its lifecycle:
/// `Idle → Uploaded → Validated → Connecting → Processing → Writing → Done`,
/// with `Failed` terminal on schema, connection or artifact I/O errors.
/// Row-level failures are handled inside `Processing` and never fail a run.
pub struct CorrectionEngine<P: Pipeline> {
    pipeline: P,
    state: RunState,
}

impl<P: Pipeline> CorrectionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!("state {} -> {}", self.state, next);
        self.state = next;
    }

    fn fail<T>(&mut self, err: crate::utils::error::ProofError) -> Result<T> {
        self.transition(RunState::Failed);
        Err(err)
    }

    /// Runs the whole batch and returns the output artifact path.
    pub async fn run(&mut self) -> Result<String> {
        let started_at = Utc::now();

        self.transition(RunState::Uploaded);
        let (table, rows) = match self.pipeline.extract().await {
            Ok(extracted) => extracted,
            Err(e) => return self.fail(e),
        };
        self.transition(RunState::Validated);
        tracing::info!(
            "validated input: {} rows, {} columns",
            table.rows.len(),
            table.headers.len()
        );

        self.transition(RunState::Connecting);
        if let Err(e) = self.pipeline.connect().await {
            return self.fail(e);
        }

        self.transition(RunState::Processing);
        let outcome = match self.pipeline.correct_rows(&rows).await {
            Ok(outcome) => outcome,
            Err(e) => return self.fail(e),
        };

        let total_rows = outcome.results.len();
        let corrected_rows = outcome
            .results
            .iter()
            .filter(|r| !r.corrected.is_empty())
            .count();
        let skipped_rows = rows.iter().filter(|r| r.text.is_none()).count();
        let failed_rows = outcome.failed_rows;

        self.transition(RunState::Writing);
        let output_path = match self.pipeline.load(table, outcome.results).await {
            Ok(path) => path,
            Err(e) => return self.fail(e),
        };
        self.transition(RunState::Done);

        let summary = RunSummary {
            started_at,
            finished_at: Utc::now(),
            total_rows,
            corrected_rows,
            unchanged_rows: total_rows
                .saturating_sub(corrected_rows + skipped_rows + failed_rows),
            skipped_rows,
            failed_rows,
        };
        tracing::info!(
            "run complete: {} rows ({} corrected, {} unchanged, {} skipped, {} failed) in {}s",
            summary.total_rows,
            summary.corrected_rows,
            summary.unchanged_rows,
            summary.skipped_rows,
            summary.failed_rows,
            (summary.finished_at - summary.started_at).num_seconds()
        );

        Ok(output_path)
    }
}

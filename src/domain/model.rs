use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One parsed tabular artifact: header row plus data rows, in file order.
/// All cells are kept as strings so unrelated columns pass through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// A row selected for the correction pass. `text` is `None` when the target
/// cell is missing or blank after trimming; such rows keep their slot in the
/// output but are never sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    pub index: usize,
    pub text: Option<String>,
}

/// Per-row outcome. `corrected` is the rewritten text, or the empty string
/// for "no change", "skipped" and "row-level failure" alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub index: usize,
    pub corrected: String,
}

/// Result of one batch pass. Row-level failures are already folded into
/// `results` as empty corrections; `failed_rows` only feeds the summary.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub results: Vec<CorrectionResult>,
    pub failed_rows: usize,
}

/// Whole-pipeline lifecycle. Per-row failures do not leave `Processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Uploaded,
    Validated,
    Connecting,
    Processing,
    Writing,
    Done,
    Failed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Uploaded => "uploaded",
            RunState::Validated => "validated",
            RunState::Connecting => "connecting",
            RunState::Processing => "processing",
            RunState::Writing => "writing",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// End-of-run accounting, logged once the output artifact is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_rows: usize,
    pub corrected_rows: usize,
    pub unchanged_rows: usize,
    pub skipped_rows: usize,
    pub failed_rows: usize,
}

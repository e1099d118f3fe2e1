/// Observer for per-row batch progress. The CLI ships a tracing-backed
/// implementation; a UI front end would plug in its own.
pub trait ProgressReporter: Send + Sync {
    fn on_row(&self, done: usize, total: usize);

    fn on_row_warning(&self, index: usize, message: &str) {
        let _ = (index, message);
    }
}

pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn on_row(&self, done: usize, total: usize) {
        tracing::info!("🔍 checking row {}/{}", done, total);
    }

    fn on_row_warning(&self, index: usize, message: &str) {
        tracing::warn!("row {}: {}", index + 1, message);
    }
}

/// No-op reporter for tests and library embedding.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn on_row(&self, _done: usize, _total: usize) {}
}

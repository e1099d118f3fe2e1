pub mod engine;
pub mod pipeline;
pub mod selector;

pub use crate::domain::model::{BatchOutcome, CorrectionResult, InputRow, RunState, SheetTable};
pub use crate::domain::ports::{ConfigProvider, CorrectionBackend, Pipeline, Storage};
pub use crate::utils::error::Result;

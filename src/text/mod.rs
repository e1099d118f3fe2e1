pub mod guard;
pub mod spans;
pub mod width;

pub use guard::enforce_output_contract;
pub use spans::{pieces, protected_spans, Piece};
pub use width::to_fullwidth;

//! Pipeline entry points shared by the binaries.
//!
//! - `run_sync`: Merge upstream listings into storage
//! - `run_validate`: Check configuration
//! - `run_info`: Summarize configured years and stored records

pub mod info;
pub mod sync;
pub mod validate;

pub use info::{YearSummary, run_info};
pub use sync::run_sync;
pub use validate::run_validate;

//! Domain module - operators, canonical draw records and run diagnostics
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod draw_result;
pub mod operator;
pub mod run_report;

// Re-export commonly used items for convenience
pub use draw_result::{
    DocumentDefaults, DocumentSummary, DrawResult, DrawResultBuilder, FiveDigitRow, PoolDraw,
    SixDigitRow, TopThree, Variant,
};
pub use operator::{DrawFormat, OperatorDescriptor, OperatorRegistry, PoolLabel, RegistryError};
pub use run_report::{Diagnostic, RunReport};

//! Result page parsing
//!
//! Blocks are located by one container selector, resolved to an operator by
//! the `CompanyResolver`, turned into partial data by the extractor bound to
//! the operator's format, then normalized into a `DrawResult`.

pub mod block_locator;
pub mod company_resolver;
pub mod config;
pub mod context;
pub mod dom;
pub mod extractors;
pub mod normalizer;

// Re-export public types
pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
pub use block_locator::{Block, BlockLocator};
pub use company_resolver::{CompanyResolver, Resolution, ResolutionLayer, RunTracker};
pub use config::ParsingConfig;
pub use context::ExtractContext;
pub use extractors::{FieldExtractor, PartialDraw, extractor_for};
pub use normalizer::{Normalizer, parse_draw_date, processing_date};

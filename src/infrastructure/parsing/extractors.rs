//! Field extractors
//!
//! One extractor per `DrawFormat`, bound through a static table. Every
//! extractor starts from [`extract_common`] (date, draw number, top three,
//! special and consolation) and only adds its own variant payload, so a change
//! in the shared layout is fixed in one place.

pub mod common;
pub mod digit_table;
pub mod lotto_pool;
pub mod three_digit;

pub use common::{StandardExtractor, extract_common};
pub use digit_table::{FiveDigitExtractor, SixDigitExtractor};
pub use lotto_pool::{LottoPoolExtractor, has_pool_header};
pub use three_digit::ThreeDigitExtractor;

use super::context::ExtractContext;
use crate::domain::{DrawFormat, OperatorDescriptor, TopThree, Variant};
use scraper::ElementRef;

/// Block-local fields before normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialDraw {
    /// Date text as found in the block (`DD-MM-YYYY` when recognizable)
    pub draw_date: Option<String>,
    pub draw_number: Option<String>,
    pub prizes: TopThree,
    pub special_numbers: Vec<String>,
    pub consolation_numbers: Vec<String>,
    pub variant: Option<Variant>,
}

/// Turns one block (or composite section) into partial structured data
pub trait FieldExtractor: Send + Sync {
    fn extract(
        &self,
        scope: ElementRef<'_>,
        descriptor: &OperatorDescriptor,
        ctx: &ExtractContext,
    ) -> PartialDraw;
}

/// Format → extractor. Composite blocks are fanned out by the pipeline and have no entry.
static EXTRACTORS: [(DrawFormat, &dyn FieldExtractor); 5] = [
    (DrawFormat::Standard, &StandardExtractor),
    (DrawFormat::ThreeDigit, &ThreeDigitExtractor),
    (DrawFormat::FiveDigitTable, &FiveDigitExtractor),
    (DrawFormat::SixDigitTable, &SixDigitExtractor),
    (DrawFormat::LottoPool, &LottoPoolExtractor),
];

pub fn extractor_for(format: DrawFormat) -> Option<&'static dyn FieldExtractor> {
    EXTRACTORS
        .iter()
        .find(|(candidate, _)| *candidate == format)
        .map(|(_, extractor)| *extractor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_record_format_has_an_extractor() {
        for format in [
            DrawFormat::Standard,
            DrawFormat::ThreeDigit,
            DrawFormat::FiveDigitTable,
            DrawFormat::SixDigitTable,
            DrawFormat::LottoPool,
        ] {
            assert!(extractor_for(format).is_some(), "{format:?}");
        }
        assert!(extractor_for(DrawFormat::Composite).is_none());
    }
}

//! 3D sub-game extractor

use super::common::{extract_common, top_three};
use super::{FieldExtractor, PartialDraw};
use crate::domain::{OperatorDescriptor, TopThree, Variant};
use crate::infrastructure::parsing::context::ExtractContext;
use crate::infrastructure::parsing::dom::{find_header_cell, following_table};
use scraper::ElementRef;
use tracing::debug;

/// Top three of the table following the `3D` header
pub struct ThreeDigitExtractor;

impl FieldExtractor for ThreeDigitExtractor {
    fn extract(
        &self,
        scope: ElementRef<'_>,
        descriptor: &OperatorDescriptor,
        ctx: &ExtractContext,
    ) -> PartialDraw {
        let mut partial = extract_common(scope, ctx);

        let data = find_header_cell(scope, &[ctx.labels.three_digit.as_str()])
            .and_then(|header| following_table(scope, header))
            .map(|table| top_three(table, &ctx.top_prize, ctx))
            .unwrap_or_else(|| {
                debug!("No 3D table found for '{}'", descriptor.id);
                TopThree::default()
            });

        partial.variant = Some(Variant::TopThree { data });
        partial
    }
}

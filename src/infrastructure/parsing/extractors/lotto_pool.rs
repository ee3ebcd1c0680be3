//! Lotto pool extractor
//!
//! Each pool lives in the table following a header cell carrying the pool's
//! label. Row 1 of that table holds the drawn numbers (bonus separators such as
//! `+` are dropped); every later row contributes its first value cell as a
//! jackpot amount.

use super::common::extract_common;
use super::{FieldExtractor, PartialDraw};
use crate::domain::{OperatorDescriptor, PoolDraw, PoolLabel, Variant};
use crate::infrastructure::parsing::context::ExtractContext;
use crate::infrastructure::parsing::dom::{
    element_text, find_header_cell, following_table, row_cells, table_rows,
};
use scraper::ElementRef;
use std::collections::BTreeMap;
use tracing::debug;

pub struct LottoPoolExtractor;

impl LottoPoolExtractor {
    fn pool(scope: ElementRef<'_>, pool: &PoolLabel, ctx: &ExtractContext) -> PoolDraw {
        let Some(table) = find_header_cell(scope, &[pool.label.as_str()])
            .and_then(|header| following_table(scope, header))
        else {
            debug!("Pool '{}' not present in block", pool.label);
            return PoolDraw::default();
        };

        let rows = table_rows(table);

        let numbers = rows
            .get(1)
            .map(|row| {
                row_cells(*row)
                    .iter()
                    .map(element_text)
                    .filter(|text| !ctx.is_separator(text))
                    .collect()
            })
            .unwrap_or_default();

        let jackpots = rows
            .iter()
            .skip(2)
            .filter_map(|row| row.select(&ctx.value).next())
            .map(|cell| element_text(&cell))
            .filter(|text| !ctx.is_placeholder(text))
            .collect();

        PoolDraw { numbers, jackpots }
    }
}

/// Whether any of the operator's pool headers appears within `scope`
pub fn has_pool_header(scope: ElementRef<'_>, descriptor: &OperatorDescriptor) -> bool {
    descriptor
        .pools
        .iter()
        .any(|pool| find_header_cell(scope, &[pool.label.as_str()]).is_some())
}

impl FieldExtractor for LottoPoolExtractor {
    fn extract(
        &self,
        scope: ElementRef<'_>,
        descriptor: &OperatorDescriptor,
        ctx: &ExtractContext,
    ) -> PartialDraw {
        let mut partial = extract_common(scope, ctx);

        partial.variant = match descriptor.pools.as_slice() {
            [] => None,
            [single] => {
                let PoolDraw { numbers, jackpots } = Self::pool(scope, single, ctx);
                Some(Variant::Pool {
                    pool: numbers,
                    jackpots,
                })
            }
            many => {
                let pools: BTreeMap<String, PoolDraw> = many
                    .iter()
                    .map(|pool| (pool.key.clone(), Self::pool(scope, pool, ctx)))
                    .collect();
                Some(Variant::Pools { pools })
            }
        };

        partial
    }
}

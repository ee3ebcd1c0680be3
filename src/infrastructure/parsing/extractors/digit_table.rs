//! 5D and 6D table extractors
//!
//! Both read the rows of the table following their digit-count header. The
//! first row is the column header; rows shorter than the format needs are
//! skipped, never padded.

use super::common::extract_common;
use super::{FieldExtractor, PartialDraw};
use crate::domain::{FiveDigitRow, OperatorDescriptor, SixDigitRow, Variant};
use crate::infrastructure::parsing::context::ExtractContext;
use crate::infrastructure::parsing::dom::{
    element_text, find_header_cell, following_table, row_cells, table_rows,
};
use scraper::ElementRef;
use tracing::debug;

/// Cell texts of every data row with at least `width` cells
fn data_rows(scope: ElementRef<'_>, label: &str, width: usize) -> Vec<Vec<String>> {
    let Some(table) = find_header_cell(scope, &[label]).and_then(|h| following_table(scope, h))
    else {
        debug!("No {} table found", label);
        return Vec::new();
    };

    table_rows(table)
        .into_iter()
        .skip(1)
        .map(|row| {
            row_cells(row)
                .iter()
                .map(element_text)
                .collect::<Vec<_>>()
        })
        .filter(|cells| cells.len() >= width)
        .collect()
}

pub struct FiveDigitExtractor;

impl FieldExtractor for FiveDigitExtractor {
    fn extract(
        &self,
        scope: ElementRef<'_>,
        _descriptor: &OperatorDescriptor,
        ctx: &ExtractContext,
    ) -> PartialDraw {
        let mut partial = extract_common(scope, ctx);

        let data = data_rows(scope, &ctx.labels.five_digit, 2)
            .into_iter()
            .map(|cells| {
                let mut cells = cells.into_iter();
                FiveDigitRow {
                    label: cells.next().unwrap_or_default(),
                    number: cells.next().unwrap_or_default(),
                }
            })
            .collect();

        partial.variant = Some(Variant::FiveDigit { data });
        partial
    }
}

pub struct SixDigitExtractor;

impl FieldExtractor for SixDigitExtractor {
    fn extract(
        &self,
        scope: ElementRef<'_>,
        _descriptor: &OperatorDescriptor,
        ctx: &ExtractContext,
    ) -> PartialDraw {
        let mut partial = extract_common(scope, ctx);

        let data = data_rows(scope, &ctx.labels.six_digit, 3)
            .into_iter()
            .map(|cells| {
                let mut cells = cells.into_iter();
                SixDigitRow {
                    label: cells.next().unwrap_or_default(),
                    number: cells.next().unwrap_or_default(),
                    extra: cells.next().unwrap_or_default(),
                }
            })
            .collect();

        partial.variant = Some(Variant::SixDigit { data });
        partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DrawFormat;
    use crate::infrastructure::parsing::config::ParsingConfig;
    use scraper::Html;

    fn ctx() -> ExtractContext {
        ExtractContext::new(&ParsingConfig::default()).unwrap()
    }

    #[test]
    fn test_five_digit_rows_skip_header_and_short_rows() {
        let html = Html::parse_fragment(
            r#"<div class="outerbox">
                 <table><tr><td>5D</td></tr></table>
                 <table>
                   <tr><th>Prize</th><th>Number</th></tr>
                   <tr><td>1st</td><td>12345</td></tr>
                   <tr><td>orphan</td></tr>
                   <tr><td>2nd</td><td>23456</td></tr>
                 </table>
               </div>"#,
        );
        let descriptor = OperatorDescriptor::new(
            "sportstoto_5d",
            "SportsToto 5D",
            "resulttotolable",
            DrawFormat::FiveDigitTable,
        );
        let partial = FiveDigitExtractor.extract(html.root_element(), &descriptor, &ctx());

        assert_eq!(
            partial.variant,
            Some(Variant::FiveDigit {
                data: vec![
                    FiveDigitRow {
                        label: "1st".into(),
                        number: "12345".into()
                    },
                    FiveDigitRow {
                        label: "2nd".into(),
                        number: "23456".into()
                    },
                ]
            })
        );
    }

    #[test]
    fn test_six_digit_rows_need_three_cells() {
        let html = Html::parse_fragment(
            r#"<div class="outerbox">
                 <table><tr><td>6D</td></tr></table>
                 <table>
                   <tr><th>Prize</th><th>Number</th><th>Amount</th></tr>
                   <tr><td>1st</td><td>123456</td><td>RM 100,000</td></tr>
                   <tr><td>2nd</td><td>12345</td></tr>
                 </table>
               </div>"#,
        );
        let descriptor = OperatorDescriptor::new(
            "sportstoto_6d",
            "SportsToto 6D",
            "resulttotolable",
            DrawFormat::SixDigitTable,
        );
        let partial = SixDigitExtractor.extract(html.root_element(), &descriptor, &ctx());

        assert_eq!(
            partial.variant,
            Some(Variant::SixDigit {
                data: vec![SixDigitRow {
                    label: "1st".into(),
                    number: "123456".into(),
                    extra: "RM 100,000".into(),
                }]
            })
        );
    }
}

//! Shared extraction routine and the plain 4D extractor

use super::{FieldExtractor, PartialDraw};
use crate::domain::{OperatorDescriptor, TopThree};
use crate::infrastructure::parsing::context::ExtractContext;
use crate::infrastructure::parsing::dom::{
    element_text, enclosing, find_header_cell, row_cells, table_rows,
};
use scraper::{ElementRef, Selector};

/// Date, draw number, top three, special and consolation of a scope
pub fn extract_common(scope: ElementRef<'_>, ctx: &ExtractContext) -> PartialDraw {
    let date_cells: Vec<ElementRef<'_>> = scope.select(&ctx.draw_date).collect();

    let draw_date = date_cells.first().and_then(|cell| {
        let text = element_text(cell);
        match ctx.date_pattern.captures(&text) {
            Some(captures) => captures.get(1).map(|m| m.as_str().to_string()),
            // Kept raw so the normalizer can flag it
            None => (!text.is_empty()).then_some(text),
        }
    });

    let draw_number = date_cells.get(1).and_then(|cell| {
        let text = element_text(cell);
        let number = text.replace(&ctx.draw_number_label, "").trim().to_string();
        (!ctx.is_placeholder(&number)).then_some(number)
    });

    let special_labels: Vec<&str> = ctx.labels.special.iter().map(String::as_str).collect();
    let consolation_labels: Vec<&str> =
        ctx.labels.consolation.iter().map(String::as_str).collect();

    PartialDraw {
        draw_date,
        draw_number,
        prizes: top_three(scope, &ctx.top_prize, ctx),
        special_numbers: collect_section(scope, &special_labels, ctx),
        consolation_numbers: collect_section(scope, &consolation_labels, ctx),
        variant: None,
    }
}

/// First three top-prize cells, mapped positionally to 1st/2nd/3rd
pub fn top_three(scope: ElementRef<'_>, top_prize: &Selector, ctx: &ExtractContext) -> TopThree {
    let mut prizes = scope.select(top_prize).map(|cell| {
        let text = element_text(&cell);
        if ctx.is_placeholder(&text) {
            String::new()
        } else {
            text
        }
    });

    TopThree {
        first: prizes.next().unwrap_or_default(),
        second: prizes.next().unwrap_or_default(),
        third: prizes.next().unwrap_or_default(),
    }
}

/// Value cells of the rows following a section header, up to the end of
/// its table or the next section header
///
/// The header cut-off is intentional: when special and consolation share one
/// table, each section keeps only its own rows.
fn collect_section(scope: ElementRef<'_>, labels: &[&str], ctx: &ExtractContext) -> Vec<String> {
    let Some(header) = find_header_cell(scope, labels) else {
        return Vec::new();
    };
    let Some(header_row) = enclosing(header, "tr") else {
        return Vec::new();
    };
    let Some(table) = enclosing(header_row, "table") else {
        return Vec::new();
    };

    let is_section_header = |row: &ElementRef<'_>| {
        row_cells(*row).iter().any(|cell| {
            let text = element_text(cell);
            ctx.labels.section_headers().any(|label| label == text)
        })
    };

    table_rows(table)
        .into_iter()
        .skip_while(|row| row.id() != header_row.id())
        .skip(1)
        .take_while(|row| !is_section_header(row))
        .flat_map(|row| {
            row.select(&ctx.value)
                .map(|cell| element_text(&cell))
                .collect::<Vec<_>>()
        })
        .filter(|number| !ctx.is_placeholder(number))
        .collect()
}

/// Plain 4D results: the shared routine alone
pub struct StandardExtractor;

impl FieldExtractor for StandardExtractor {
    fn extract(
        &self,
        scope: ElementRef<'_>,
        _descriptor: &OperatorDescriptor,
        ctx: &ExtractContext,
    ) -> PartialDraw {
        extract_common(scope, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::parsing::config::ParsingConfig;
    use scraper::Html;

    const MAGNUM_BLOCK: &str = r#"
        <div class="outerbox">
          <table>
            <tr><td class="resultm4dlable">Magnum 4D</td></tr>
            <tr>
              <td class="resultdrawdate">Date: 25-02-2026 (Wed)</td>
              <td class="resultdrawdate">Draw No: 1234/26</td>
            </tr>
          </table>
          <table>
            <tr><td>1st Prize</td><td class="resulttop">1234</td></tr>
            <tr><td>2nd Prize</td><td class="resulttop">5678</td></tr>
            <tr><td>3rd Prize</td><td class="resulttop">9012</td></tr>
          </table>
          <table>
            <tr><td colspan="5">Special 特別獎</td></tr>
            <tr><td colspan="5">Special</td></tr>
            <tr><td class="resultbottom">0001</td><td class="resultbottom">----</td><td class="resultbottom">0003</td></tr>
            <tr><td class="resultbottom">0004</td><td class="resultbottom"></td></tr>
            <tr><td colspan="5">Consolation</td></tr>
            <tr><td class="resultbottom">1111</td><td class="resultbottom">1112</td></tr>
          </table>
        </div>"#;

    fn ctx() -> ExtractContext {
        ExtractContext::new(&ParsingConfig::default()).unwrap()
    }

    #[test]
    fn test_common_fields_from_standard_block() {
        let html = Html::parse_fragment(MAGNUM_BLOCK);
        let partial = extract_common(html.root_element(), &ctx());

        assert_eq!(partial.draw_date.as_deref(), Some("25-02-2026"));
        assert_eq!(partial.draw_number.as_deref(), Some("1234/26"));
        assert_eq!(partial.prizes.first, "1234");
        assert_eq!(partial.prizes.second, "5678");
        assert_eq!(partial.prizes.third, "9012");
    }

    #[test]
    fn test_sections_stop_at_next_header_and_drop_sentinels() {
        let html = Html::parse_fragment(MAGNUM_BLOCK);
        let partial = extract_common(html.root_element(), &ctx());

        assert_eq!(partial.special_numbers, vec!["0001", "0003", "0004"]);
        assert_eq!(partial.consolation_numbers, vec!["1111", "1112"]);
    }

    #[test]
    fn test_missing_cells_leave_fields_empty() {
        let html = Html::parse_fragment(
            r#"<div class="outerbox"><table><tr><td class="resulttop">----</td></tr></table></div>"#,
        );
        let partial = extract_common(html.root_element(), &ctx());

        assert_eq!(partial.draw_date, None);
        assert_eq!(partial.draw_number, None);
        assert!(partial.prizes.is_empty());
        assert!(partial.special_numbers.is_empty());
    }

    #[test]
    fn test_unrecognized_date_text_is_kept_raw() {
        let html = Html::parse_fragment(
            r#"<table><tr><td class="resultdrawdate">----</td></tr></table>"#,
        );
        let partial = extract_common(html.root_element(), &ctx());
        assert_eq!(partial.draw_date.as_deref(), Some("----"));
    }
}

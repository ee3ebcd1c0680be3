//! DOM navigation helpers shared by the locator, resolver and extractors
//!
//! The result page is table soup: sections are found by a header cell's text
//! and their data lives in the rows that follow it, or in the next table.

use super::{ParsingError, ParsingResult};
use scraper::{ElementRef, Selector};
use tracing::warn;

/// Compile a selector, reporting which one failed
pub fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| {
        warn!("Failed to compile selector '{}': {}", selector, e);
        ParsingError::invalid_selector(selector, e)
    })
}

/// Collapse runs of whitespace and trim
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-normalized text content of an element
pub fn element_text(element: &ElementRef<'_>) -> String {
    normalize_ws(&element.text().collect::<Vec<_>>().join(" "))
}

fn is_tag(element: &ElementRef<'_>, tag: &str) -> bool {
    element.value().name().eq_ignore_ascii_case(tag)
}

fn is_cell(element: &ElementRef<'_>) -> bool {
    is_tag(element, "td") || is_tag(element, "th")
}

/// Elements in `scope` (itself included) carrying `class`
pub fn elements_with_class<'a>(
    scope: ElementRef<'a>,
    class: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    scope
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |e| e.value().classes().any(|c| c == class))
}

/// First table/header cell whose text equals one of `labels`
pub fn find_header_cell<'a>(scope: ElementRef<'a>, labels: &[&str]) -> Option<ElementRef<'a>> {
    scope
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(is_cell)
        .find(|cell| {
            let text = element_text(cell);
            labels.iter().any(|label| text == *label)
        })
}

/// Nearest ancestor with the given tag name
pub fn enclosing<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| is_tag(e, tag))
}

/// First `<table>` after `anchor` in document order, within `scope`
pub fn following_table<'a>(scope: ElementRef<'a>, anchor: ElementRef<'a>) -> Option<ElementRef<'a>> {
    let anchor_id = anchor.id();
    scope
        .descendants()
        .skip_while(|node| node.id() != anchor_id)
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|e| is_tag(e, "table"))
}

/// Rows owned by `table` (not by nested tables), in order
pub fn table_rows<'a>(table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        if is_tag(&child, "tr") {
            rows.push(child);
        } else if is_tag(&child, "tbody") || is_tag(&child, "thead") || is_tag(&child, "tfoot") {
            rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|e| is_tag(e, "tr")),
            );
        }
    }
    rows
}

/// Direct cells of a row
pub fn row_cells<'a>(row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(is_cell)
        .collect()
}

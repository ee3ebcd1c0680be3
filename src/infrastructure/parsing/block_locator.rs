//! Block locator
//!
//! Splits the results page into per-operator blocks using one structural
//! container selector. Which operator a block belongs to is decided later by
//! the company resolver.

use super::config::ParsingConfig;
use super::dom::compile_selector;
use super::ParsingResult;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// One located result block; borrows the parsed document
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    /// Position among located blocks, for diagnostics
    pub index: usize,
    pub element: ElementRef<'a>,
}

impl<'a> Block<'a> {
    pub fn new(index: usize, element: ElementRef<'a>) -> Self {
        Self { index, element }
    }
}

pub struct BlockLocator {
    container: Selector,
}

impl BlockLocator {
    pub fn new(config: &ParsingConfig) -> ParsingResult<Self> {
        Ok(Self {
            container: compile_selector(&config.block_selector)?,
        })
    }

    /// Every container in document order; an empty page yields no blocks
    pub fn locate<'a>(&self, document: &'a Html) -> Vec<Block<'a>> {
        let blocks: Vec<Block<'a>> = document
            .select(&self.container)
            .enumerate()
            .map(|(index, element)| Block::new(index, element))
            .collect();

        debug!("Located {} result blocks", blocks.len());
        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locates_blocks_in_document_order() {
        let locator = BlockLocator::new(&ParsingConfig::default()).unwrap();
        let html = Html::parse_document(
            r#"<div class="outerbox" id="a"></div>
               <div class="wrapper"><div class="outerbox" id="b"></div></div>"#,
        );

        let blocks = locator.locate(&html);
        let ids: Vec<_> = blocks
            .iter()
            .map(|b| b.element.value().attr("id").unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(blocks[1].index, 1);
    }

    #[test]
    fn test_empty_document_yields_no_blocks() {
        let locator = BlockLocator::new(&ParsingConfig::default()).unwrap();
        let html = Html::parse_document("<html><body><p>maintenance</p></body></html>");

        assert!(locator.locate(&html).is_empty());
    }

    #[test]
    fn test_invalid_container_selector_fails_construction() {
        let config = ParsingConfig {
            block_selector: "div..outerbox".to_string(),
            ..ParsingConfig::default()
        };
        assert!(BlockLocator::new(&config).is_err());
    }
}

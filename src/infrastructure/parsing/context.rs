//! Extraction context
//!
//! Selectors and patterns compiled once from `ParsingConfig` and shared by
//! every extractor for the duration of a run.

use super::config::{ParsingConfig, SectionLabels};
use super::dom::compile_selector;
use super::{ParsingError, ParsingResult};
use regex::Regex;
use scraper::Selector;

/// Compiled parsing configuration
#[derive(Debug)]
pub struct ExtractContext {
    pub draw_date: Selector,
    pub top_prize: Selector,
    pub value: Selector,
    pub section: Selector,
    /// `DD-MM-YYYY` anywhere in the date cell
    pub date_pattern: Regex,
    pub labels: SectionLabels,
    pub sentinel: String,
    pub separator_tokens: Vec<String>,
    pub draw_number_label: String,
}

impl ExtractContext {
    pub fn new(config: &ParsingConfig) -> ParsingResult<Self> {
        if config.sentinel.is_empty() {
            return Err(ParsingError::configuration(
                "sentinel",
                "sentinel placeholder must not be empty",
            ));
        }

        let pattern = r"(\d{2}-\d{2}-\d{4})";
        let date_pattern = Regex::new(pattern).map_err(|e| ParsingError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            draw_date: compile_selector(&config.cells.draw_date)?,
            top_prize: compile_selector(&config.cells.top_prize)?,
            value: compile_selector(&config.cells.value)?,
            section: compile_selector(&config.section_selector)?,
            date_pattern,
            labels: config.labels.clone(),
            sentinel: config.sentinel.clone(),
            separator_tokens: config.separator_tokens.clone(),
            draw_number_label: config.draw_number_label.clone(),
        })
    }

    /// Empty cells and the sentinel carry no number
    pub fn is_placeholder(&self, text: &str) -> bool {
        text.is_empty() || text == self.sentinel
    }

    pub fn is_separator(&self, text: &str) -> bool {
        self.is_placeholder(text) || self.separator_tokens.iter().any(|t| t == text)
    }
}

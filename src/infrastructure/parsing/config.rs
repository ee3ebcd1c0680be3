//! Parsing configuration for result extraction
//!
//! Centralized configuration for CSS selectors, marker classes and the label
//! sets used to find sections inside a result block.

use serde::{Deserialize, Serialize};

/// Main parsing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Structural container of one result block
    pub block_selector: String,

    /// Optional sub-panels of a composite block, matched in document order
    pub section_selector: String,

    /// Marker classes searched by the text fallback besides the registry ones
    pub extra_marker_classes: Vec<String>,

    /// Cell selectors shared by every format
    pub cells: CellSelectors,

    /// Section header labels
    pub labels: SectionLabels,

    /// Explicit "nothing drawn here" placeholder
    pub sentinel: String,

    /// Placeholder cells between lotto numbers
    pub separator_tokens: Vec<String>,

    /// Prefix removed from the draw number cell
    pub draw_number_label: String,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            block_selector: "div.outerbox".to_string(),
            section_selector: "div.subbox".to_string(),
            extra_marker_classes: vec!["resultlable".to_string()],
            cells: CellSelectors::default(),
            labels: SectionLabels::default(),
            sentinel: "----".to_string(),
            separator_tokens: vec![
                "+".to_string(),
                "----".to_string(),
                "|".to_string(),
                "-".to_string(),
            ],
            draw_number_label: "Draw No:".to_string(),
        }
    }
}

/// CSS selectors for result cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellSelectors {
    /// Date cell, followed by the draw number cell
    pub draw_date: String,

    /// 1st/2nd/3rd prize cells, in order
    pub top_prize: String,

    /// Special/consolation/jackpot value cells
    pub value: String,

    /// Embedded operator logo
    pub logo: String,
}

impl Default for CellSelectors {
    fn default() -> Self {
        Self {
            draw_date: "td.resultdrawdate".to_string(),
            top_prize: "td.resulttop".to_string(),
            value: "td.resultbottom".to_string(),
            logo: "img[alt]".to_string(),
        }
    }
}

/// Header labels that open a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionLabels {
    pub special: Vec<String>,
    pub consolation: Vec<String>,
    pub three_digit: String,
    pub five_digit: String,
    pub six_digit: String,
}

impl Default for SectionLabels {
    fn default() -> Self {
        Self {
            special: vec![
                "Special".to_string(),
                "特別獎".to_string(),
                "特别奖".to_string(),
            ],
            consolation: vec![
                "Consolation".to_string(),
                "安慰獎".to_string(),
                "安慰奖".to_string(),
            ],
            three_digit: "3D".to_string(),
            five_digit: "5D".to_string(),
            six_digit: "6D".to_string(),
        }
    }
}

impl SectionLabels {
    /// Every label that opens a special or consolation section
    pub fn section_headers(&self) -> impl Iterator<Item = &str> {
        self.special
            .iter()
            .chain(self.consolation.iter())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: ParsingConfig =
            serde_json::from_str(r#"{ "block_selector": "div.result" }"#).unwrap();

        assert_eq!(config.block_selector, "div.result");
        assert_eq!(config.sentinel, "----");
        assert_eq!(config.cells, CellSelectors::default());
    }

    #[test]
    fn test_section_headers_are_bilingual() {
        let labels = SectionLabels::default();
        let headers: Vec<_> = labels.section_headers().collect();
        assert!(headers.contains(&"Special"));
        assert!(headers.contains(&"安慰獎"));
    }
}

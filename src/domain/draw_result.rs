//! Canonical draw result record
//!
//! `DrawResult` is the one schema every operator is normalized into. It is
//! only constructed through [`DrawResultBuilder`], which starts from explicit
//! empty values so a serialized record never lacks a key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top three prizes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopThree {
    #[serde(rename = "1st")]
    pub first: String,
    #[serde(rename = "2nd")]
    pub second: String,
    #[serde(rename = "3rd")]
    pub third: String,
}

impl TopThree {
    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.second.is_empty() && self.third.is_empty()
    }
}

/// One row of a 5D table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiveDigitRow {
    pub label: String,
    pub number: String,
}

/// One row of a 6D table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SixDigitRow {
    pub label: String,
    pub number: String,
    pub extra: String,
}

/// Drawn numbers and jackpot values of one lotto pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDraw {
    pub numbers: Vec<String>,
    pub jackpots: Vec<String>,
}

/// Format-specific payload, flattened into the record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Variant {
    /// 3D sub-game prizes
    TopThree { data: TopThree },
    FiveDigit { data: Vec<FiveDigitRow> },
    SixDigit { data: Vec<SixDigitRow> },
    /// Single lotto pool
    Pool {
        #[serde(rename = "data")]
        pool: Vec<String>,
        jackpots: Vec<String>,
    },
    /// Several lotto pools keyed by pool key
    Pools {
        #[serde(flatten)]
        pools: BTreeMap<String, PoolDraw>,
    },
}

/// Canonical per-operator record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawResult {
    /// Canonical operator id; names the output file rather than living in it
    #[serde(skip)]
    pub operator_id: String,
    /// `YYYY-MM-DD`, or empty when unknown
    pub draw_date: String,
    #[serde(rename = "draw_no")]
    pub draw_number: String,
    #[serde(flatten)]
    pub prizes: TopThree,
    #[serde(rename = "special")]
    pub special_numbers: Vec<String>,
    #[serde(rename = "consolation")]
    pub consolation_numbers: Vec<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub variant: Option<Variant>,
}

impl DrawResult {
    pub fn builder(operator_id: impl Into<String>) -> DrawResultBuilder {
        DrawResultBuilder::new(operator_id)
    }

    /// Pretty JSON body as written to the archive
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Builder that initializes every field to its explicit empty value
#[derive(Debug, Clone)]
pub struct DrawResultBuilder {
    inner: DrawResult,
}

impl DrawResultBuilder {
    pub fn new(operator_id: impl Into<String>) -> Self {
        Self {
            inner: DrawResult {
                operator_id: operator_id.into(),
                draw_date: String::new(),
                draw_number: String::new(),
                prizes: TopThree::default(),
                special_numbers: Vec::new(),
                consolation_numbers: Vec::new(),
                kind: None,
                variant: None,
            },
        }
    }

    pub fn draw_date(mut self, date: impl Into<String>) -> Self {
        self.inner.draw_date = date.into();
        self
    }

    pub fn draw_number(mut self, number: impl Into<String>) -> Self {
        self.inner.draw_number = number.into();
        self
    }

    pub fn prizes(mut self, prizes: TopThree) -> Self {
        self.inner.prizes = prizes;
        self
    }

    pub fn special_numbers(mut self, numbers: Vec<String>) -> Self {
        self.inner.special_numbers = numbers;
        self
    }

    pub fn consolation_numbers(mut self, numbers: Vec<String>) -> Self {
        self.inner.consolation_numbers = numbers;
        self
    }

    pub fn kind(mut self, kind: Option<&str>) -> Self {
        self.inner.kind = kind.map(str::to_string);
        self
    }

    pub fn variant(mut self, variant: Option<Variant>) -> Self {
        self.inner.variant = variant;
        self
    }

    pub fn build(self) -> DrawResult {
        self.inner
    }
}

/// Date and draw number harvested once from the first located block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentDefaults {
    pub draw_date: Option<String>,
    pub draw_number: Option<String>,
}

/// Optional `latest.json` convenience artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub draw_date: String,
    pub draw_no: String,
}

//! Normalizer
//!
//! Merges an extractor's partial result with the document defaults into the
//! canonical record. Block-local values win; absent values stay empty. A date
//! that is present but unreadable becomes the processing date, which is
//! reported as a data-quality note.

use super::extractors::PartialDraw;
use crate::domain::{Diagnostic, DocumentDefaults, DrawResult};
use chrono::{FixedOffset, NaiveDate, Utc};
use tracing::{debug, warn};

const SOURCE_DATE_FORMAT: &str = "%d-%m-%Y";
const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// `DD-MM-YYYY` anywhere in `text`, as a date
pub fn parse_draw_date(text: &str) -> Option<NaiveDate> {
    text.split(|c: char| c.is_whitespace() || c == '(' || c == ')' || c == ':')
        .find_map(|token| NaiveDate::parse_from_str(token, SOURCE_DATE_FORMAT).ok())
}

/// Today's date at the given UTC offset
pub fn processing_date(utc_offset_hours: i32) -> NaiveDate {
    match FixedOffset::east_opt(utc_offset_hours * 3600) {
        Some(offset) => Utc::now().with_timezone(&offset).date_naive(),
        None => {
            warn!("Invalid UTC offset {}h, using UTC", utc_offset_hours);
            Utc::now().date_naive()
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    processing_date: NaiveDate,
}

impl Normalizer {
    pub fn new(processing_date: NaiveDate) -> Self {
        Self { processing_date }
    }

    pub fn processing_date(&self) -> NaiveDate {
        self.processing_date
    }

    pub fn normalize(
        &self,
        operator_id: &str,
        record_type: Option<&str>,
        partial: PartialDraw,
        defaults: &DocumentDefaults,
    ) -> (DrawResult, Option<Diagnostic>) {
        let PartialDraw {
            draw_date,
            draw_number,
            prizes,
            special_numbers,
            consolation_numbers,
            variant,
        } = partial;

        let raw_date = draw_date.or_else(|| defaults.draw_date.clone());
        let (date, diagnostic) = match raw_date {
            None => (String::new(), None),
            Some(raw) => match parse_draw_date(&raw) {
                Some(parsed) => (parsed.format(CANONICAL_DATE_FORMAT).to_string(), None),
                None => {
                    let substituted = self.processing_date.format(CANONICAL_DATE_FORMAT).to_string();
                    debug!(
                        "Unreadable date '{}' for '{}', using {}",
                        raw, operator_id, substituted
                    );
                    let note = Diagnostic::MalformedDate {
                        operator_id: operator_id.to_string(),
                        raw,
                        substituted: substituted.clone(),
                    };
                    (substituted, Some(note))
                }
            },
        };

        let number = draw_number
            .or_else(|| defaults.draw_number.clone())
            .unwrap_or_default();

        let result = DrawResult::builder(operator_id)
            .draw_date(date)
            .draw_number(number)
            .prizes(prizes)
            .special_numbers(special_numbers)
            .consolation_numbers(consolation_numbers)
            .kind(record_type)
            .variant(variant)
            .build();

        (result, diagnostic)
    }
}

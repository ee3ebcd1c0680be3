//! The sentinel placeholder never reaches a record

use std::sync::Arc;

use chrono::NaiveDate;
use fourd_harvest_lib::application::HarvestService;
use fourd_harvest_lib::domain::{DrawFormat, OperatorDescriptor, OperatorRegistry};
use fourd_harvest_lib::infrastructure::ParsingConfig;
use proptest::prelude::*;

fn service() -> HarvestService {
    let registry = OperatorRegistry::new(vec![OperatorDescriptor::new(
        "magnum",
        "Magnum 4D",
        "resultm4dlable",
        DrawFormat::Standard,
    )])
    .unwrap();
    HarvestService::new(
        Arc::new(registry),
        &ParsingConfig::default(),
        NaiveDate::from_ymd_opt(2026, 2, 25).unwrap(),
    )
    .unwrap()
}

fn cell_value() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[0-9]{4}",
        1 => Just("----".to_string()),
        1 => Just(String::new()),
    ]
}

fn row(values: &[String]) -> String {
    let cells: String = values
        .iter()
        .map(|v| format!(r#"<td class="resultbottom">{v}</td>"#))
        .collect();
    format!("<tr>{cells}</tr>")
}

proptest! {
    #[test]
    fn sections_keep_numbers_in_order_and_drop_placeholders(
        special in prop::collection::vec(cell_value(), 0..13),
        consolation in prop::collection::vec(cell_value(), 0..13),
    ) {
        let html = format!(
            r#"<div class="outerbox">
                 <table><tr><td class="resultm4dlable">Magnum 4D</td></tr></table>
                 <table>
                   <tr><td>Special</td></tr>{}
                   <tr><td>Consolation</td></tr>{}
                 </table>
               </div>"#,
            row(&special),
            row(&consolation),
        );

        let outcome = service().harvest(&html);
        prop_assert_eq!(outcome.results.len(), 1);
        let record = &outcome.results[0];

        let expected = |values: &[String]| -> Vec<String> {
            values.iter().filter(|v| !v.is_empty() && *v != "----").cloned().collect()
        };
        prop_assert_eq!(&record.special_numbers, &expected(&special));
        prop_assert_eq!(&record.consolation_numbers, &expected(&consolation));
    }
}

//! Run-level diagnostics
//!
//! Extraction problems never abort a run. They are collected here and
//! surfaced to the caller as a summary at the end.

use serde::Serialize;
use std::fmt;

/// Non-fatal finding recorded during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Registry operator with no record after the run
    BlockNotFound { operator_id: String },
    /// Resolved display name absent from the name table
    UnknownOperator { block_index: usize, name: String },
    /// Second block resolving to an already emitted operator
    DuplicateOperator { block_index: usize, operator_id: String },
    /// Date text present but not parseable; processing date substituted
    MalformedDate {
        operator_id: String,
        raw: String,
        substituted: String,
    },
    /// Composite section count differs from its sub-handler list
    CompositeMismatch {
        operator_id: String,
        expected: usize,
        detected: usize,
    },
    /// Block without any usable label
    Unresolved { block_index: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockNotFound { operator_id } => {
                write!(f, "no block found for operator '{operator_id}'")
            }
            Self::UnknownOperator { block_index, name } => {
                write!(f, "block #{block_index}: unknown operator name '{name}'")
            }
            Self::DuplicateOperator {
                block_index,
                operator_id,
            } => write!(
                f,
                "block #{block_index}: duplicate operator '{operator_id}' discarded"
            ),
            Self::MalformedDate {
                operator_id,
                raw,
                substituted,
            } => write!(
                f,
                "operator '{operator_id}': unparseable date '{raw}', using {substituted}"
            ),
            Self::CompositeMismatch {
                operator_id,
                expected,
                detected,
            } => write!(
                f,
                "composite '{operator_id}': expected {expected} sections, detected {detected}"
            ),
            Self::Unresolved { block_index } => {
                write!(f, "block #{block_index}: no operator label found")
            }
        }
    }
}

/// Diagnostics of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub blocks_located: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Operator ids reported as missing, in registry order
    pub fn missing_operators(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::BlockNotFound { operator_id } => Some(operator_id.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn duplicate_operators(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::DuplicateOperator { operator_id, .. } => Some(operator_id.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn unknown_names(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::UnknownOperator { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn data_quality_notes(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::MalformedDate { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_partitions_diagnostics() {
        let mut report = RunReport::default();
        report.push(Diagnostic::BlockNotFound {
            operator_id: "sabah".into(),
        });
        report.push(Diagnostic::DuplicateOperator {
            block_index: 4,
            operator_id: "magnum".into(),
        });
        report.push(Diagnostic::UnknownOperator {
            block_index: 7,
            name: "Perdana 4D".into(),
        });

        assert_eq!(report.missing_operators(), vec!["sabah"]);
        assert_eq!(report.duplicate_operators(), vec!["magnum"]);
        assert_eq!(report.unknown_names(), vec!["Perdana 4D"]);
        assert_eq!(report.data_quality_notes(), 0);
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::CompositeMismatch {
            operator_id: "sportstoto_lotto".into(),
            expected: 3,
            detected: 2,
        };
        assert_eq!(
            d.to_string(),
            "composite 'sportstoto_lotto': expected 3 sections, detected 2"
        );
    }
}

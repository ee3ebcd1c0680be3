//! Lottery operator registry
//!
//! Every operator the harvester knows about is described once, at startup,
//! by an [`OperatorDescriptor`]. The registry is immutable after it is built
//! and is shared by `Arc` between the resolver and the extractors.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Extraction format of an operator's result block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawFormat {
    /// 1st/2nd/3rd + special + consolation
    Standard,
    /// 3D sub-game table
    ThreeDigit,
    /// Label + number rows
    FiveDigitTable,
    /// Label + number + tertiary column rows
    SixDigitTable,
    /// Up to three named jackpot pools
    LottoPool,
    /// One container holding several operators' results
    Composite,
}

/// Named pool of a lotto game (e.g. `star` → "Star Toto 6/50")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolLabel {
    pub key: String,
    pub label: String,
}

impl PoolLabel {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// Static description of one lottery operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorDescriptor {
    /// Canonical key, also the output file stem
    pub id: String,
    /// Name as printed on the results page
    pub display_name: String,
    /// Marker classes that label this operator's block
    #[serde(default)]
    pub match_tokens: Vec<String>,
    pub format: DrawFormat,
    /// Pool labels for `LottoPool` operators
    #[serde(default)]
    pub pools: Vec<PoolLabel>,
    /// Ordered sub-handler list for `Composite` operators
    #[serde(default)]
    pub members: Vec<String>,
    /// Value of the record's `type` key; `None` writes `null`
    #[serde(default)]
    pub record_type: Option<String>,
}

impl OperatorDescriptor {
    pub fn new(id: &str, display_name: &str, marker: &str, format: DrawFormat) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            match_tokens: if marker.is_empty() {
                Vec::new()
            } else {
                vec![marker.to_string()]
            },
            format,
            pools: Vec::new(),
            members: Vec::new(),
            record_type: None,
        }
    }

    pub fn with_pools(mut self, pools: Vec<PoolLabel>) -> Self {
        self.pools = pools;
        self
    }

    pub fn with_members(mut self, members: &[&str]) -> Self {
        self.members = members.iter().map(|m| (*m).to_string()).collect();
        self
    }

    /// Tag the record's `type` key with the operator's own id
    pub fn typed(self) -> Self {
        let tag = self.id.clone();
        self.with_record_type(&tag)
    }

    pub fn with_record_type(mut self, tag: &str) -> Self {
        self.record_type = Some(tag.to_string());
        self
    }

    /// Composite descriptors are block handles; they emit no record of their own
    pub fn is_composite(&self) -> bool {
        self.format == DrawFormat::Composite
    }
}

/// Registry construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate operator id '{0}'")]
    DuplicateId(String),

    #[error("Duplicate display name '{0}'")]
    DuplicateDisplayName(String),

    #[error("Composite '{composite}' references unknown member '{member}'")]
    UnknownMember { composite: String, member: String },

    #[error("Composite '{composite}' member '{member}' is itself composite")]
    NestedComposite { composite: String, member: String },

    #[error("Operator '{id}' declares {count} pools (at most 3)")]
    TooManyPools { id: String, count: usize },
}

/// Immutable, process-wide operator registry
#[derive(Debug, Clone)]
pub struct OperatorRegistry {
    operators: Vec<OperatorDescriptor>,
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, String>,
}

impl OperatorRegistry {
    /// Build and validate a registry
    pub fn new(operators: Vec<OperatorDescriptor>) -> Result<Self, RegistryError> {
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();

        for (index, op) in operators.iter().enumerate() {
            if by_id.insert(op.id.clone(), index).is_some() {
                return Err(RegistryError::DuplicateId(op.id.clone()));
            }
            if by_name
                .insert(op.display_name.clone(), op.id.clone())
                .is_some()
            {
                return Err(RegistryError::DuplicateDisplayName(op.display_name.clone()));
            }
            if op.pools.len() > 3 {
                return Err(RegistryError::TooManyPools {
                    id: op.id.clone(),
                    count: op.pools.len(),
                });
            }
        }

        for op in operators.iter().filter(|op| op.is_composite()) {
            for member in &op.members {
                let Some(&index) = by_id.get(member) else {
                    return Err(RegistryError::UnknownMember {
                        composite: op.id.clone(),
                        member: member.clone(),
                    });
                };
                if operators[index].is_composite() {
                    return Err(RegistryError::NestedComposite {
                        composite: op.id.clone(),
                        member: member.clone(),
                    });
                }
            }
        }

        Ok(Self {
            operators,
            by_id,
            by_name,
        })
    }

    /// Registry of the operators published on the 4D results page
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(builtin_operators())
    }

    pub fn get(&self, id: &str) -> Option<&OperatorDescriptor> {
        self.by_id.get(id).map(|&index| &self.operators[index])
    }

    /// Exact display-name lookup (no fuzzy matching)
    pub fn id_for_name(&self, display_name: &str) -> Option<&str> {
        self.by_name.get(display_name).map(String::as_str)
    }

    /// All descriptors in registry order
    pub fn iter(&self) -> impl Iterator<Item = &OperatorDescriptor> {
        self.operators.iter()
    }

    /// Operators that emit a record of their own (everything but composites)
    pub fn record_operators(&self) -> impl Iterator<Item = &OperatorDescriptor> {
        self.operators.iter().filter(|op| !op.is_composite())
    }

    /// Every marker class used by any descriptor, deduplicated, in registry order
    pub fn marker_classes(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.operators
            .iter()
            .flat_map(|op| op.match_tokens.iter())
            .filter(|token| seen.insert(token.as_str()))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

/// Operators published on the 4D results page, in page order
pub fn builtin_operators() -> Vec<OperatorDescriptor> {
    use DrawFormat::{Composite, FiveDigitTable, LottoPool, SixDigitTable, Standard, ThreeDigit};

    vec![
        OperatorDescriptor::new("damacai", "Damacai 4D", "resultdamacailable", Standard),
        OperatorDescriptor::new("magnum", "Magnum 4D", "resultm4dlable", Standard),
        OperatorDescriptor::new("toto", "Toto 4D", "resulttotolable", Standard),
        OperatorDescriptor::new("singapore", "Singapore 4D", "resultsabahlable", Standard),
        OperatorDescriptor::new("damacai_1p3d", "Da Ma Cai 1+3D", "resultdamacailable", ThreeDigit),
        OperatorDescriptor::new("sandakan", "Sandakan 4D", "resultstc4dlable", Standard),
        OperatorDescriptor::new("sarawak_cashsweep", "Cashweep 4D", "resultsteclable", Standard),
        OperatorDescriptor::new("sabah", "Sabah88 4D", "resultsabahlable", Standard),
        OperatorDescriptor::new("sabah_lotto", "Sabah Lotto", "resultsabahlable", LottoPool)
            .with_pools(vec![PoolLabel::new("lotto", "Lotto 6/45")]),
        OperatorDescriptor::new("sportstoto_fireball", "SportsToto Fireball", "resulttotolable", Standard),
        OperatorDescriptor::new("grand_dragon", "Grand Dragon", "resultdamacailable", Standard),
        OperatorDescriptor::new("singapore_toto", "Singapore Toto", "resultsabahlable", LottoPool)
            .with_pools(vec![PoolLabel::new("toto", "Toto 6/49")])
            .typed(),
        OperatorDescriptor::new("sportstoto_lotto", "SportsToto Lotto", "resulttotolable", Composite)
            .with_members(&["sportstoto_star", "sportstoto_power", "sportstoto_supreme"]),
        // Pool records keep the family tag of the block they are cut from
        OperatorDescriptor::new("sportstoto_star", "Star Toto 6/50", "", LottoPool)
            .with_pools(vec![PoolLabel::new("star", "Star Toto 6/50")])
            .with_record_type("sportstoto_lotto"),
        OperatorDescriptor::new("sportstoto_power", "Power Toto 6/55", "", LottoPool)
            .with_pools(vec![PoolLabel::new("power", "Power Toto 6/55")])
            .with_record_type("sportstoto_lotto"),
        OperatorDescriptor::new("sportstoto_supreme", "Supreme Toto 6/58", "", LottoPool)
            .with_pools(vec![PoolLabel::new("supreme", "Supreme Toto 6/58")])
            .with_record_type("sportstoto_lotto"),
        OperatorDescriptor::new("magnum_jackpot_gold", "Magnum Jackpot Gold", "resultm4dlable", LottoPool)
            .with_pools(vec![PoolLabel::new("gold", "Jackpot Gold")])
            .typed(),
        OperatorDescriptor::new("sportstoto_5d", "SportsToto 5D", "resulttotolable", FiveDigitTable)
            .typed(),
        OperatorDescriptor::new("sportstoto_6d", "SportsToto 6D", "resulttotolable", SixDigitTable)
            .typed(),
        OperatorDescriptor::new("magnum_life", "Magnum Life", "resultm4dlable", LottoPool)
            .with_pools(vec![PoolLabel::new("life", "Magnum Life")])
            .typed(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_is_valid() {
        let registry = OperatorRegistry::builtin().unwrap();
        assert_eq!(registry.len(), builtin_operators().len());
    }

    #[test]
    fn test_name_lookup_is_exact() {
        let registry = OperatorRegistry::builtin().unwrap();
        assert_eq!(registry.id_for_name("Magnum 4D"), Some("magnum"));
        assert_eq!(registry.id_for_name("magnum 4d"), None);
        assert_eq!(registry.id_for_name("Magnum 4D Jackpot"), None);
    }

    #[test]
    fn test_type_tag_only_on_variant_games() {
        let registry = OperatorRegistry::builtin().unwrap();
        let tag = |id: &str| registry.get(id).unwrap().record_type.clone();

        assert_eq!(tag("sportstoto_5d").as_deref(), Some("sportstoto_5d"));
        assert_eq!(tag("magnum_life").as_deref(), Some("magnum_life"));
        assert_eq!(tag("sportstoto_power").as_deref(), Some("sportstoto_lotto"));
        assert_eq!(tag("magnum"), None);
        assert_eq!(tag("damacai_1p3d"), None);
        assert_eq!(tag("sabah_lotto"), None);
    }

    #[test]
    fn test_record_operators_exclude_composites() {
        let registry = OperatorRegistry::builtin().unwrap();
        assert!(registry.record_operators().all(|op| op.id != "sportstoto_lotto"));
        assert!(registry.record_operators().any(|op| op.id == "sportstoto_star"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let ops = vec![
            OperatorDescriptor::new("a", "A", "x", DrawFormat::Standard),
            OperatorDescriptor::new("a", "B", "x", DrawFormat::Standard),
        ];
        assert_eq!(
            OperatorRegistry::new(ops).unwrap_err(),
            RegistryError::DuplicateId("a".to_string())
        );
    }

    #[test]
    fn test_composite_members_must_exist() {
        let ops = vec![
            OperatorDescriptor::new("group", "Group", "x", DrawFormat::Composite)
                .with_members(&["ghost"]),
        ];
        assert!(matches!(
            OperatorRegistry::new(ops),
            Err(RegistryError::UnknownMember { .. })
        ));
    }

    #[test]
    fn test_marker_classes_deduplicated() {
        let classes = OperatorRegistry::builtin().unwrap().marker_classes();
        let unique: HashSet<_> = classes.iter().collect();
        assert_eq!(classes.len(), unique.len());
        assert!(classes.contains(&"resulttotolable".to_string()));
    }
}

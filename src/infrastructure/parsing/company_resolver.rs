//! Company resolver
//!
//! Maps a located block to a canonical operator id. Labels on the results page
//! drift (extra annotations, missing classes, logo-only headers), so
//! resolution is layered and stops at the first layer that yields something:
//!
//! 1. structural class: a registry marker class whose text contains the
//!    operator's display name
//! 2. text pattern: any plausible marker class with a usable text payload
//! 3. alt text: the alternate text of an embedded logo
//!
//! Names found by layers 2 and 3 must match the registry name table exactly.

use super::block_locator::Block;
use super::config::ParsingConfig;
use super::dom::{compile_selector, element_text, elements_with_class, normalize_ws};
use super::ParsingResult;
use crate::domain::OperatorRegistry;
use scraper::Selector;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

/// Layer that produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionLayer {
    StructuralClass,
    TextPattern,
    AltText,
}

/// Outcome of resolving one block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved {
        operator_id: String,
        layer: ResolutionLayer,
    },
    /// A name was found but is not in the registry's name table
    Unknown { name: String },
    /// Nothing usable labels the block
    Unresolved,
}

pub struct CompanyResolver {
    registry: Arc<OperatorRegistry>,
    marker_classes: Vec<String>,
    logo: Selector,
}

impl CompanyResolver {
    pub fn new(registry: Arc<OperatorRegistry>, config: &ParsingConfig) -> ParsingResult<Self> {
        let mut marker_classes = registry.marker_classes();
        for extra in &config.extra_marker_classes {
            if !marker_classes.contains(extra) {
                marker_classes.push(extra.clone());
            }
        }

        Ok(Self {
            registry,
            marker_classes,
            logo: compile_selector(&config.cells.logo)?,
        })
    }

    pub fn resolve(&self, block: &Block<'_>) -> Resolution {
        if let Some(operator_id) = self.by_structural_class(block) {
            return Resolution::Resolved {
                operator_id,
                layer: ResolutionLayer::StructuralClass,
            };
        }

        let (name, layer) = match self.by_text_pattern(block) {
            Some(name) => (name, ResolutionLayer::TextPattern),
            None => match self.by_alt_text(block) {
                Some(name) => (name, ResolutionLayer::AltText),
                None => {
                    debug!("Block #{} carries no operator label", block.index);
                    return Resolution::Unresolved;
                }
            },
        };

        match self.registry.id_for_name(&name) {
            Some(id) => Resolution::Resolved {
                operator_id: id.to_string(),
                layer,
            },
            None => Resolution::Unknown { name },
        }
    }

    /// Layer 1: registry order, substring match on the display name
    fn by_structural_class(&self, block: &Block<'_>) -> Option<String> {
        self.registry.iter().find_map(|descriptor| {
            let hit = descriptor.match_tokens.iter().any(|class| {
                elements_with_class(block.element, class)
                    .any(|marker| element_text(&marker).contains(&descriptor.display_name))
            });
            if hit {
                trace!(
                    "Block #{} matched '{}' by marker class",
                    block.index, descriptor.id
                );
            }
            hit.then(|| descriptor.id.clone())
        })
    }

    /// Layer 2: first non-empty, non-path, non-markup marker text
    fn by_text_pattern(&self, block: &Block<'_>) -> Option<String> {
        self.marker_classes.iter().find_map(|class| {
            elements_with_class(block.element, class)
                .map(|marker| element_text(&marker))
                .find(|text| is_label_text(text))
        })
    }

    /// Layer 3: alternate text of the first labelled image
    fn by_alt_text(&self, block: &Block<'_>) -> Option<String> {
        block
            .element
            .select(&self.logo)
            .filter_map(|img| img.value().attr("alt"))
            .map(normalize_ws)
            .find(|alt| is_label_text(alt))
    }
}

/// Plausible operator label: not empty, not a path, not markup
fn is_label_text(text: &str) -> bool {
    !text.is_empty() && !is_path_like(text) && !is_markup_like(text)
}

fn is_path_like(text: &str) -> bool {
    const IMAGE_EXTENSIONS: [&str; 6] = [".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];

    let lower = text.to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with('/')
        || lower.starts_with("./")
        || lower.contains('\\')
        || IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
        || (!lower.contains(char::is_whitespace) && lower.contains('/') && lower.contains('.'))
}

fn is_markup_like(text: &str) -> bool {
    text.contains('<') || text.contains('>') || text.contains("&lt;")
}

/// Run-local record of emitted operators
///
/// Guarded by a mutex so blocks could be claimed from several workers.
#[derive(Debug, Default)]
pub struct RunTracker {
    claimed: Mutex<HashSet<String>>,
}

impl RunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim an operator id; `false` when it was already claimed this run
    pub fn claim(&self, operator_id: &str) -> bool {
        let mut claimed = self
            .claimed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        claimed.insert(operator_id.to_string())
    }

    pub fn is_claimed(&self, operator_id: &str) -> bool {
        self.claimed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains(operator_id)
    }

    /// Record operators never claimed, in registry order
    pub fn missing(&self, registry: &OperatorRegistry) -> Vec<String> {
        let claimed = self
            .claimed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        registry
            .record_operators()
            .filter(|op| !claimed.contains(&op.id))
            .map(|op| op.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::parsing::BlockLocator;
    use rstest::rstest;
    use scraper::Html;

    fn resolver() -> CompanyResolver {
        let registry = Arc::new(OperatorRegistry::builtin().unwrap());
        CompanyResolver::new(registry, &ParsingConfig::default()).unwrap()
    }

    fn resolve_first(html: &str) -> Resolution {
        let document = Html::parse_document(html);
        let locator = BlockLocator::new(&ParsingConfig::default()).unwrap();
        let blocks = locator.locate(&document);
        resolver().resolve(&blocks[0])
    }

    #[test]
    fn test_structural_class_tolerates_trailing_annotation() {
        let resolution = resolve_first(
            r#"<div class="outerbox"><table><tr>
                 <td class="resultm4dlable">Magnum 4D 萬能</td>
               </tr></table></div>"#,
        );
        assert_eq!(
            resolution,
            Resolution::Resolved {
                operator_id: "magnum".into(),
                layer: ResolutionLayer::StructuralClass,
            }
        );
    }

    #[test]
    fn test_cashweep_label_resolves_to_sarawak() {
        let resolution = resolve_first(
            r#"<div class="outerbox"><table><tr>
                 <td class="resultsteclable">Cashweep 4D</td>
               </tr></table></div>"#,
        );
        assert_eq!(
            resolution,
            Resolution::Resolved {
                operator_id: "sarawak_cashsweep".into(),
                layer: ResolutionLayer::StructuralClass,
            }
        );
    }

    #[test]
    fn test_structural_class_wins_over_alt_text() {
        let resolution = resolve_first(
            r#"<div class="outerbox">
                 <img src="/img/damacai.png" alt="Damacai 4D">
                 <table><tr><td class="resultm4dlable">Magnum 4D</td></tr></table>
               </div>"#,
        );
        assert_eq!(
            resolution,
            Resolution::Resolved {
                operator_id: "magnum".into(),
                layer: ResolutionLayer::StructuralClass,
            }
        );
    }

    #[test]
    fn test_text_pattern_skips_path_like_payloads() {
        let resolution = resolve_first(
            r#"<div class="outerbox"><table><tr>
                 <td class="resultlable">/images/logo_sandakan.gif</td>
                 <td class="resultlable">Sandakan 4D</td>
               </tr></table></div>"#,
        );
        assert_eq!(
            resolution,
            Resolution::Resolved {
                operator_id: "sandakan".into(),
                layer: ResolutionLayer::TextPattern,
            }
        );
    }

    #[test]
    fn test_alt_text_fallback() {
        let resolution = resolve_first(
            r#"<div class="outerbox"><img src="/img/gd.png" alt="Grand Dragon"></div>"#,
        );
        assert_eq!(
            resolution,
            Resolution::Resolved {
                operator_id: "grand_dragon".into(),
                layer: ResolutionLayer::AltText,
            }
        );
    }

    #[test]
    fn test_unmapped_name_is_unknown_not_guessed() {
        let resolution = resolve_first(
            r#"<div class="outerbox"><img src="/img/p.png" alt="Perdana 4D"></div>"#,
        );
        assert_eq!(
            resolution,
            Resolution::Unknown {
                name: "Perdana 4D".into()
            }
        );
    }

    #[test]
    fn test_unlabelled_block_is_unresolved() {
        let resolution = resolve_first(r#"<div class="outerbox"><p>advert</p></div>"#);
        assert_eq!(resolution, Resolution::Unresolved);
    }

    #[rstest]
    #[case("https://4d4d.co/img/a.png", false)]
    #[case("/images/magnum.gif", false)]
    #[case("logo.webp", false)]
    #[case("img/logo.png", false)]
    #[case("<b>Magnum</b>", false)]
    #[case("", false)]
    #[case("Star Toto 6/50", true)]
    #[case("Da Ma Cai 1+3D", true)]
    fn test_label_text_filter(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_label_text(text), expected);
    }

    #[test]
    fn test_tracker_rejects_second_claim_and_reports_missing() {
        let registry = OperatorRegistry::builtin().unwrap();
        let tracker = RunTracker::new();

        assert!(tracker.claim("magnum"));
        assert!(!tracker.claim("magnum"));

        let missing = tracker.missing(&registry);
        assert!(!missing.contains(&"magnum".to_string()));
        assert!(missing.contains(&"damacai".to_string()));
        assert!(!missing.contains(&"sportstoto_lotto".to_string()));
        assert_eq!(missing.len(), registry.record_operators().count() - 1);
    }
}

//! Harvest service
//!
//! Runs one document through locate → resolve → extract → normalize and
//! collects every non-fatal finding into a `RunReport`. The service is
//! synchronous: the parsed DOM is not `Send`, so it lives and dies inside
//! [`HarvestService::harvest`] and never crosses an await point.

use crate::domain::{
    Diagnostic, DocumentDefaults, DocumentSummary, DrawResult, OperatorDescriptor,
    OperatorRegistry, RunReport,
};
use crate::infrastructure::parsing::extractors::{extract_common, has_pool_header};
use crate::infrastructure::parsing::{
    Block, BlockLocator, CompanyResolver, ExtractContext, Normalizer, ParsingConfig,
    ParsingResult, Resolution, RunTracker, extractor_for,
};
use chrono::NaiveDate;
use scraper::{ElementRef, Html};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Records, diagnostics and document summary of one run
#[derive(Debug, Clone, Default)]
pub struct HarvestOutcome {
    pub results: Vec<DrawResult>,
    pub report: RunReport,
    /// Date and draw number of the first emitted record
    pub summary: Option<DocumentSummary>,
}

/// Per-run state threaded through block processing
struct RunState {
    tracker: RunTracker,
    outcome: HarvestOutcome,
}

pub struct HarvestService {
    registry: Arc<OperatorRegistry>,
    locator: BlockLocator,
    resolver: CompanyResolver,
    ctx: ExtractContext,
    normalizer: Normalizer,
}

impl HarvestService {
    /// Compile the parsing configuration once for every run of this service
    pub fn new(
        registry: Arc<OperatorRegistry>,
        config: &ParsingConfig,
        processing_date: NaiveDate,
    ) -> ParsingResult<Self> {
        Ok(Self {
            locator: BlockLocator::new(config)?,
            resolver: CompanyResolver::new(Arc::clone(&registry), config)?,
            ctx: ExtractContext::new(config)?,
            normalizer: Normalizer::new(processing_date),
            registry,
        })
    }

    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    /// Extract every operator's record from a raw results document
    pub fn harvest(&self, html: &str) -> HarvestOutcome {
        let document = Html::parse_document(html);
        let blocks = self.locator.locate(&document);

        let mut state = RunState {
            tracker: RunTracker::new(),
            outcome: HarvestOutcome::default(),
        };
        state.outcome.report.blocks_located = blocks.len();

        let defaults = self.document_defaults(&blocks);
        debug!("Document defaults: {:?}", defaults);

        for block in &blocks {
            self.process_block(block, &defaults, &mut state);
        }

        for operator_id in state.tracker.missing(&self.registry) {
            state
                .outcome
                .report
                .push(Diagnostic::BlockNotFound { operator_id });
        }

        state.outcome.summary = state.outcome.results.first().map(|first| DocumentSummary {
            draw_date: first.draw_date.clone(),
            draw_no: first.draw_number.clone(),
        });

        info!(
            "Harvested {} records from {} blocks ({} diagnostics)",
            state.outcome.results.len(),
            blocks.len(),
            state.outcome.report.diagnostics.len()
        );
        state.outcome
    }

    /// Date and draw number of the first located block
    fn document_defaults(&self, blocks: &[Block<'_>]) -> DocumentDefaults {
        blocks
            .first()
            .map(|first| {
                let common = extract_common(first.element, &self.ctx);
                DocumentDefaults {
                    draw_date: common.draw_date,
                    draw_number: common.draw_number,
                }
            })
            .unwrap_or_default()
    }

    fn process_block(&self, block: &Block<'_>, defaults: &DocumentDefaults, state: &mut RunState) {
        let operator_id = match self.resolver.resolve(block) {
            Resolution::Resolved { operator_id, layer } => {
                debug!("Block #{} → '{}' ({:?})", block.index, operator_id, layer);
                operator_id
            }
            Resolution::Unknown { name } => {
                warn!("Block #{}: unknown operator '{}'", block.index, name);
                state.outcome.report.push(Diagnostic::UnknownOperator {
                    block_index: block.index,
                    name,
                });
                return;
            }
            Resolution::Unresolved => {
                state.outcome.report.push(Diagnostic::Unresolved {
                    block_index: block.index,
                });
                return;
            }
        };

        let Some(descriptor) = self.registry.get(&operator_id) else {
            return;
        };

        if descriptor.is_composite() {
            self.process_composite(block, descriptor, defaults, state);
        } else {
            self.emit(block.index, block.element, descriptor, defaults, state);
        }
    }

    /// Apply the composite's ordered member list to the same block
    ///
    /// Members run against the whole block, each finding its own pool table
    /// by header. When the block is split into `section_selector` panels,
    /// member *i* is scoped to panel *i* instead.
    fn process_composite(
        &self,
        block: &Block<'_>,
        composite: &OperatorDescriptor,
        defaults: &DocumentDefaults,
        state: &mut RunState,
    ) {
        if !state.tracker.claim(&composite.id) {
            state.outcome.report.push(Diagnostic::DuplicateOperator {
                block_index: block.index,
                operator_id: composite.id.clone(),
            });
            return;
        }

        let members: Vec<&OperatorDescriptor> = composite
            .members
            .iter()
            .filter_map(|id| self.registry.get(id))
            .collect();

        let sections: Vec<ElementRef<'_>> = block.element.select(&self.ctx.section).collect();
        let (scoped, detected): (Vec<_>, usize) = if sections.is_empty() {
            let found: Vec<_> = members
                .iter()
                .filter(|member| member.pools.is_empty() || has_pool_header(block.element, member))
                .map(|member| (*member, block.element))
                .collect();
            let detected = found.len();
            (found, detected)
        } else {
            let detected = sections.len();
            (members.iter().copied().zip(sections).collect(), detected)
        };

        if detected != composite.members.len() {
            warn!(
                "Composite '{}': {} members but {} detected",
                composite.id,
                composite.members.len(),
                detected
            );
            state.outcome.report.push(Diagnostic::CompositeMismatch {
                operator_id: composite.id.clone(),
                expected: composite.members.len(),
                detected,
            });
        }

        // Members share the container's date and number
        let common = extract_common(block.element, &self.ctx);
        let shared = DocumentDefaults {
            draw_date: common.draw_date.or_else(|| defaults.draw_date.clone()),
            draw_number: common.draw_number.or_else(|| defaults.draw_number.clone()),
        };

        for (member, scope) in scoped {
            self.emit(block.index, scope, member, &shared, state);
        }
    }

    /// Extract, normalize and record one operator, unless already emitted
    fn emit(
        &self,
        block_index: usize,
        scope: ElementRef<'_>,
        descriptor: &OperatorDescriptor,
        defaults: &DocumentDefaults,
        state: &mut RunState,
    ) {
        let Some(extractor) = extractor_for(descriptor.format) else {
            warn!("No extractor for '{}' ({:?})", descriptor.id, descriptor.format);
            return;
        };

        if !state.tracker.claim(&descriptor.id) {
            warn!(
                "Block #{}: duplicate operator '{}' discarded",
                block_index, descriptor.id
            );
            state.outcome.report.push(Diagnostic::DuplicateOperator {
                block_index,
                operator_id: descriptor.id.clone(),
            });
            return;
        }

        let partial = extractor.extract(scope, descriptor, &self.ctx);
        let (record, note) =
            self.normalizer
                .normalize(&descriptor.id, descriptor.record_type.as_deref(), partial, defaults);

        if let Some(note) = note {
            state.outcome.report.push(note);
        }
        state.outcome.results.push(record);
    }
}

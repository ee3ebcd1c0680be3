//! Harvest use case
//!
//! One run: fetch the document, extract every record, persist the records,
//! then rebuild the archive index. A fetch failure aborts the run before
//! anything is written; extraction gaps only show up in the report.

use crate::application::harvest_service::{HarvestOutcome, HarvestService};
use crate::domain::RunReport;
use crate::infrastructure::archive_store::ArchiveStore;
use crate::infrastructure::harvest_error::{HarvestError, HarvestResult};
use crate::infrastructure::http_client::DocumentSource;
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct HarvestRun {
    pub run_id: Uuid,
    pub outcome: HarvestOutcome,
    /// Records written as latest files
    pub written: usize,
    /// Archive index after the run; empty on a dry run
    pub index: Vec<String>,
}

pub struct HarvestUseCase {
    source: Arc<dyn DocumentSource>,
    store: Arc<dyn ArchiveStore>,
    service: HarvestService,
    write_summary: bool,
}

impl HarvestUseCase {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        store: Arc<dyn ArchiveStore>,
        service: HarvestService,
    ) -> Self {
        Self {
            source,
            store,
            service,
            write_summary: true,
        }
    }

    pub fn with_summary(mut self, write_summary: bool) -> Self {
        self.write_summary = write_summary;
        self
    }

    pub async fn execute(&self, dry_run: bool) -> HarvestResult<HarvestRun> {
        let run_id = Uuid::new_v4();
        let started = Instant::now();
        info!("🚀 Harvest run {} from {}", run_id, self.source.describe());

        let html = self.source.fetch_document().await?;
        let outcome = self.service.harvest(&html);

        let (written, index) = if dry_run {
            info!("Dry run: nothing written");
            (0, Vec::new())
        } else {
            self.persist(&outcome).await?
        };

        log_run_summary(&outcome.report, outcome.results.len());
        info!(
            "✅ Harvest run {} finished in {:?}",
            run_id,
            started.elapsed()
        );

        Ok(HarvestRun {
            run_id,
            outcome,
            written,
            index,
        })
    }

    /// Per-operator writes in parallel; the index strictly after all of them
    async fn persist(&self, outcome: &HarvestOutcome) -> HarvestResult<(usize, Vec<String>)> {
        let writes = outcome.results.iter().map(|record| {
            let store = Arc::clone(&self.store);
            async move {
                store.write_latest(record).await?;
                if store.write_dated(record).await?.is_none() {
                    warn!("'{}' has no draw date, skipping dated copy", record.operator_id);
                }
                Ok::<_, HarvestError>(())
            }
        });
        let written = try_join_all(writes).await?.len();

        let index = self.store.rebuild_index().await?;
        info!("Archive index holds {} dates", index.len());

        if self.write_summary {
            if let Some(summary) = &outcome.summary {
                self.store.write_summary(summary).await?;
            }
        }

        Ok((written, index))
    }
}

/// Missing, duplicate and unknown operators of a run
pub fn log_run_summary(report: &RunReport, records: usize) {
    info!(
        "📊 {} records from {} blocks",
        records, report.blocks_located
    );

    let missing = report.missing_operators();
    if !missing.is_empty() {
        warn!("Missing operators ({}): {}", missing.len(), missing.join(", "));
    }
    let duplicates = report.duplicate_operators();
    if !duplicates.is_empty() {
        warn!("Duplicate operators discarded: {}", duplicates.join(", "));
    }
    let unknown = report.unknown_names();
    if !unknown.is_empty() {
        warn!("Unknown operator names: {}", unknown.join(", "));
    }
    let notes = report.data_quality_notes();
    if notes > 0 {
        warn!("{} dates substituted with the processing date", notes);
    }
}

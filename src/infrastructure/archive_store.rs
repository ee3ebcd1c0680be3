//! Archive persistence
//!
//! Layout under the data root:
//!
//! ```text
//! <root>/<operator>.json                     latest record, overwritten each run
//! <root>/archive/<YYYY-MM-DD>/<operator>.json dated copy
//! <root>/archive/index.json                  archive dates, newest first
//! <root>/latest.json                         document-wide date and draw number
//! ```
//!
//! The index is a derived view: it is rebuilt from the directory listing after
//! every per-operator write of a run has completed.

use crate::domain::{DocumentSummary, DrawResult};
use crate::infrastructure::harvest_error::{HarvestError, HarvestResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

const ARCHIVE_DIR: &str = "archive";
const INDEX_FILE: &str = "index.json";
const SUMMARY_FILE: &str = "latest.json";

/// Sink for canonical records and the archive index
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Overwrite the operator's latest record
    async fn write_latest(&self, record: &DrawResult) -> HarvestResult<PathBuf>;

    /// Copy the record under its draw date; `None` when the record has no date
    async fn write_dated(&self, record: &DrawResult) -> HarvestResult<Option<PathBuf>>;

    async fn write_summary(&self, summary: &DocumentSummary) -> HarvestResult<PathBuf>;

    /// Recompute the index from the archive listing and persist it
    async fn rebuild_index(&self) -> HarvestResult<Vec<String>>;
}

/// Valid `YYYY-MM-DD` names, newest first, without duplicates
pub fn archive_index<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut dates: Vec<NaiveDate> = names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref();
            // Only the canonical zero-padded spelling names an archive day
            (name.len() == 10)
                .then(|| NaiveDate::parse_from_str(name, "%Y-%m-%d").ok())
                .flatten()
        })
        .collect();

    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.dedup();
    dates
        .into_iter()
        .map(|date| date.format("%Y-%m-%d").to_string())
        .collect()
}

/// File-system archive rooted at the configured data directory
#[derive(Debug, Clone)]
pub struct FsArchiveStore {
    root: PathBuf,
}

impl FsArchiveStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn archive_dir(&self) -> PathBuf {
        self.root.join(ARCHIVE_DIR)
    }

    async fn write_json(path: &Path, body: String) -> HarvestResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| HarvestError::io(parent, e))?;
        }
        fs::write(path, body)
            .await
            .map_err(|e| HarvestError::io(path, e))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl ArchiveStore for FsArchiveStore {
    async fn write_latest(&self, record: &DrawResult) -> HarvestResult<PathBuf> {
        let path = self.root.join(format!("{}.json", record.operator_id));
        Self::write_json(&path, record.to_json_pretty()?).await?;
        Ok(path)
    }

    async fn write_dated(&self, record: &DrawResult) -> HarvestResult<Option<PathBuf>> {
        if record.draw_date.is_empty() {
            return Ok(None);
        }
        let path = self
            .archive_dir()
            .join(&record.draw_date)
            .join(format!("{}.json", record.operator_id));
        Self::write_json(&path, record.to_json_pretty()?).await?;
        Ok(Some(path))
    }

    async fn write_summary(&self, summary: &DocumentSummary) -> HarvestResult<PathBuf> {
        let path = self.root.join(SUMMARY_FILE);
        Self::write_json(&path, serde_json::to_string_pretty(summary)?).await?;
        Ok(path)
    }

    async fn rebuild_index(&self) -> HarvestResult<Vec<String>> {
        let archive_dir = self.archive_dir();
        fs::create_dir_all(&archive_dir)
            .await
            .map_err(|e| HarvestError::io(&archive_dir, e))?;

        let mut entries = fs::read_dir(&archive_dir)
            .await
            .map_err(|e| HarvestError::io(&archive_dir, e))?;
        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| HarvestError::io(&archive_dir, e))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map(|kind| kind.is_dir())
                .unwrap_or(false);
            if is_dir {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        let index = archive_index(names);
        Self::write_json(
            &archive_dir.join(INDEX_FILE),
            serde_json::to_string_pretty(&index)?,
        )
        .await?;

        Ok(index)
    }
}

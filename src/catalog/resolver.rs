//! Report catalog resolver
//!
//! Reads the report directory and turns each report file into a
//! [`ReportRecord`]. Nothing is cached: every call reflects the directory as
//! it is right now.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::record::{report_id, ReportName, ReportRecord, REPORT_SUFFIX};
use crate::error::SiteError;
use crate::markdown::MarkdownRenderer;
use crate::path::is_plain_name;

/// Resolves reports from a fixed directory
#[derive(Debug, Clone)]
pub struct ReportCatalog {
    dir: PathBuf,
    renderer: MarkdownRenderer,
}

impl ReportCatalog {
    pub fn new(dir: impl Into<PathBuf>, renderer: MarkdownRenderer) -> Self {
        Self {
            dir: dir.into(),
            renderer,
        }
    }

    /// List every report in the directory, sorted by file name.
    ///
    /// An unreadable directory is a [`SiteError::ReadFailure`]; a directory
    /// without reports yields an empty list. A single unreadable report
    /// aborts the whole listing.
    pub async fn list(&self) -> Result<Vec<ReportRecord>, SiteError> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| SiteError::read_failure(&self.dir, e))?;

        let mut reports = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SiteError::read_failure(&self.dir, e))?
        {
            // Names that are not valid UTF-8 cannot carry the naming convention
            let Ok(file_name) = entry.file_name().into_string() else {
                continue;
            };
            let Some(id) = report_id(&file_name) else {
                continue;
            };
            let id = id.to_string();
            let name = ReportName::parse(&id);
            let path = entry.path();
            if !is_file(&path).await {
                continue;
            }
            reports.push((file_name, id, name, path));
        }

        reports.sort_by(|a, b| a.0.cmp(&b.0));

        let mut records = Vec::with_capacity(reports.len());
        for (_, id, name, path) in reports {
            let html = self.render_file(&path).await?;
            records.push(name.into_record(&id, html));
        }
        Ok(records)
    }

    /// Fetch one report by identifier (its file name without `.md`).
    ///
    /// The result is a one-element list so the single-report view can share
    /// the listing's template contract.
    pub async fn get(&self, identifier: &str) -> Result<Vec<ReportRecord>, SiteError> {
        if !is_plain_name(identifier) {
            return Err(report_not_found());
        }

        let path = self.dir.join(format!("{identifier}{REPORT_SUFFIX}"));
        let html = match self.render_file(&path).await {
            Ok(html) => html,
            Err(SiteError::ReadFailure { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                return Err(report_not_found());
            }
            Err(e) => return Err(e),
        };

        Ok(vec![ReportName::parse(identifier).into_record(identifier, html)])
    }

    async fn render_file(&self, path: &Path) -> Result<String, SiteError> {
        let bytes = fs::read(path)
            .await
            .map_err(|e| SiteError::read_failure(path, e))?;
        Ok(self.renderer.render(&String::from_utf8_lossy(&bytes)))
    }
}

fn report_not_found() -> SiteError {
    SiteError::NotFound("Report not found".to_string())
}

/// Follows symlinks; a dangling link is not a file.
async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

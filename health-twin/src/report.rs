//! Report export
//!
//! A run's final text (or the survey JSON) is written to one flat file per run.
//! File names carry the run id so concurrent submissions never share a file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use health_twin_sdk::log_report_exported;

use crate::error::{HealthTwinError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn mime(self) -> &'static str {
        match self {
            Self::Markdown => "text/markdown",
            Self::Json => "application/json",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

/// Content to export, before it has a run-scoped name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub stem: String,
    pub format: ReportFormat,
    pub body: String,
}

impl ReportArtifact {
    pub fn markdown(stem: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            format: ReportFormat::Markdown,
            body: body.into(),
        }
    }

    pub fn json(stem: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            format: ReportFormat::Json,
            body: body.into(),
        }
    }

    /// `<stem>_<run_id>.<ext>`
    pub fn file_name(&self, run_id: &Uuid) -> String {
        format!("{}_{}.{}", self.stem, run_id, self.format.extension())
    }
}

/// Where an exported artifact ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportHandle {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: &'static str,
    pub exported_at: DateTime<Utc>,
}

#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Write the artifact for this run, replacing any earlier file of the same name
    async fn export(&self, run_id: &Uuid, artifact: &ReportArtifact) -> Result<ReportHandle>;
}

/// Writes artifacts into a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct FileReportSink {
    dir: PathBuf,
}

impl FileReportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ReportSink for FileReportSink {
    async fn export(&self, run_id: &Uuid, artifact: &ReportArtifact) -> Result<ReportHandle> {
        let file_name = artifact.file_name(run_id);
        let path = self.dir.join(&file_name);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| HealthTwinError::Export {
                path: self.dir.clone(),
                source,
            })?;
        tokio::fs::write(&path, artifact.body.as_bytes())
            .await
            .map_err(|source| HealthTwinError::Export {
                path: path.clone(),
                source,
            })?;

        let mime = artifact.format.mime();
        log_report_exported!(run_id, path.display(), mime);
        tracing::info!(run_id = %run_id, path = %path.display(), mime, "Report exported");

        Ok(ReportHandle {
            path,
            file_name,
            mime,
            exported_at: Utc::now(),
        })
    }
}

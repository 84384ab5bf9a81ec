//! Downloaded job reports

use crate::error::PortalError;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// The report generated for a finished ingestion job.
#[derive(Clone)]
pub struct ReportArtifact {
    pub job_id: String,
    /// Name to present the download under
    pub file_name: String,
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl std::fmt::Debug for ReportArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportArtifact")
            .field("job_id", &self.job_id)
            .field("file_name", &self.file_name)
            .field("size", &self.bytes.len())
            .field("content_type", &self.content_type)
            .field("received_at", &self.received_at)
            .finish()
    }
}

impl ReportArtifact {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The report as text, if it is valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    /// Write the report to `path`.
    pub async fn save_to(&self, path: impl AsRef<Path>) -> Result<(), PortalError> {
        tokio::fs::write(path.as_ref(), &self.bytes).await?;
        Ok(())
    }

    /// Write the report into `dir` under its file name and return the path.
    pub async fn save_in(&self, dir: impl AsRef<Path>) -> Result<PathBuf, PortalError> {
        let path = dir.as_ref().join(&self.file_name);
        self.save_to(&path).await?;
        Ok(path)
    }
}

/// Name for a job's report: the last `/` segment of the report path the
/// server announced, or `report_{job_id}.md` when there is none.
///
/// A path ending in `/` has an empty last segment and also gets
/// `report_{job_id}.md`, never an empty file name.
pub fn report_file_name(job_id: &str, report_path: Option<&str>) -> String {
    report_path
        .and_then(|p| p.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("report_{job_id}.md"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_from_report_path() {
        assert_eq!(
            report_file_name("j1", Some("/srv/reports/j1/Mercury_Fleet_Report_Q3.md")),
            "Mercury_Fleet_Report_Q3.md"
        );
        assert_eq!(report_file_name("j1", Some("summary.md")), "summary.md");
        assert_eq!(report_file_name("j1", None), "report_j1.md");
    }

    #[test]
    fn empty_last_segment_uses_job_name() {
        assert_eq!(report_file_name("j1", Some("/srv/reports/")), "report_j1.md");
        assert_eq!(report_file_name("j-9", Some("")), "report_j-9.md");
        assert_eq!(report_file_name("j-9", Some("/")), "report_j-9.md");
    }

    #[tokio::test]
    async fn saves_under_file_name() {
        let artifact = ReportArtifact {
            job_id: "j1".into(),
            file_name: "report_j1.md".into(),
            bytes: Bytes::from_static(b"# Fleet report\n"),
            content_type: Some("text/markdown".into()),
            received_at: Utc::now(),
        };
        assert_eq!(artifact.as_text(), Some("# Fleet report\n"));

        let dir = tempfile::tempdir().unwrap();
        let path = artifact.save_in(dir.path()).await.unwrap();
        assert_eq!(path, dir.path().join("report_j1.md"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"# Fleet report\n");
    }
}

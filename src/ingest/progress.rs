//! Event to progress mapping
//!
//! Each upload owns one [`ProgressTracker`]. It accumulates the job id and
//! report path as "last known value" fields, remembers the page total
//! announced by `started`, and turns every event into a [`ProgressStep`].

use crate::defaults::ingest::{BILLING_FAILURE_MARKER, DEFAULT_COLLECTION};
use crate::types::{EventKind, IngestionEvent, IngestionResult};

/// What one event means for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressStep {
    Progress { percent: u8, message: String },
    /// The job hit a terminal in-stream failure; processing must stop.
    Fatal { message: String },
    Ignored,
}

impl ProgressStep {
    fn progress(percent: u8, message: impl Into<String>) -> Self {
        Self::Progress {
            percent,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total_pages: u64,
    job_id: Option<String>,
    report_path: Option<String>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self {
            total_pages: 1,
            job_id: None,
            report_path: None,
        }
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn report_path(&self) -> Option<&str> {
        self.report_path.as_deref()
    }

    /// `(job_id, report_path)` as last seen.
    pub fn into_parts(self) -> (Option<String>, Option<String>) {
        (self.job_id, self.report_path)
    }

    pub fn apply(&mut self, event: &IngestionEvent) -> ProgressStep {
        if let Some(id) = event.job_id() {
            self.job_id = Some(id.to_string());
        }
        if let Some(path) = event.report_path() {
            self.report_path = Some(path.to_string());
        }

        let Some(kind) = event.kind() else {
            return ProgressStep::Ignored;
        };

        match &kind {
            EventKind::Started => {
                self.total_pages = non_zero(event.pages_total).unwrap_or(1);
                ProgressStep::progress(5, "Starting processing...")
            }
            EventKind::ReportSaved => {
                let current = event.pages_processed.unwrap_or(0);
                let percent = scaled(current, self.total_pages, 50).min(50);
                ProgressStep::progress(
                    percent as u8,
                    format!("Analyzed page {current} of {}", self.total_pages),
                )
            }
            EventKind::ChunkingStarted => ProgressStep::progress(60, "Chunking content..."),
            EventKind::ChunkingFinished => {
                let message = match event.chunks {
                    Some(n) => format!("Created {n} chunks"),
                    None => "Created chunks".to_string(),
                };
                ProgressStep::progress(70, message)
            }
            EventKind::IngestStarted => {
                let collection = event
                    .collection
                    .as_deref()
                    .filter(|c| !c.is_empty())
                    .unwrap_or(DEFAULT_COLLECTION);
                ProgressStep::progress(75, format!("Ingesting to {collection}..."))
            }
            EventKind::IngestBatch => {
                let ingested = event.ingested_so_far.unwrap_or(0);
                let total_docs = non_zero(event.total_docs).unwrap_or(1);
                let percent = (75 + scaled(ingested, total_docs, 20)).min(95);
                let message = match event.batch_index {
                    Some(i) => format!("Ingesting batch {i}..."),
                    None => "Ingesting batch...".to_string(),
                };
                ProgressStep::progress(percent as u8, message)
            }
            EventKind::IngestFinished | EventKind::Completed => {
                if let Some(result) = &event.result
                    && let Some(step) = inspect_result(&kind, result)
                {
                    return step;
                }
                ProgressStep::progress(95, "Finalizing...")
            }
            EventKind::WorkerDone => ProgressStep::progress(100, "Done"),
            EventKind::Other(tag) => {
                tracing::trace!(target: "rohde_portal::ingest", event = %tag, "ignoring unknown event");
                ProgressStep::Ignored
            }
        }
    }
}

/// A billing failure ends the job; any other error or message is a warning.
fn inspect_result(kind: &EventKind, result: &IngestionResult) -> Option<ProgressStep> {
    let error = result.error.as_deref().filter(|e| !e.is_empty());
    let message = result.message.as_deref().filter(|m| !m.is_empty());
    if error.is_none() && message.is_none() {
        return None;
    }

    let message = message.unwrap_or("Ingestion error");
    if error == Some(BILLING_FAILURE_MARKER) {
        return Some(ProgressStep::Fatal {
            message: message.to_string(),
        });
    }
    tracing::warn!(
        target: "rohde_portal::ingest",
        event = kind.as_str(),
        error = error.unwrap_or_default(),
        "Ingestion warning: {message}"
    );
    None
}

fn non_zero(v: Option<u64>) -> Option<u64> {
    v.filter(|n| *n > 0)
}

/// `round(part / whole * span)`, half rounding up.
fn scaled(part: u64, whole: u64, span: u64) -> u64 {
    (part as f64 / whole as f64 * span as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(json: &str) -> IngestionEvent {
        serde_json::from_str(json).unwrap()
    }

    fn percent(step: ProgressStep) -> u8 {
        match step {
            ProgressStep::Progress { percent, .. } => percent,
            other => panic!("expected progress, got {other:?}"),
        }
    }

    #[test]
    fn fixed_steps() {
        let mut t = ProgressTracker::new();
        assert_eq!(
            t.apply(&event(r#"{"event":"started","pages_total":4}"#)),
            ProgressStep::progress(5, "Starting processing...")
        );
        assert_eq!(
            t.apply(&event(r#"{"event":"chunking_started"}"#)),
            ProgressStep::progress(60, "Chunking content...")
        );
        assert_eq!(
            t.apply(&event(r#"{"event":"chunking_finished","chunks":42}"#)),
            ProgressStep::progress(70, "Created 42 chunks")
        );
        assert_eq!(
            t.apply(&event(r#"{"event":"ingest_started","collection":"fleet_docs"}"#)),
            ProgressStep::progress(75, "Ingesting to fleet_docs...")
        );
        assert_eq!(
            t.apply(&event(r#"{"event":"ingest_started"}"#)),
            ProgressStep::progress(75, "Ingesting to vector db...")
        );
        assert_eq!(
            t.apply(&event(r#"{"event":"completed"}"#)),
            ProgressStep::progress(95, "Finalizing...")
        );
        assert_eq!(
            t.apply(&event(r#"{"event":"worker_done"}"#)),
            ProgressStep::progress(100, "Done")
        );
        assert_eq!(
            t.apply(&event(r#"{"event":"heartbeat"}"#)),
            ProgressStep::Ignored
        );
        assert_eq!(t.apply(&event(r#"{"job_id":"j"}"#)), ProgressStep::Ignored);
    }

    #[test]
    fn page_progress_follows_started_total() {
        let mut t = ProgressTracker::new();
        t.apply(&event(r#"{"event":"started","pages_total":10}"#));
        let mut last = 0;
        for p in 1..=10u64 {
            let step = t.apply(&event(&format!(
                r#"{{"event":"report_saved","pages_processed":{p}}}"#
            )));
            let expected = ((p as f64 / 10.0) * 50.0).round().min(50.0) as u8;
            match step {
                ProgressStep::Progress { percent, message } => {
                    assert_eq!(percent, expected);
                    assert!(percent >= last);
                    assert_eq!(message, format!("Analyzed page {p} of 10"));
                    last = percent;
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(last, 50);
    }

    #[test]
    fn page_progress_is_capped_and_defaults() {
        let mut t = ProgressTracker::new();
        // no `started`: total stays 1
        assert_eq!(
            percent(t.apply(&event(r#"{"event":"report_saved","pages_processed":3}"#))),
            50
        );
        // zero total counts as absent
        t.apply(&event(r#"{"event":"started","pages_total":0}"#));
        assert_eq!(t.total_pages(), 1);
        assert_eq!(
            t.apply(&event(r#"{"event":"report_saved"}"#)),
            ProgressStep::progress(0, "Analyzed page 0 of 1")
        );
        // 1 of 3 pages -> 16.67 -> 17
        t.apply(&event(r#"{"event":"started","pages_total":3}"#));
        assert_eq!(
            percent(t.apply(&event(r#"{"event":"report_saved","pages_processed":1}"#))),
            17
        );
    }

    #[test]
    fn batch_progress_defaults_to_floor_without_running_count() {
        let mut t = ProgressTracker::new();
        assert_eq!(
            t.apply(&event(r#"{"event":"ingest_batch","batch_index":3,"total_docs":40}"#)),
            ProgressStep::progress(75, "Ingesting batch 3...")
        );
        assert_eq!(
            percent(t.apply(&event(
                r#"{"event":"ingest_batch","batch_index":4,"total_docs":40,"ingested_so_far":20}"#
            ))),
            85
        );
        assert_eq!(
            percent(t.apply(&event(
                r#"{"event":"ingest_batch","total_docs":10,"ingested_so_far":30}"#
            ))),
            95
        );
    }

    #[test]
    fn identifiers_are_last_known_values() {
        let mut t = ProgressTracker::new();
        t.apply(&event(r#"{"event":"started","job_id":"job-1"}"#));
        t.apply(&event(
            r#"{"event":"report_saved","report_path":"/data/reports/a.md","job_id":null}"#,
        ));
        t.apply(&event(r#"{"event":"report_saved","report_path":"/data/reports/b.md"}"#));
        t.apply(&event(r#"{"event":"worker_done","job_id":"","report_path":null}"#));
        assert_eq!(t.job_id(), Some("job-1"));
        assert_eq!(t.report_path(), Some("/data/reports/b.md"));
        assert_eq!(
            t.into_parts(),
            (Some("job-1".into()), Some("/data/reports/b.md".into()))
        );
    }

    #[test]
    fn billing_failure_is_fatal() {
        let mut t = ProgressTracker::new();
        let step = t.apply(&event(
            r#"{"event":"ingest_finished","result":{"error":"voyage_billing","message":"Embedding quota exhausted"}}"#,
        ));
        assert_eq!(
            step,
            ProgressStep::Fatal {
                message: "Embedding quota exhausted".into()
            }
        );

        let step = t.apply(&event(
            r#"{"event":"completed","result":{"error":"voyage_billing"}}"#,
        ));
        assert_eq!(
            step,
            ProgressStep::Fatal {
                message: "Ingestion error".into()
            }
        );
    }

    #[test]
    fn other_result_errors_are_warnings() {
        let mut t = ProgressTracker::new();
        let step = t.apply(&event(
            r#"{"event":"ingest_finished","result":{"error":"partial","message":"2 docs skipped"}}"#,
        ));
        assert_eq!(step, ProgressStep::progress(95, "Finalizing..."));
        let step = t.apply(&event(
            r#"{"event":"completed","result":{"ingested":12,"collection":"fleet"}}"#,
        ));
        assert_eq!(step, ProgressStep::progress(95, "Finalizing..."));
    }
}

//! The ingestion stream consumer loop
//!
//! Transport independent: takes the response body as a byte stream, reports
//! progress as events arrive and tells the caller how the stream ended.

use super::progress::{ProgressStep, ProgressTracker};
use crate::error::PortalError;
use crate::execution::http::HttpRequestContext;
use crate::streaming::{DataLineStream, stream_data_payloads};
use crate::types::IngestionEvent;
use futures_util::{Stream, StreamExt};

/// How an ingestion stream ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The transport signalled end of stream.
    Finished {
        job_id: Option<String>,
        report_path: Option<String>,
    },
    /// An event reported a terminal job failure; remaining data was not read.
    Aborted { message: String },
    /// Reading the body failed.
    Failed(PortalError),
}

/// Consume a raw byte stream of `data: <json>` lines.
///
/// `on_progress` receives `(percent, message)` for every event that maps to
/// progress. Malformed lines are logged and skipped.
pub async fn consume_event_stream<S, B, P>(byte_stream: S, mut on_progress: P) -> StreamOutcome
where
    S: Stream<Item = Result<B, PortalError>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    P: FnMut(u8, &str) + Send,
{
    let ctx = HttpRequestContext::new("ingestion", "", true);
    let payloads = stream_data_payloads(byte_stream, Vec::new(), ctx);
    consume_payloads(payloads, &mut on_progress).await
}

pub(crate) async fn consume_payloads<P>(mut payloads: DataLineStream, on_progress: &mut P) -> StreamOutcome
where
    P: FnMut(u8, &str) + Send + ?Sized,
{
    let mut tracker = ProgressTracker::new();

    while let Some(item) = payloads.next().await {
        let payload = match item {
            Ok(payload) => payload,
            Err(e) => return StreamOutcome::Failed(e),
        };

        let event: IngestionEvent = match serde_json::from_str(&payload) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(target: "rohde_portal::ingest", error = %e, line = %payload, "skipping malformed stream event");
                continue;
            }
        };
        tracing::debug!(
            target: "rohde_portal::ingest",
            event = event.event.as_deref().unwrap_or_default(),
            job_id = event.job_id().unwrap_or_default(),
            reason = event.reason.as_deref().unwrap_or_default(),
            "stream event"
        );

        match tracker.apply(&event) {
            ProgressStep::Progress { percent, message } => on_progress(percent, &message),
            ProgressStep::Fatal { message } => return StreamOutcome::Aborted { message },
            ProgressStep::Ignored => {}
        }
    }

    let (job_id, report_path) = tracker.into_parts();
    StreamOutcome::Finished {
        job_id,
        report_path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(parts: &[&str]) -> Vec<Result<Vec<u8>, PortalError>> {
        parts.iter().map(|p| Ok(p.as_bytes().to_vec())).collect()
    }

    #[tokio::test]
    async fn reports_progress_and_captures_ids() {
        let body = chunks(&[
            "data: {\"event\":\"started\",\"job_id\":\"job-7\",\"pages_total\":2}\n",
            "data: {\"event\":\"report_saved\",\"pages_processed\":1,\"report_path\":\"out/job-7.md\"}\n",
            "data: {\"event\":\"worker_done\"}\n",
            "data: [DONE]\n",
        ]);

        let mut seen = Vec::new();
        let outcome = consume_event_stream(futures_util::stream::iter(body), |p, m| {
            seen.push((p, m.to_string()))
        })
        .await;

        assert_eq!(
            seen,
            vec![
                (5, "Starting processing...".to_string()),
                (25, "Analyzed page 1 of 2".to_string()),
                (100, "Done".to_string()),
            ]
        );
        assert_eq!(
            outcome,
            StreamOutcome::Finished {
                job_id: Some("job-7".into()),
                report_path: Some("out/job-7.md".into()),
            }
        );
    }

    #[tokio::test]
    async fn billing_failure_stops_reading() {
        let body = chunks(&[
            "data: {\"event\":\"ingest_started\",\"job_id\":\"j\"}\n\
             data: {\"event\":\"ingest_finished\",\"result\":{\"error\":\"voyage_billing\",\"message\":\"Quota exceeded\"}}\n\
             data: {\"event\":\"worker_done\"}\n",
        ]);

        let mut seen = Vec::new();
        let outcome =
            consume_event_stream(futures_util::stream::iter(body), |p, _| seen.push(p)).await;

        assert_eq!(seen, vec![75]);
        assert_eq!(
            outcome,
            StreamOutcome::Aborted {
                message: "Quota exceeded".into()
            }
        );
    }

    #[tokio::test]
    async fn read_failure_is_reported() {
        let body: Vec<Result<Vec<u8>, PortalError>> = vec![
            Ok(b"data: {\"event\":\"started\"}\n".to_vec()),
            Err(PortalError::StreamError("connection reset by peer".into())),
        ];
        let mut seen = Vec::new();
        let outcome =
            consume_event_stream(futures_util::stream::iter(body), |p, _| seen.push(p)).await;
        assert_eq!(seen, vec![5]);
        assert_eq!(
            outcome,
            StreamOutcome::Failed(PortalError::StreamError("connection reset by peer".into()))
        );
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn malformed_line_is_logged_and_skipped() {
        let body = chunks(&[
            "data: {\"event\":\"started\"\n",
            "data: {\"event\":\"worker_done\"}\n",
        ]);
        let mut seen = Vec::new();
        consume_event_stream(futures_util::stream::iter(body), |p, _| seen.push(p)).await;

        assert_eq!(seen, vec![100]);
        assert!(logs_contain("skipping malformed stream event"));
    }

    #[tokio::test]
    async fn numeric_job_id_is_captured_as_text() {
        let body = chunks(&[
            "data: {\"event\":\"started\",\"job_id\":123,\"pages_total\":4}\n",
            "data: {\"event\":\"worker_done\"}\n",
        ]);
        let mut seen = Vec::new();
        let outcome =
            consume_event_stream(futures_util::stream::iter(body), |p, _| seen.push(p)).await;

        assert_eq!(seen, vec![5, 100]);
        assert_eq!(
            outcome,
            StreamOutcome::Finished {
                job_id: Some("123".into()),
                report_path: None
            }
        );
    }

    #[tokio::test]
    async fn float_page_counter_still_reports_progress() {
        let body = chunks(&[
            "data: {\"event\":\"started\",\"job_id\":\"j-f\",\"pages_total\":4}\n",
            "data: {\"event\":\"report_saved\",\"pages_processed\":2.0,\"report_path\":\"r/a.md\"}\n",
            "data: {\"event\":\"report_saved\",\"pages_processed\":\"three\"}\n",
        ]);
        let mut seen = Vec::new();
        let outcome = consume_event_stream(futures_util::stream::iter(body), |p, m| {
            seen.push((p, m.to_string()))
        })
        .await;

        assert_eq!(seen[1], (25, "Analyzed page 2 of 4".to_string()));
        assert_eq!(seen[2], (0, "Analyzed page 0 of 4".to_string()));
        assert_eq!(
            outcome,
            StreamOutcome::Finished {
                job_id: Some("j-f".into()),
                report_path: Some("r/a.md".into())
            }
        );
    }

    #[tokio::test]
    async fn non_object_payloads_are_skipped() {
        let body = chunks(&[
            "data: null\ndata: 42\ndata: \"text\"\ndata: {\"event\":\"chunking_started\"}\n",
        ]);
        let mut seen = Vec::new();
        let outcome =
            consume_event_stream(futures_util::stream::iter(body), |p, _| seen.push(p)).await;
        assert_eq!(seen, vec![60]);
        assert_eq!(
            outcome,
            StreamOutcome::Finished {
                job_id: None,
                report_path: None
            }
        );
    }
}

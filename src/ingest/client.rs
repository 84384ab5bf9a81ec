//! Ingestion service client

use super::callback::IngestionCallback;
use super::consumer::{StreamOutcome, consume_payloads};
use super::report::{ReportArtifact, report_file_name};
use crate::config::{PortalConfig, join_url};
use crate::defaults::endpoints::{PDF_STREAM, REPORT_DOWNLOAD};
use crate::defaults::ingest::FILE_FIELD;
use crate::error::PortalError;
use crate::execution::http::interceptor::apply_before_send;
use crate::execution::http::response::error_from_body_text;
use crate::execution::http::{
    HttpInterceptor, HttpRequestContext, build_http_client_from_config,
    build_stream_client_from_config,
};
use crate::streaming::stream_data_payloads;
use crate::upload::{UploadFile, UploadKind};
use futures_util::StreamExt;
use std::sync::Arc;

/// Client for the document ingestion service.
///
/// Cloning is cheap; clones share connection pools. Every upload keeps its
/// own progress state, so independent uploads can run concurrently.
#[derive(Clone)]
pub struct IngestionClient {
    base_url: String,
    /// Used for the upload stream: no total request timeout, identity
    /// encoding when compression is disabled for streams
    stream_client: reqwest::Client,
    /// Used for request/response calls such as the report download
    http_client: reqwest::Client,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
}

impl std::fmt::Debug for IngestionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionClient")
            .field("base_url", &self.base_url)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

impl IngestionClient {
    pub fn new(config: &PortalConfig) -> Result<Self, PortalError> {
        Ok(Self {
            base_url: config.ingestion_base_url.clone(),
            stream_client: build_stream_client_from_config(&config.http)?,
            http_client: build_http_client_from_config(&config.http)?,
            interceptors: config.interceptors.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload `file` and follow the processing stream.
    ///
    /// Progress is reported through `callbacks.on_progress`; the upload then
    /// ends with exactly one `on_error` or `on_complete`. Failures are never
    /// returned: a rejected upload, a broken stream or a billing failure
    /// reported by the service all end in `on_error`. A job whose report
    /// cannot be downloaded still completes, with no report.
    pub async fn ingest_pdf_stream<C: IngestionCallback>(&self, file: UploadFile, mut callbacks: C) {
        let result = self
            .run(file, &mut |percent, message: &str| {
                callbacks.on_progress(percent, message)
            })
            .await;
        match result {
            Ok(report) => callbacks.on_complete(report),
            Err(e) => callbacks.on_error(&e.user_message()),
        }
    }

    /// Like [`Self::ingest_pdf_stream`], after checking `file` against the
    /// constraints of `kind`. A rejected file ends in `on_error` without any
    /// request being made.
    pub async fn ingest_validated<C: IngestionCallback>(
        &self,
        kind: UploadKind,
        file: UploadFile,
        mut callbacks: C,
    ) {
        if let Err(e) = kind.validate(&file) {
            callbacks.on_error(&e.user_message());
            return;
        }
        self.ingest_pdf_stream(file, callbacks).await;
    }

    /// Upload `file` and wait for the outcome.
    ///
    /// `Ok(None)` means the job finished but no report is available. A billing
    /// failure reported in-stream is a [`PortalError::IngestionError`].
    pub async fn ingest<P>(
        &self,
        file: UploadFile,
        mut on_progress: P,
    ) -> Result<Option<ReportArtifact>, PortalError>
    where
        P: FnMut(u8, &str) + Send,
    {
        self.run(file, &mut on_progress).await
    }

    async fn run<P>(
        &self,
        file: UploadFile,
        on_progress: &mut P,
    ) -> Result<Option<ReportArtifact>, PortalError>
    where
        P: FnMut(u8, &str) + Send + ?Sized,
    {
        let url = join_url(&self.base_url, PDF_STREAM);
        let ctx = HttpRequestContext::new("ingestion", url.clone(), true);
        tracing::info!(
            target: "rohde_portal::ingest",
            request_id = %ctx.request_id,
            file = %file.file_name,
            size = file.size(),
            "uploading document"
        );

        let response = match self.open_stream(&url, &ctx, &file).await {
            Ok(response) => response,
            Err(e) => {
                self.notify_error(&ctx, &e);
                return Err(e);
            }
        };

        let byte_stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| PortalError::StreamError(e.to_string())));
        let payloads = stream_data_payloads(byte_stream, self.interceptors.clone(), ctx.clone());

        match consume_payloads(payloads, on_progress).await {
            StreamOutcome::Failed(e) => {
                self.notify_error(&ctx, &e);
                Err(e)
            }
            StreamOutcome::Aborted { message } => {
                tracing::error!(target: "rohde_portal::ingest", request_id = %ctx.request_id, "ingestion stopped: {message}");
                Err(PortalError::IngestionError(message))
            }
            StreamOutcome::Finished { job_id: None, .. } => {
                tracing::info!(target: "rohde_portal::ingest", request_id = %ctx.request_id, "stream finished without a job id");
                Ok(None)
            }
            StreamOutcome::Finished {
                job_id: Some(job_id),
                report_path,
            } => {
                on_progress(100, "Downloading report...");
                match self.download_report(&job_id, report_path.as_deref()).await {
                    Ok(report) => Ok(Some(report)),
                    Err(e) => {
                        tracing::warn!(
                            target: "rohde_portal::ingest",
                            job_id = %job_id,
                            error = %e,
                            "Failed to download report for job {job_id}"
                        );
                        Ok(None)
                    }
                }
            }
        }
    }

    async fn open_stream(
        &self,
        url: &str,
        ctx: &HttpRequestContext,
        file: &UploadFile,
    ) -> Result<reqwest::Response, PortalError> {
        let form = reqwest::multipart::Form::new().part(FILE_FIELD, file.to_part()?);

        let builder = self
            .stream_client
            .post(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .multipart(form);
        let builder = apply_before_send(&self.interceptors, ctx, builder)?;

        let response = builder.send().await?;
        for it in &self.interceptors {
            it.on_response(ctx, &response);
        }
        if !response.status().is_success() {
            return Err(error_from_body_text(response).await);
        }
        Ok(response)
    }

    /// Fetch the report generated for `job_id`.
    ///
    /// The file name is derived from `report_path` (see [`report_file_name`]).
    pub async fn download_report(
        &self,
        job_id: &str,
        report_path: Option<&str>,
    ) -> Result<ReportArtifact, PortalError> {
        let url = format!(
            "{}/{}",
            join_url(&self.base_url, REPORT_DOWNLOAD),
            urlencoding::encode(job_id)
        );
        let ctx = HttpRequestContext::new("ingestion", url.clone(), false);

        let result = self.fetch_report(&url, &ctx, job_id, report_path).await;
        if let Err(e) = &result {
            self.notify_error(&ctx, e);
        }
        result
    }

    async fn fetch_report(
        &self,
        url: &str,
        ctx: &HttpRequestContext,
        job_id: &str,
        report_path: Option<&str>,
    ) -> Result<ReportArtifact, PortalError> {
        let builder = apply_before_send(&self.interceptors, ctx, self.http_client.get(url))?;
        let response = builder.send().await?;
        for it in &self.interceptors {
            it.on_response(ctx, &response);
        }
        if !response.status().is_success() {
            return Err(error_from_body_text(response).await);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;
        tracing::info!(target: "rohde_portal::ingest", job_id = %job_id, size = bytes.len(), "report downloaded");

        Ok(ReportArtifact {
            job_id: job_id.to_string(),
            file_name: report_file_name(job_id, report_path),
            bytes,
            content_type,
            received_at: chrono::Utc::now(),
        })
    }

    fn notify_error(&self, ctx: &HttpRequestContext, error: &PortalError) {
        tracing::warn!(target: "rohde_portal::ingest", request_id = %ctx.request_id, url = %ctx.url, error = %error, "ingestion request failed");
        for it in &self.interceptors {
            it.on_error(ctx, error);
        }
    }
}

//! Shared helpers for the integration tests: fixtures, mock servers and a
//! recording callback.

#![allow(dead_code)]

use rohde_portal::PortalConfig;
use rohde_portal::ingest::{IngestionCallback, ReportArtifact};
use std::path::{Path, PathBuf};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("ingest")
}

pub fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join(name)).expect("read fixture text")
}

/// Split `body` into chunks of at most `size` bytes, ignoring line and
/// character boundaries.
pub fn split_every(body: &[u8], size: usize) -> Vec<Result<Vec<u8>, rohde_portal::PortalError>> {
    body.chunks(size.max(1)).map(|c| Ok(c.to_vec())).collect()
}

/// Config pointing both services at `server`.
pub fn config_for(server: &MockServer) -> PortalConfig {
    PortalConfig::new()
        .with_auth_base_url(server.uri())
        .with_ingestion_base_url(server.uri())
}

/// Answer `POST /process/pdf/stream` with `body` as a line stream.
pub async fn mount_stream(server: &MockServer, body: impl Into<String>) {
    Mock::given(method("POST"))
        .and(path("/process/pdf/stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_raw(body.into(), "text/event-stream"),
        )
        .mount(server)
        .await;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Progress(u8, String),
    Error(String),
    /// File name and body of the delivered report, if any
    Complete(Option<(String, Vec<u8>)>),
}

/// [`IngestionCallback`] that records every call in order.
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
}

impl Recorder {
    pub fn progress(&self) -> Vec<(u8, String)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Progress(p, m) => Some((*p, m.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn percents(&self) -> Vec<u8> {
        self.progress().into_iter().map(|(p, _)| p).collect()
    }

    /// Every `on_error` / `on_complete` call, in order.
    pub fn terminals(&self) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|c| !matches!(c, Call::Progress(..)))
            .cloned()
            .collect()
    }
}

impl IngestionCallback for Recorder {
    fn on_progress(&mut self, percent: u8, message: &str) {
        self.calls.push(Call::Progress(percent, message.to_string()));
    }

    fn on_error(&mut self, message: &str) {
        self.calls.push(Call::Error(message.to_string()));
    }

    fn on_complete(&mut self, report: Option<ReportArtifact>) {
        self.calls.push(Call::Complete(
            report.map(|r| (r.file_name.clone(), r.bytes.to_vec())),
        ));
    }
}

//! Document ingestion
//!
//! Uploads a document to the ingestion service, follows the `data: <json>`
//! progress stream and downloads the generated report once the job ends.
//!
//! - [`IngestionClient`]: the HTTP side (upload, report download)
//! - [`consume_event_stream`]: the transport independent consumer loop
//! - [`ProgressTracker`]: maps events to `(percent, message)` pairs

pub mod callback;
pub mod client;
pub mod consumer;
pub mod progress;
pub mod report;

pub use callback::{IngestionCallback, IngestionCallbacks};
pub use client::IngestionClient;
pub use consumer::{StreamOutcome, consume_event_stream};
pub use progress::{ProgressStep, ProgressTracker};
pub use report::{ReportArtifact, report_file_name};

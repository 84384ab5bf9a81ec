//! # rohde-portal
//!
//! Client library for the Rohde ground-support-equipment rental portal.
//!
//! The portal is backed by two external HTTP services:
//!
//! - **Auth service**: login, signup, profile and avatar retrieval ([`auth`]).
//! - **Ingestion service**: accepts fleet documents, processes them server side and
//!   reports progress as a `data: <json>` line stream ([`ingest`]). When the job
//!   finishes, a generated report can be downloaded.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rohde_portal::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PortalClient::new(PortalConfig::from_env())?;
//!     let file = UploadFile::from_path("Mercury_Fleet_Report_Q3.pdf").await?;
//!
//!     let callbacks = IngestionCallbacks::new()
//!         .with_progress(|percent, message| println!("{percent:>3}% {message}"))
//!         .with_error(|message| eprintln!("upload failed: {message}"))
//!         .with_complete(|report| match report {
//!             Some(report) => println!("report ready: {}", report.file_name),
//!             None => println!("done, no report available"),
//!         });
//!
//!     client.ingestion().ingest_pdf_stream(file, callbacks).await;
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod defaults;
pub mod error;
pub mod execution;
pub mod ingest;
pub mod streaming;
pub mod telemetry;
pub mod types;
pub mod upload;
pub mod utils;

pub use client::PortalClient;
pub use config::PortalConfig;
pub use error::{PortalError, Result};

/// Commonly used types.
pub mod prelude {
    pub use crate::auth::AuthClient;
    pub use crate::client::PortalClient;
    pub use crate::config::PortalConfig;
    pub use crate::error::{PortalError, Result};
    pub use crate::ingest::{
        IngestionCallback, IngestionCallbacks, IngestionClient, ReportArtifact,
    };
    pub use crate::types::{
        AuthResponse, HttpConfig, IngestionEvent, ProfileUpdate, SignupRequest, UserData,
    };
    pub use crate::upload::{UploadFile, UploadKind};
}

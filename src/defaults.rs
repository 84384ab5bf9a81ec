//! Default Configuration Values
//!
//! Service locations, endpoint paths, timeouts and limits used across the crate.

use std::time::Duration;

/// Service base URLs
pub mod services {
    /// Auth service (login, signup, profile, avatars)
    pub const AUTH_BASE_URL: &str = "https://hammad712-rohde-auth.hf.space";

    /// Document ingestion service
    pub const INGESTION_BASE_URL: &str = "https://hammad712-ingestion.hf.space";
}

/// Endpoint paths, relative to the service base URL
pub mod endpoints {
    pub const LOGIN: &str = "/auth/login";
    pub const SIGNUP: &str = "/auth/signup";
    pub const ME: &str = "/auth/me";
    pub const AVATAR: &str = "/auth/avatar";

    /// Multipart upload answered with a `data: <json>` line stream
    pub const PDF_STREAM: &str = "/process/pdf/stream";
    /// Report download, followed by `/{job_id}`
    pub const REPORT_DOWNLOAD: &str = "/process/report/download";
}

/// HTTP client default configurations
pub mod http {
    use super::*;

    /// Default request timeout for plain request/response calls.
    ///
    /// Not applied to the ingestion stream, which may legitimately stay open
    /// for as long as the server keeps processing.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Default connection timeout for establishing HTTP connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default User-Agent string for HTTP requests
    pub const USER_AGENT: &str = concat!("rohde-portal/", env!("CARGO_PKG_VERSION"));
}

/// Ingestion stream protocol constants
pub mod ingest {
    /// Line prefix carrying an event payload
    pub const DATA_PREFIX: &str = "data: ";

    /// Payload marking logical end of stream; carries no event
    pub const DONE_MARKER: &str = "[DONE]";

    /// `result.error` value signalling the metered-usage limit was hit
    pub const BILLING_FAILURE_MARKER: &str = "voyage_billing";

    /// Collection name shown when `ingest_started` does not name one
    pub const DEFAULT_COLLECTION: &str = "vector db";

    /// Multipart field carrying the uploaded document
    pub const FILE_FIELD: &str = "file";
}

/// Upload limits enforced before a document is sent
pub mod limits {
    /// Single PDF upload size limit (10 MB)
    pub const MAX_PDF_BYTES: u64 = 10 * 1024 * 1024;

    /// Bulk ZIP upload size limit (50 MB)
    pub const MAX_ZIP_BYTES: u64 = 50 * 1024 * 1024;
}

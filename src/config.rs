//! Portal configuration
//!
//! Service locations, HTTP behavior and interceptors shared by the auth and
//! ingestion clients.

use crate::defaults::services::{AUTH_BASE_URL, INGESTION_BASE_URL};
use crate::execution::http::HttpInterceptor;
use crate::types::HttpConfig;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for [`crate::PortalClient`] and the individual service clients.
#[derive(Clone)]
pub struct PortalConfig {
    /// Auth service base URL, without trailing slash
    pub auth_base_url: String,
    /// Ingestion service base URL, without trailing slash
    pub ingestion_base_url: String,
    pub http: HttpConfig,
    pub interceptors: Vec<Arc<dyn HttpInterceptor>>,
}

impl std::fmt::Debug for PortalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalConfig")
            .field("auth_base_url", &self.auth_base_url)
            .field("ingestion_base_url", &self.ingestion_base_url)
            .field("http", &self.http)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            auth_base_url: AUTH_BASE_URL.to_string(),
            ingestion_base_url: INGESTION_BASE_URL.to_string(),
            http: HttpConfig::default(),
            interceptors: Vec::new(),
        }
    }
}

impl PortalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by environment variables:
    /// - `ROHDE_AUTH_BASE_URL`
    /// - `ROHDE_INGESTION_BASE_URL`
    /// - `ROHDE_HTTP_TIMEOUT_SECS` (`0` disables the request timeout)
    /// - `ROHDE_STREAM_DISABLE_COMPRESSION` (read by [`HttpConfig::default`])
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("ROHDE_AUTH_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config = config.with_auth_base_url(url);
        }
        if let Some(url) = lookup("ROHDE_INGESTION_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config = config.with_ingestion_base_url(url);
        }
        if let Some(secs) = lookup("ROHDE_HTTP_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(0) => config.http.timeout = None,
                Ok(n) => config.http.timeout = Some(Duration::from_secs(n)),
                Err(_) => tracing::warn!(
                    target: "rohde_portal::config",
                    value = %secs,
                    "ignoring invalid ROHDE_HTTP_TIMEOUT_SECS"
                ),
            }
        }
        config
    }

    pub fn with_auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.auth_base_url = normalize_base_url(url.into());
        self
    }

    pub fn with_ingestion_base_url(mut self, url: impl Into<String>) -> Self {
        self.ingestion_base_url = normalize_base_url(url.into());
        self
    }

    pub fn with_http_config(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn HttpInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an absolute endpoint path.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{base}{path}")
}

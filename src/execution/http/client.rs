//! HTTP client builders
//!
//! Two flavors share one configuration: request/response calls keep the
//! configured total timeout, the upload stream does not.

use crate::error::PortalError;
use crate::types::HttpConfig;
use reqwest::header::{ACCEPT_ENCODING, HeaderMap, HeaderName, HeaderValue};

/// Build the client for request/response calls from `config`.
///
/// # Example
/// ```rust,no_run
/// use rohde_portal::types::HttpConfig;
/// use rohde_portal::execution::http::client::build_http_client_from_config;
///
/// let config = HttpConfig::default();
/// let client = build_http_client_from_config(&config)?;
/// # Ok::<(), rohde_portal::PortalError>(())
/// ```
pub fn build_http_client_from_config(config: &HttpConfig) -> Result<reqwest::Client, PortalError> {
    build_client(config, default_headers(config, false)?)
}

/// Build the client for long-lived streaming responses.
///
/// Same settings as [`build_http_client_from_config`] without a total
/// request timeout. With `stream_disable_compression` every request also
/// carries `Accept-Encoding: identity` unless the configured headers already
/// set an encoding.
pub fn build_stream_client_from_config(config: &HttpConfig) -> Result<reqwest::Client, PortalError> {
    let config = config.for_streaming();
    let headers = default_headers(&config, config.stream_disable_compression)?;
    build_client(&config, headers)
}

/// Default headers for a client: the configured ones, plus
/// `Accept-Encoding: identity` when `identity_encoding` is set.
pub(crate) fn default_headers(
    config: &HttpConfig,
    identity_encoding: bool,
) -> Result<HeaderMap, PortalError> {
    let mut headers = HeaderMap::new();
    for (k, v) in &config.headers {
        let name = HeaderName::from_bytes(k.as_bytes()).map_err(|e| {
            PortalError::ConfigurationError(format!("Invalid header name '{k}': {e}"))
        })?;
        let value = HeaderValue::from_str(v).map_err(|e| {
            PortalError::ConfigurationError(format!("Invalid header value for '{k}': {e}"))
        })?;
        headers.insert(name, value);
    }
    if identity_encoding && !headers.contains_key(ACCEPT_ENCODING) {
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
    }
    Ok(headers)
}

fn build_client(config: &HttpConfig, headers: HeaderMap) -> Result<reqwest::Client, PortalError> {
    let mut builder = reqwest::Client::builder();

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }

    if let Some(proxy_url) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| PortalError::ConfigurationError(format!("Invalid proxy URL: {e}")))?;
        builder = builder.proxy(proxy);
    }

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent);
    }

    if !headers.is_empty() {
        builder = builder.default_headers(headers);
    }

    builder
        .build()
        .map_err(|e| PortalError::HttpError(format!("Failed to create HTTP client: {e}")))
}

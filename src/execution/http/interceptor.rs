//! HTTP Interceptor interfaces
//!
//! Interceptors can tweak request builders before send, observe responses,
//! be notified of errors, and see every line of the ingestion stream. The
//! hooks are best-effort and should avoid expensive work.

use crate::error::PortalError;

/// Context passed to interceptors describing the request.
#[derive(Clone, Debug)]
pub struct HttpRequestContext {
    pub request_id: String,
    /// `"auth"` or `"ingestion"`
    pub service: String,
    pub url: String,
    pub stream: bool,
}

impl HttpRequestContext {
    pub fn new(service: impl Into<String>, url: impl Into<String>, stream: bool) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            service: service.into(),
            url: url.into(),
            stream,
        }
    }
}

/// HTTP interceptor trait
pub trait HttpInterceptor: Send + Sync {
    /// Called before sending a request. Return the (possibly modified)
    /// builder or an error to short-circuit the request.
    fn on_before_send(
        &self,
        _ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, PortalError> {
        Ok(builder)
    }

    /// Called after a response is received, before its status is checked.
    fn on_response(&self, _ctx: &HttpRequestContext, _response: &reqwest::Response) {}

    /// Called when a request fails or is answered with an error status.
    fn on_error(&self, _ctx: &HttpRequestContext, _error: &PortalError) {}

    /// Called for every complete line of a streamed response.
    fn on_stream_line(&self, _ctx: &HttpRequestContext, _line: &str) {}
}

/// Run all `on_before_send` hooks in order.
pub(crate) fn apply_before_send(
    interceptors: &[std::sync::Arc<dyn HttpInterceptor>],
    ctx: &HttpRequestContext,
    mut builder: reqwest::RequestBuilder,
) -> Result<reqwest::RequestBuilder, PortalError> {
    for it in interceptors {
        builder = it.on_before_send(ctx, builder)?;
    }
    Ok(builder)
}

/// A simple logging interceptor backed by `tracing` (no sensitive data).
#[derive(Clone, Default)]
pub struct LoggingInterceptor;

impl HttpInterceptor for LoggingInterceptor {
    fn on_before_send(
        &self,
        ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, PortalError> {
        tracing::debug!(target: "rohde_portal::http", request_id=%ctx.request_id, service=%ctx.service, url=%ctx.url, stream=%ctx.stream, "sending request");
        Ok(builder)
    }

    fn on_response(&self, ctx: &HttpRequestContext, response: &reqwest::Response) {
        tracing::debug!(target: "rohde_portal::http", request_id=%ctx.request_id, service=%ctx.service, url=%ctx.url, status=%response.status().as_u16(), "response received");
    }

    fn on_error(&self, ctx: &HttpRequestContext, error: &PortalError) {
        tracing::debug!(target: "rohde_portal::http", request_id=%ctx.request_id, service=%ctx.service, url=%ctx.url, stream=%ctx.stream, err=%error, "request error");
    }

    fn on_stream_line(&self, ctx: &HttpRequestContext, line: &str) {
        tracing::trace!(target: "rohde_portal::http", request_id=%ctx.request_id, len=line.len(), "stream line");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct HeaderStamp;
    impl HttpInterceptor for HeaderStamp {
        fn on_before_send(
            &self,
            ctx: &HttpRequestContext,
            builder: reqwest::RequestBuilder,
        ) -> Result<reqwest::RequestBuilder, PortalError> {
            Ok(builder.header("x-request-id", ctx.request_id.clone()))
        }
    }

    struct Deny;
    impl HttpInterceptor for Deny {
        fn on_before_send(
            &self,
            _ctx: &HttpRequestContext,
            _builder: reqwest::RequestBuilder,
        ) -> Result<reqwest::RequestBuilder, PortalError> {
            Err(PortalError::InvalidInput("blocked".into()))
        }
    }

    #[test]
    fn request_ids_are_unique() {
        let a = HttpRequestContext::new("auth", "http://x/auth/me", false);
        let b = HttpRequestContext::new("auth", "http://x/auth/me", false);
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn before_send_hooks_run_in_order_and_short_circuit() {
        let client = reqwest::Client::new();
        let ctx = HttpRequestContext::new("auth", "http://localhost/auth/me", false);

        let chain: Vec<Arc<dyn HttpInterceptor>> =
            vec![Arc::new(LoggingInterceptor), Arc::new(HeaderStamp)];
        let req = apply_before_send(&chain, &ctx, client.get("http://localhost/auth/me"))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            req.headers().get("x-request-id").unwrap().to_str().unwrap(),
            ctx.request_id
        );

        let chain: Vec<Arc<dyn HttpInterceptor>> = vec![Arc::new(Deny), Arc::new(HeaderStamp)];
        assert!(apply_before_send(&chain, &ctx, client.get("http://localhost/auth/me")).is_err());
    }
}

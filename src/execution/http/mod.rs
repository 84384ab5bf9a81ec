//! HTTP client construction, interception and response helpers

pub mod client;
pub mod interceptor;
pub mod response;

pub use client::{build_http_client_from_config, build_stream_client_from_config};
pub use interceptor::{HttpInterceptor, HttpRequestContext, LoggingInterceptor};

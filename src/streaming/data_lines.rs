//! `data:` line stream helpers
//!
//! Turns a chunked byte stream into the JSON payload strings carried by
//! `data: <json>` lines. Parsing the payloads is left to the caller so a
//! single malformed line can be dropped without ending the stream.

use crate::defaults::ingest::{DATA_PREFIX, DONE_MARKER};
use crate::error::PortalError;
use crate::execution::http::interceptor::{HttpInterceptor, HttpRequestContext};
use crate::streaming::LineDecoder;
use futures_util::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;

pub type DataLineStream = Pin<Box<dyn Stream<Item = Result<String, PortalError>> + Send>>;

/// Extract the payload of one complete line.
///
/// The line is trimmed and must start with the literal `data: ` prefix;
/// blank lines, comments and other fields yield `None`. The payload is
/// trimmed again and the `[DONE]` marker yields `None`.
pub fn data_payload(line: &str) -> Option<&str> {
    let payload = line.trim().strip_prefix(DATA_PREFIX)?.trim();
    if payload == DONE_MARKER {
        return None;
    }
    Some(payload)
}

/// Convert a bytes stream into a stream of `data:` payloads.
///
/// - Calls `HttpInterceptor::on_stream_line` for every complete line.
/// - A transport error is yielded once and ends the stream.
/// - An unterminated trailing fragment at end of stream is discarded.
pub fn stream_data_payloads<S, B>(
    byte_stream: S,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
    ctx: HttpRequestContext,
) -> DataLineStream
where
    S: Stream<Item = Result<B, PortalError>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let out = async_stream::stream! {
        let mut byte_stream = Box::pin(byte_stream);
        let mut decoder = LineDecoder::new();

        while let Some(item) = byte_stream.next().await {
            let chunk = match item {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            for line in decoder.push(chunk.as_ref()) {
                for it in &interceptors {
                    it.on_stream_line(&ctx, &line);
                }
                if let Some(payload) = data_payload(&line) {
                    yield Ok(payload.to_string());
                }
            }
        }

        if let Some(rest) = decoder.finish() {
            tracing::debug!(
                target: "rohde_portal::ingest",
                request_id = %ctx.request_id,
                bytes = rest.len(),
                "discarding unterminated trailing line"
            );
        }
    };

    Box::pin(out)
}

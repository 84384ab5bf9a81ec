//! Streaming Module
//!
//! Line-oriented `data: <json>` stream handling used by the ingestion client:
//! - chunk-boundary independent line splitting (UTF-8 safe)
//! - `data:` payload extraction and done-marker filtering
//! - a byte-stream to payload-stream adapter

mod data_lines;
mod line_decoder;

pub use data_lines::*;
pub use line_decoder::*;

//! Shared data types
//!
//! Wire types for both services plus the HTTP configuration.

mod auth;
mod http;
mod ingest;

pub use auth::*;
pub use http::*;
pub use ingest::*;

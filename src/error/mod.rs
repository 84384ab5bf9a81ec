//! Error Handling Module
//!
//! - Core error type (`PortalError`, `ErrorCategory`)
//! - Conversions from transport and parsing errors
//!
//! # Example
//!
//! ```rust,ignore
//! use rohde_portal::error::{PortalError, ErrorCategory};
//!
//! let error = PortalError::api_error(404, "Not found");
//! assert_eq!(error.category(), ErrorCategory::Client);
//! assert!(!error.is_retryable());
//! ```

mod conversions;
pub mod types;

pub use types::*;

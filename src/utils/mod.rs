//! Utility modules

pub mod format;
pub mod mime;

pub use format::format_file_size;

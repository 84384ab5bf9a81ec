//! Human-readable formatting helpers

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Format a byte count with base-1024 units, rounded to two decimals.
///
/// `0` renders as `0 Bytes`; sizes beyond the largest unit stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut i = 0;
    while i < UNITS.len() - 1 && bytes >= 1024u64.pow(i as u32 + 1) {
        i += 1;
    }
    let value = (bytes as f64 / 1024f64.powi(i as i32) * 100.0).round() / 100.0;
    format!("{} {}", value, UNITS[i])
}

//! Human-readable byte sizes for the index page.

const UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Format a byte count as `"<value> <unit>"` using 1024-based magnitudes.
///
/// The value is rounded to two decimals and trailing zeros are dropped, so
/// `1024` renders as `"1 KB"` and `1536` as `"1.5 KB"`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    // Integer magnitude avoids float error right at the 1024^n boundaries.
    let mut magnitude = 0usize;
    let mut remaining = bytes;
    while remaining >= 1024 && magnitude < UNITS.len() - 1 {
        remaining /= 1024;
        magnitude += 1;
    }

    let value = bytes as f64 / 1024f64.powi(magnitude as i32);
    let rounded = (value * 100.0).round() / 100.0;

    format!("{} {}", rounded, UNITS[magnitude])
}

//! Human-readable formatting for metric values.

const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Format a byte count with binary units, e.g. `"1.2 GiB"` or `"512 B"`.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Format a percentage; NaN (no sample yet) renders as `"--%"`.
pub fn format_percent(value: f32) -> String {
    if value.is_nan() {
        "--%".into()
    } else {
        format!("{:.1}%", value)
    }
}

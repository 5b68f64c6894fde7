//! Human-readable sizes, counts and ages.

use chrono::{DateTime, Utc};

const BYTE_UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Age thresholds in seconds, largest first.
const AGE_UNITS: [(i64, &str); 5] = [
    (31_536_000, "years"),
    (2_592_000, "months"),
    (86_400, "days"),
    (3_600, "hours"),
    (60, "minutes"),
];

/// Format a byte count with 1024-based units and up to two decimals.
///
/// Trailing zeros are dropped: `1536` is `"1.5 KB"`, `1024` is `"1 KB"`.
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", BYTE_UNITS[unit])
}

/// Format an integer with `,` thousands separators.
pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Describe how long before `now` the instant `then` was, e.g. `"3 days ago"`.
///
/// A unit is used only when more than one whole unit has passed, so
/// exactly one day reads as `"24 hours ago"`. Future instants read as
/// `"0 seconds ago"`.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    for (unit_seconds, name) in AGE_UNITS {
        if seconds > unit_seconds {
            return format!("{} {name} ago", seconds / unit_seconds);
        }
    }
    format!("{seconds} seconds ago")
}

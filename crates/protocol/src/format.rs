//! Human-readable byte-size formatting.

use serde::{Deserialize, Serialize};

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Unit preference for displayed sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeUnit {
    /// Largest binary unit with a value of at least 1.
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "b")]
    Bytes,
    #[serde(rename = "kb")]
    Kilobytes,
    #[serde(rename = "mb")]
    Megabytes,
    #[serde(rename = "gb")]
    Gigabytes,
}

/// Formats a byte count for display, e.g. `"1.5 KB"`.
///
/// Whole values render without a fraction, everything else with one decimal.
pub fn format_size(bytes: u64, unit: SizeUnit) -> String {
    let (divisor, suffix) = match unit {
        SizeUnit::Bytes => (1, "B"),
        SizeUnit::Kilobytes => (KB, "KB"),
        SizeUnit::Megabytes => (MB, "MB"),
        SizeUnit::Gigabytes => (GB, "GB"),
        SizeUnit::Auto => {
            if bytes >= GB {
                (GB, "GB")
            } else if bytes >= MB {
                (MB, "MB")
            } else if bytes >= KB {
                (KB, "KB")
            } else {
                (1, "B")
            }
        }
    };

    if bytes % divisor == 0 {
        format!("{} {suffix}", bytes / divisor)
    } else {
        format!("{:.1} {suffix}", bytes as f64 / divisor as f64)
    }
}

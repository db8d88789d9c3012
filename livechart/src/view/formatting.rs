//! Shared formatting utilities for chart labels and values.

use chrono::DateTime;

use livechart_common::Label;

use crate::config::TimeUnit;

/// Shown wherever a sample is missing.
pub const PLACEHOLDER: &str = "-";

/// Format with a fixed number of decimals.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// Drop trailing zeros (and a dangling point) from a fixed-decimal string.
///
/// `"10.50"` -> `"10.5"`, `"2.00"` -> `"2"`, `"-0.0"` -> `"0"`.
pub fn trim_fixed(fixed: &str) -> String {
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed
    };

    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Format an X-axis label.
///
/// Timestamps render as UTC `HH:MM:SS`; text labels as-is. Timestamps
/// outside the calendar range render as the raw number.
pub fn format_label(label: &Label, unit: TimeUnit) -> String {
    match label {
        Label::Timestamp(value) => {
            let millis = unit.to_millis(*value);
            (millis.is_finite() && millis.abs() < i64::MAX as f64)
                .then(|| DateTime::from_timestamp_millis(millis.floor() as i64))
                .flatten()
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| label.to_string())
        }
        Label::Text(text) => text.clone(),
    }
}

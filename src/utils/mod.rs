//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;
pub mod retry;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Offset of the operator's timezone (Almaty, UTC+5)
pub const LOCAL_OFFSET_SECS: i32 = 5 * 3600;

/// Label printed next to rendered timestamps
pub const LOCAL_TZ_LABEL: &str = "UTC+5";

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();

    let re = WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid regex pattern"));

    re.replace_all(text.trim(), " ").to_string()
}

/// The operator's fixed timezone
pub fn local_offset() -> FixedOffset {
    FixedOffset::east_opt(LOCAL_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Render a timestamp in the operator's timezone with minute precision
pub fn format_local(at: DateTime<Utc>) -> String {
    format!(
        "{} ({LOCAL_TZ_LABEL})",
        at.with_timezone(&local_offset()).format("%d.%m.%Y %H:%M")
    )
}

/// Format an interval as a short human-readable string ("2 min", "3 h")
pub fn format_interval(secs: u64) -> String {
    if secs >= 3600 && secs % 3600 == 0 {
        format!("{} h", secs / 3600)
    } else if secs >= 60 && secs % 60 == 0 {
        format!("{} min", secs / 60)
    } else {
        format!("{secs} s")
    }
}

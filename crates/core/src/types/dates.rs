//! Store display formatting for timestamps.

use chrono::{DateTime, Utc};

/// The store's medium date/time display format, e.g. `Apr 2, 2024 3:04:05 PM`.
const STORE_DATETIME_FORMAT: &str = "%b %-d, %Y %-l:%M:%S %p";

/// Format a timestamp the way the store displays it to agents.
#[must_use]
pub fn format_store_datetime(dt: DateTime<Utc>) -> String {
    dt.format(STORE_DATETIME_FORMAT).to_string()
}

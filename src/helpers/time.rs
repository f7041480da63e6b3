use chrono::{TimeZone, Utc};
use tokio::time::Instant;

use crate::utils::constants::DEFAULT_SAFETY_MARGIN_SECS;

pub fn get_token_safety_margin_seconds(safety_margin_seconds_settings: Option<u64>) -> u64 {
    safety_margin_seconds_settings.unwrap_or(DEFAULT_SAFETY_MARGIN_SECS)
}

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}

pub fn get_instant() -> Instant {
    Instant::now()
}

/// Unix seconds rendered as RFC3339, `None` for out-of-range values.
pub fn unix_to_rfc3339(unix_ts: i64) -> Option<String> {
    Utc.timestamp_opt(unix_ts, 0)
        .single()
        .map(|date_time| date_time.to_rfc3339())
}

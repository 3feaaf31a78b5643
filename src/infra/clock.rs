use std::time::{SystemTime, UNIX_EPOCH};

/// Текущее время, Unix timestamp в секундах.
pub fn now_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

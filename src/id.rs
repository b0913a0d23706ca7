//! ID and timestamp utilities for tasbeeh
//!
//! Provides functions for generating unique record identifiers and
//! ISO-8601 timestamps.

use chrono::{SecondsFormat, Utc};
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix in generated IDs
const SUFFIX_LEN: usize = 7;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

/// Generate a unique ID with the given prefix
///
/// Format: `{prefix}_{timestamp_ms}_{random_base36}`
/// Example: `tasbeeh_1738300800123_k3f9x2a`
pub fn generate_id(prefix: &str) -> String {
    let timestamp = now_ms();
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{}_{}_{}", prefix, timestamp, suffix)
}

/// Get the current instant as an ISO-8601 string
///
/// Millisecond precision, UTC with a `Z` suffix. Strings in this format
/// compare chronologically.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

//! Wall clock helpers
//!
//! Persisted timestamps are integer milliseconds since the Unix epoch. Code
//! that derives anything from "now" takes an explicit `now_ms` argument so it
//! stays deterministic; these helpers feed the convenience wrappers.

use time::OffsetDateTime;

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms_is_recent() {
        // 2020-01-01 in milliseconds; anything earlier means a unit slip
        assert!(now_ms() > 1_577_836_800_000);
    }
}

//! Time-related utilities with clock abstraction for testability.
//!
//! Timestamps are Unix milliseconds. Sessions record them for creation and
//! last activity; the idle reaper compares them against a [`Clock`].

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in milliseconds
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_jst_timestamp()
    }
}

/// Manually driven clock for tests.
///
/// Starts at a fixed instant and only moves when [`FixedClock::advance_secs`]
/// or [`FixedClock::set`] is called.
#[derive(Debug, Default)]
pub struct FixedClock {
    now: AtomicI64,
}

impl FixedClock {
    /// Create a new clock frozen at `millis`
    pub fn new(millis: i64) -> Self {
        Self {
            now: AtomicI64::new(millis),
        }
    }

    /// Move the clock forward by `secs` seconds
    pub fn advance_secs(&self, secs: u64) {
        self.now.fetch_add(secs_to_millis(secs), Ordering::SeqCst);
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).expect("UTC+9 is a valid offset")
}

/// Get current Unix timestamp in JST (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    let now_jst: DateTime<FixedOffset> = Utc::now().with_timezone(&jst());
    now_jst.timestamp_millis()
}

/// Convert seconds to milliseconds, saturating on overflow
pub fn secs_to_millis(secs: u64) -> i64 {
    i64::try_from(secs.saturating_mul(1000)).unwrap_or(i64::MAX)
}

/// Convert Unix timestamp (milliseconds) to JST RFC 3339 format
///
/// Out-of-range timestamps fall back to the Unix epoch.
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    let seconds = timestamp_millis.div_euclid(1000);
    let nanos = (timestamp_millis.rem_euclid(1000) * 1_000_000) as u32;
    match jst().timestamp_opt(seconds, nanos).single() {
        Some(dt) => dt.to_rfc3339(),
        None => jst()
            .timestamp_opt(0, 0)
            .single()
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default(),
    }
}

use chrono::{DateTime, Utc};

/// Where a practice session reads its `started_at` and `completed_at` stamps.
///
/// These two stamps are the only wall-clock values a session records. Step
/// countdowns advance one explicit tick at a time, so swapping in
/// `Clock::Fixed` makes a finished summary fully reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// Whole seconds from `started_at` to `completed_at`, floored at zero.
///
/// A system clock stepped backwards mid-session yields 0 rather than a
/// negative duration.
#[must_use]
pub fn elapsed_secs(started_at: DateTime<Utc>, completed_at: DateTime<Utc>) -> u64 {
    u64::try_from((completed_at - started_at).num_seconds()).unwrap_or(0)
}

/// Session start used by deterministic tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// `FIXED_TEST_TIMESTAMP` as a `DateTime<Utc>`.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn fixed_clock_always_reports_the_same_instant() {
        let clock = fixed_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().timestamp(), FIXED_TEST_TIMESTAMP);
    }

    #[test]
    fn elapsed_counts_whole_seconds() {
        let started = fixed_now();
        assert_eq!(elapsed_secs(started, started), 0);
        assert_eq!(elapsed_secs(started, started + Duration::milliseconds(95_400)), 95);
    }

    #[test]
    fn completion_before_start_counts_as_zero() {
        let started = fixed_now();
        assert_eq!(elapsed_secs(started, started - Duration::seconds(3)), 0);
    }
}

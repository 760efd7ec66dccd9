//! Time-bounded in-memory caches
//!
//! Caches exist only to avoid redundant network calls; they have no
//! correctness role. Expiry is driven by an injectable clock so tests
//! never depend on real time.

use chrono::{DateTime, Duration, Utc};

/// Source of "now" — swapped for a manual clock in tests
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A cached payload with its fetch time and validity window
pub struct TimedCache<T> {
    entry: Option<(T, DateTime<Utc>)>,
    ttl: Duration,
}

impl<T> TimedCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    /// The cached value, only while still within its validity window
    pub fn fresh(&self, clock: &dyn Clock) -> Option<&T> {
        let (value, fetched_at) = self.entry.as_ref()?;
        if clock.now() - *fetched_at < self.ttl {
            Some(value)
        } else {
            None
        }
    }

    /// The cached value regardless of age — the degraded fallback
    /// served when a refresh fails upstream
    pub fn stale(&self) -> Option<&T> {
        self.entry.as_ref().map(|(value, _)| value)
    }

    pub fn put(&mut self, value: T, clock: &dyn Clock) {
        self.entry = Some((value, clock.now()));
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.entry.as_ref().map(|(_, at)| *at)
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Manually advanced clock for expiry tests
    pub struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        pub fn starting_at(now: DateTime<Utc>) -> Self {
            Self { now: Mutex::new(now) }
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now = *now + by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ManualClock;
    use super::*;

    #[test]
    fn fresh_within_window_then_expires() {
        let clock = ManualClock::starting_at(Utc::now());
        let mut cache = TimedCache::new(Duration::hours(1));
        cache.put(42u32, &clock);

        assert_eq!(cache.fresh(&clock), Some(&42));

        clock.advance(Duration::minutes(59));
        assert_eq!(cache.fresh(&clock), Some(&42));

        clock.advance(Duration::minutes(2));
        assert_eq!(cache.fresh(&clock), None);
    }

    #[test]
    fn stale_survives_expiry() {
        let clock = ManualClock::starting_at(Utc::now());
        let mut cache = TimedCache::new(Duration::hours(24));
        assert!(cache.stale().is_none());

        cache.put("catalog".to_string(), &clock);
        clock.advance(Duration::days(3));

        assert_eq!(cache.fresh(&clock), None);
        assert_eq!(cache.stale(), Some(&"catalog".to_string()));
    }

    #[test]
    fn put_resets_the_window() {
        let clock = ManualClock::starting_at(Utc::now());
        let mut cache = TimedCache::new(Duration::hours(1));
        cache.put(1u32, &clock);

        clock.advance(Duration::minutes(50));
        cache.put(2u32, &clock);

        clock.advance(Duration::minutes(50));
        assert_eq!(cache.fresh(&clock), Some(&2));
    }
}

//! Shared fixtures for unit tests.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Arc, Mutex, PoisonError};

/// Clock pinned to a settable instant.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock pinned to `now`.
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Creates a shared clock pinned to `now`.
    pub fn shared(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self::new(now))
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    /// Pins the clock to `at`.
    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fixed reference instant used across tests.
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0)
        .single()
        .expect("valid reference time")
}

#[cfg(test)]
mod tests {
    use super::{ManualClock, reference_time};
    use chrono::Duration;
    use mockable::Clock;
    use rstest::rstest;
    use std::sync::Arc;

    #[rstest]
    fn clock_keeps_time_after_a_panicking_holder() {
        let clock = ManualClock::shared(reference_time());
        let poisoner = Arc::clone(&clock);
        let outcome = std::thread::spawn(move || {
            let _held = poisoner.now.lock().expect("first lock");
            panic!("holder panics while locked");
        })
        .join();

        clock.advance(Duration::hours(1));

        assert!(outcome.is_err());
        assert_eq!(clock.utc(), reference_time() + Duration::hours(1));
    }
}

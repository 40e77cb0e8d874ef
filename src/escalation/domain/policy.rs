//! Time thresholds that make an issue due for escalation.

use crate::issue::domain::EscalationCandidateQuery;
use chrono::{DateTime, Duration, Utc};

/// Escalation thresholds.
///
/// An issue at the Taluka tier escalates once it is older than the taluka
/// threshold; an issue at the District tier escalates once its last
/// scheduled escalation is older than the district threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationPolicy {
    taluka_threshold: Duration,
    district_threshold: Duration,
}

impl EscalationPolicy {
    /// Default days an issue may wait at the Taluka tier.
    pub const DEFAULT_TALUKA_THRESHOLD_DAYS: i64 = 7;
    /// Default days an issue may wait at the District tier.
    pub const DEFAULT_DISTRICT_THRESHOLD_DAYS: i64 = 5;

    /// Creates a policy with explicit thresholds.
    #[must_use]
    pub const fn new(taluka_threshold: Duration, district_threshold: Duration) -> Self {
        Self {
            taluka_threshold,
            district_threshold,
        }
    }

    /// Returns the Taluka tier threshold.
    #[must_use]
    pub const fn taluka_threshold(&self) -> Duration {
        self.taluka_threshold
    }

    /// Returns the District tier threshold.
    #[must_use]
    pub const fn district_threshold(&self) -> Duration {
        self.district_threshold
    }

    /// Builds the selection predicates for a sweep at `now`, Taluka first.
    ///
    /// A threshold reaching past the earliest representable instant yields a
    /// cutoff of [`DateTime::<Utc>::MIN_UTC`], which matches nothing.
    #[must_use]
    pub fn candidate_queries(&self, now: DateTime<Utc>) -> [EscalationCandidateQuery; 2] {
        [
            EscalationCandidateQuery::TalukaOverdue {
                reported_before: cutoff(now, self.taluka_threshold),
            },
            EscalationCandidateQuery::DistrictOverdue {
                escalated_before: cutoff(now, self.district_threshold),
            },
        ]
    }
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self::new(
            Duration::days(Self::DEFAULT_TALUKA_THRESHOLD_DAYS),
            Duration::days(Self::DEFAULT_DISTRICT_THRESHOLD_DAYS),
        )
    }
}

fn cutoff(now: DateTime<Utc>, threshold: Duration) -> DateTime<Utc> {
    now.checked_sub_signed(threshold)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

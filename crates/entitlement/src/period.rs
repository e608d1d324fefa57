//! Billing periods.
//!
//! Reading quotas are counted per calendar month in UTC. A period is stored
//! alongside every recorded view as `year * 100 + month`, so the quota of a
//! new month starts empty without any reset job.

use std::fmt;

use time::{Month, OffsetDateTime, UtcOffset};

/// A single calendar month in UTC.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BillingPeriod {
    year: i32,
    month: Month,
}

impl BillingPeriod {
    /// Period containing the current moment.
    pub fn current() -> Self {
        Self::containing(OffsetDateTime::now_utc())
    }

    /// Period containing the provided moment.
    pub fn containing(at: OffsetDateTime) -> Self {
        let at = at.to_offset(UtcOffset::UTC);

        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    /// Database key of this period.
    pub fn key(&self) -> i32 {
        self.year * 100 + self.month as i32
    }

    /// The period right after this one.
    pub fn next(&self) -> Self {
        match self.month {
            Month::December => Self {
                year: self.year + 1,
                month: Month::January,
            },
            month => Self {
                year: self.year,
                month: month.next(),
            },
        }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month as u8)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::BillingPeriod;

    #[test]
    fn keys() {
        let period = BillingPeriod::containing(datetime!(2026-10-19 12:00 UTC));
        assert_eq!(period.key(), 202610);
        assert_eq!(period.to_string(), "2026-10");

        let period = BillingPeriod::containing(datetime!(2026-01-01 00:00 UTC));
        assert_eq!(period.key(), 202601);
    }

    #[test]
    fn offsets_are_normalized() {
        let period = BillingPeriod::containing(datetime!(2026-11-01 01:30 +02:00));
        assert_eq!(period.key(), 202610);
    }

    #[test]
    fn next_period() {
        let period = BillingPeriod::containing(datetime!(2026-11-30 23:59 UTC));
        assert_eq!(period.next().key(), 202612);
        assert_eq!(period.next().next().key(), 202701);
        assert!(period < period.next());
    }
}

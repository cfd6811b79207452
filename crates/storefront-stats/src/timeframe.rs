//! Reporting windows relative to "now".
//!
//! All ranges are half-open: `start` is included, `end` is not.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// From midnight on the first of the current month up to `now`.
    pub fn this_month(now: DateTime<Utc>) -> Self {
        Self {
            start: midnight(first_of_month(now.date_naive())),
            end: now,
        }
    }

    /// The whole previous calendar month.
    pub fn last_month(now: DateTime<Utc>) -> Self {
        let this_start = first_of_month(now.date_naive());
        let last_start = first_of_month(this_start - Days::new(1));
        Self {
            start: midnight(last_start),
            end: midnight(this_start),
        }
    }

    /// The `months` months leading up to `now`.
    pub fn trailing_months(now: DateTime<Utc>, months: u32) -> Self {
        Self {
            start: now
                .checked_sub_months(Months::new(months))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            end: now,
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

//! Calendar-month bucketing for the bar and line charts.
//!
//! Records are placed by month-of-year distance from `today`, ignoring the
//! year: a record from 14 months ago lands in the same slot as one from 2
//! months ago. Callers constrain their queries to the window so this only
//! matters at the 12-month boundary.

use chrono::{DateTime, Datelike, Utc};

/// Length of a chart series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    SixMonths,
    TwelveMonths,
}

impl Window {
    pub const fn len(self) -> usize {
        match self {
            Window::SixMonths => 6,
            Window::TwelveMonths => 12,
        }
    }
}

/// Index of the bucket `created_at` falls into, or `None` when it is outside
/// the window. Index 0 is the oldest month, `len - 1` the current one.
pub fn month_slot(created_at: DateTime<Utc>, today: DateTime<Utc>, window: Window) -> Option<usize> {
    let len = window.len();
    let month_diff = ((today.month0() + 12 - created_at.month0()) % 12) as usize;
    (month_diff < len).then(|| len - month_diff - 1)
}

/// Count records per month.
pub fn count_by_month<I>(created: I, window: Window, today: DateTime<Utc>) -> Vec<u64>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut data = vec![0u64; window.len()];
    for created_at in created {
        if let Some(slot) = month_slot(created_at, today, window) {
            data[slot] += 1;
        }
    }
    data
}

/// Sum a numeric field per month. Pass `0.0` for records missing the field.
pub fn sum_by_month<I>(points: I, window: Window, today: DateTime<Utc>) -> Vec<f64>
where
    I: IntoIterator<Item = (DateTime<Utc>, f64)>,
{
    let mut data = vec![0.0; window.len()];
    for (created_at, value) in points {
        if let Some(slot) = month_slot(created_at, today, window) {
            data[slot] += value;
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Months, TimeZone};

    fn today() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 15, 12, 0, 0).unwrap()
    }

    fn months_ago(n: u32) -> DateTime<Utc> {
        today().checked_sub_months(Months::new(n)).unwrap()
    }

    #[test]
    fn test_empty_input_yields_zeroes() {
        assert_eq!(
            count_by_month(Vec::new(), Window::SixMonths, today()),
            vec![0; 6]
        );
        assert_eq!(
            sum_by_month(Vec::new(), Window::TwelveMonths, today()),
            vec![0.0; 12]
        );
    }

    #[test]
    fn test_length_is_fixed_regardless_of_input() {
        let dates: Vec<_> = (0..40).map(months_ago).collect();
        for window in [Window::SixMonths, Window::TwelveMonths] {
            assert_eq!(count_by_month(dates.clone(), window, today()).len(), window.len());
            let points = dates.iter().map(|d| (*d, 1.5));
            assert_eq!(sum_by_month(points, window, today()).len(), window.len());
        }
    }

    #[test]
    fn test_current_month_is_last_bucket() {
        let counts = count_by_month(vec![today(), today()], Window::SixMonths, today());
        assert_eq!(counts, vec![0, 0, 0, 0, 0, 2]);
    }

    #[test]
    fn test_oldest_month_is_first_bucket() {
        let counts = count_by_month(vec![months_ago(5)], Window::SixMonths, today());
        assert_eq!(counts, vec![1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_record_at_window_length_is_excluded() {
        let counts = count_by_month(vec![months_ago(6)], Window::SixMonths, today());
        assert_eq!(counts, vec![0; 6]);
    }

    #[test]
    fn test_year_is_ignored() {
        // 14 months back shares a calendar month with 2 months back
        let counts = count_by_month(vec![months_ago(14)], Window::SixMonths, today());
        assert_eq!(counts, vec![0, 0, 0, 1, 0, 0]);

        // 12 months back wraps onto the current month
        let counts = count_by_month(vec![months_ago(12)], Window::TwelveMonths, today());
        assert_eq!(counts[11], 1);
    }

    #[test]
    fn test_sum_by_month_adds_values() {
        let points = vec![
            (today(), 100.0),
            (today(), 50.0),
            (months_ago(1), 20.0),
            (months_ago(11), 7.0),
        ];
        let sums = sum_by_month(points, Window::TwelveMonths, today());
        assert_eq!(sums[11], 150.0);
        assert_eq!(sums[10], 20.0);
        assert_eq!(sums[0], 7.0);
        assert_eq!(sums.iter().sum::<f64>(), 177.0);
    }

    #[test]
    fn test_month_slot_across_year_boundary() {
        let january = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        let november = Utc.with_ymd_and_hms(2024, 11, 3, 0, 0, 0).unwrap();
        assert_eq!(month_slot(november, january, Window::SixMonths), Some(3));
    }
}

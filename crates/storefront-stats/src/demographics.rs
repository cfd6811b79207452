use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Age in whole years on `today`.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// User counts per age bracket for the pie chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeGroups {
    /// Under 20
    pub teen: u64,
    /// 20 to 59
    pub adult: u64,
    /// 60 and over
    pub old: u64,
}

impl AgeGroups {
    pub fn from_ages<I: IntoIterator<Item = i32>>(ages: I) -> Self {
        ages.into_iter().fold(Self::default(), |mut groups, age| {
            match age {
                a if a < 20 => groups.teen += 1,
                a if a < 60 => groups.adult += 1,
                _ => groups.old += 1,
            }
            groups
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_before_and_after_birthday() {
        let dob = date(2000, 6, 15);
        assert_eq!(age_on(dob, date(2024, 6, 14)), 23);
        assert_eq!(age_on(dob, date(2024, 6, 15)), 24);
        assert_eq!(age_on(dob, date(2024, 12, 1)), 24);
        assert_eq!(age_on(dob, date(2024, 1, 1)), 23);
    }

    #[test]
    fn test_age_groups_boundaries() {
        let groups = AgeGroups::from_ages([5, 19, 20, 59, 60, 85]);
        assert_eq!(
            groups,
            AgeGroups {
                teen: 2,
                adult: 2,
                old: 2
            }
        );
    }

    #[test]
    fn test_age_groups_empty() {
        assert_eq!(AgeGroups::from_ages(Vec::new()), AgeGroups::default());
    }
}

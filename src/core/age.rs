use chrono::{Datelike, Days, Months, NaiveDate};

/// Inclusive range of dates of birth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthDateRange {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

/// Age in whole years on `today`
///
/// A person born on February 29th turns a year older on March 1st in
/// non-leap years.
#[inline]
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> u16 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age.max(0) as u16
}

/// Dates of birth whose age on `today` falls within `min_age..=max_age`
///
/// This is the age pre-filter pushed down to the store. It carries one day
/// of slack on each side; the visibility filter does the exact check.
///
/// # Arguments
/// * `min_age` - Youngest accepted age in years
/// * `max_age` - Oldest accepted age in years
/// * `today` - Reference date
pub fn birth_date_range(min_age: u16, max_age: u16, today: NaiveDate) -> BirthDateRange {
    let latest = years_before(today, min_age as u32)
        .checked_add_days(Days::new(1))
        .unwrap_or(NaiveDate::MAX);
    let earliest = years_before(today, max_age as u32 + 1);

    BirthDateRange { earliest, latest }
}

/// Check if a date of birth is within a range
#[inline]
pub fn is_within_range(date_of_birth: NaiveDate, range: &BirthDateRange) -> bool {
    date_of_birth >= range.earliest && date_of_birth <= range.latest
}

fn years_before(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_before_and_after_birthday() {
        let dob = date(1990, 6, 15);
        assert_eq!(age_on(dob, date(2020, 6, 14)), 29);
        assert_eq!(age_on(dob, date(2020, 6, 15)), 30);
        assert_eq!(age_on(dob, date(2020, 12, 31)), 30);
    }

    #[test]
    fn test_leap_day_birthday() {
        let dob = date(2000, 2, 29);
        assert_eq!(age_on(dob, date(2021, 2, 28)), 20);
        assert_eq!(age_on(dob, date(2021, 3, 1)), 21);
        assert_eq!(age_on(dob, date(2024, 2, 29)), 24);
    }

    #[test]
    fn test_future_date_of_birth_is_zero() {
        assert_eq!(age_on(date(2030, 1, 1), date(2026, 1, 1)), 0);
    }

    #[test]
    fn test_birth_date_range_contains_bounds() {
        let today = date(2026, 10, 17);
        let range = birth_date_range(20, 30, today);

        // Turned 20 today
        assert!(is_within_range(date(2006, 10, 17), &range));
        // Turns 31 tomorrow
        assert!(is_within_range(date(1995, 10, 18), &range));
        // Already 31
        assert!(!is_within_range(date(1995, 10, 16), &range));
        // Still 19 for two more days
        assert!(!is_within_range(date(2006, 10, 19), &range));
    }

    #[test]
    fn test_range_is_superset_of_exact_ages() {
        let today = date(2026, 3, 1);
        let range = birth_date_range(25, 26, today);
        let mut dob = date(1995, 1, 1);
        while dob < date(2003, 1, 1) {
            let age = age_on(dob, today);
            if (25..=26).contains(&age) {
                assert!(is_within_range(dob, &range), "{} should be in range", dob);
            }
            dob = dob.succ_opt().unwrap();
        }
    }
}

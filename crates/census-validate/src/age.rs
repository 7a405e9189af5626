//! Adulthood check against an injected clock.

use chrono::{Datelike, NaiveDate};

pub const ADULT_AGE_YEARS: i32 = 18;

/// Source of "today" for the age check. Injected so tests can pin the date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Reads the local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// The latest birth date that still counts as an adult today.
///
/// Computed as (year - 18, month, day); a Feb 29 anchor with no leap-year
/// counterpart rolls forward to Mar 1, matching calendar arithmetic on the
/// original system.
pub fn adult_cutoff(today: NaiveDate) -> NaiveDate {
    let year = today.year() - ADULT_AGE_YEARS;
    match NaiveDate::from_ymd_opt(year, today.month(), today.day()) {
        Some(date) => date,
        None => NaiveDate::from_ymd_opt(year, 3, 1).unwrap_or(today),
    }
}

/// True iff a person born on `born` is at least 18 years old on `today`.
pub fn is_adult(born: NaiveDate, today: NaiveDate) -> bool {
    born <= adult_cutoff(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn exactly_eighteen_is_adult() {
        let today = date(2026, 8, 7);
        assert!(is_adult(date(2008, 8, 7), today));
    }

    #[test]
    fn one_day_short_is_not_adult() {
        let today = date(2026, 8, 7);
        assert!(!is_adult(date(2008, 8, 8), today));
    }

    #[test]
    fn earlier_birth_dates_are_never_less_adult() {
        let today = date(2026, 8, 7);
        let mut born = date(1990, 1, 1);
        let mut was_adult = is_adult(born, today);
        while born < date(2012, 1, 1) {
            let adult = is_adult(born, today);
            // adulthood can only switch off as birth dates get later
            assert!(was_adult || !adult);
            was_adult = adult;
            born = born.succ_opt().expect("valid successor date");
        }
    }

    #[test]
    fn leap_day_anchor_rolls_to_march_first() {
        // 2024-02-29 minus 18 years lands on the nonexistent 2006-02-29
        let today = date(2024, 2, 29);
        assert_eq!(adult_cutoff(today), date(2006, 3, 1));
        assert!(is_adult(date(2006, 3, 1), today));
        assert!(!is_adult(date(2006, 3, 2), today));
    }
}

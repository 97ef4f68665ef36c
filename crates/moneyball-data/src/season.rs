// Season bounds for the snapshots we can rank.

use chrono::{Datelike, Local, NaiveDate};

use crate::error::DataError;

/// First season with comparable team pages.
pub const MIN_SEASON: i32 = 2000;

/// Month the regular season opens; before it, the current year has no data.
const OPENING_MONTH: u32 = 4;

/// Latest season available on `today`: the current year once the regular
/// season is under way (April onward), otherwise the previous year.
pub fn max_season(today: NaiveDate) -> i32 {
    if today.month() >= OPENING_MONTH {
        today.year()
    } else {
        today.year() - 1
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Check `season` against `[MIN_SEASON, max_season(today)]`.
pub fn validate_season(season: i32, today: NaiveDate) -> Result<i32, DataError> {
    let max = max_season(today);
    if (MIN_SEASON..=max).contains(&season) {
        Ok(season)
    } else {
        Err(DataError::InvalidSeason {
            season,
            min: MIN_SEASON,
            max,
        })
    }
}

/// Selectable seasons, most recent first.
pub fn available_seasons(today: NaiveDate) -> Vec<i32> {
    (MIN_SEASON..=max_season(today)).rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn current_year_counts_from_april() {
        assert_eq!(max_season(date(2024, 4, 1)), 2024);
        assert_eq!(max_season(date(2024, 10, 30)), 2024);
    }

    #[test]
    fn before_april_the_previous_year_is_latest() {
        assert_eq!(max_season(date(2024, 3, 31)), 2023);
        assert_eq!(max_season(date(2024, 1, 1)), 2023);
    }

    #[test]
    fn validate_accepts_bounds() {
        let today = date(2019, 6, 1);
        assert_eq!(validate_season(2000, today).unwrap(), 2000);
        assert_eq!(validate_season(2019, today).unwrap(), 2019);
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let today = date(2019, 2, 1);
        assert!(matches!(
            validate_season(2019, today),
            Err(DataError::InvalidSeason {
                season: 2019,
                min: 2000,
                max: 2018
            })
        ));
        assert!(matches!(
            validate_season(1999, today),
            Err(DataError::InvalidSeason { .. })
        ));
    }

    #[test]
    fn available_seasons_are_most_recent_first() {
        let seasons = available_seasons(date(2003, 5, 1));
        assert_eq!(seasons, vec![2003, 2002, 2001, 2000]);
    }
}

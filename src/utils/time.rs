//! Date range helpers for monthly and half-monthly reporting

use chrono::{Datelike, NaiveDate};

use crate::{
    error::{AppError, AppResult},
    models::Period,
};

/// Last day of the given month
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|d| d.pred_opt())
}

/// Inclusive range covering a whole calendar month
pub fn month_range(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::BadRequest("Month must be between 1 and 12".to_string()))?;
    let end = last_day_of_month(year, month)
        .ok_or_else(|| AppError::BadRequest("Invalid year".to_string()))?;
    Ok((start, end))
}

/// Month range for the month that contains `date`
pub fn month_containing(date: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
    month_range(date.year(), date.month())
}

/// Inclusive range for one half of a month
pub fn period_range(period: Period, year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let (first, last) = month_range(year, month)?;
    let range = match period {
        Period::First => (first, first.with_day(15).unwrap_or(last)),
        Period::Second => (first.with_day(16).unwrap_or(last), last),
    };
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2024, 2), Some(d(2024, 2, 29)));
        assert_eq!(last_day_of_month(2023, 2), Some(d(2023, 2, 28)));
        assert_eq!(last_day_of_month(2024, 12), Some(d(2024, 12, 31)));
    }

    #[test]
    fn test_period_halves() {
        assert_eq!(
            period_range(Period::First, 2024, 4).unwrap(),
            (d(2024, 4, 1), d(2024, 4, 15))
        );
        assert_eq!(
            period_range(Period::Second, 2024, 4).unwrap(),
            (d(2024, 4, 16), d(2024, 4, 30))
        );
    }

    #[test]
    fn test_month_out_of_range_rejected() {
        assert!(month_range(2024, 0).is_err());
        assert!(month_range(2024, 13).is_err());
    }

    #[test]
    fn test_month_containing() {
        assert_eq!(
            month_containing(d(2024, 1, 20)).unwrap(),
            (d(2024, 1, 1), d(2024, 1, 31))
        );
    }
}

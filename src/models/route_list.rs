//! Daily stop/package totals per route name

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteList {
    pub id: i32,
    pub number_of_stops: i32,
    pub number_of_packages: i32,
    pub route: String,
    pub date: NaiveDate,
}

/// Half-month used by the listing filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Days 1 to 15
    First,
    /// Day 16 to the end of the month
    Second,
}

/// Requested movement of stops and packages off a source record
#[derive(Debug, Clone, Copy)]
pub struct TransferAmount {
    pub stops: i32,
    pub packages: i32,
}

impl RouteList {
    /// Check the source holds enough to give away
    pub fn ensure_can_give(&self, amount: TransferAmount) -> AppResult<()> {
        if amount.stops < 0 || amount.packages < 0 {
            return Err(AppError::BadRequest(
                "Transfer amounts must not be negative".to_string(),
            ));
        }
        if amount.stops == 0 && amount.packages == 0 {
            return Err(AppError::BadRequest(
                "Nothing to transfer".to_string(),
            ));
        }
        if self.number_of_stops < amount.stops {
            return Err(AppError::BadRequest(format!(
                "Not enough stops in source route. Available: {}",
                self.number_of_stops
            )));
        }
        if self.number_of_packages < amount.packages {
            return Err(AppError::BadRequest(format!(
                "Not enough packages in source route. Available: {}",
                self.number_of_packages
            )));
        }
        Ok(())
    }

    /// Check `self` may take `amount` from `source`
    pub fn ensure_can_receive_from(
        &self,
        source: &RouteList,
        amount: TransferAmount,
    ) -> AppResult<()> {
        if self.id == source.id {
            return Err(AppError::BadRequest(
                "Cannot transfer a route to itself".to_string(),
            ));
        }
        if self.date != source.date {
            return Err(AppError::BadRequest(
                "Cannot transfer between routes with different dates".to_string(),
            ));
        }
        let fits = self.number_of_stops.checked_add(amount.stops).is_some()
            && self.number_of_packages.checked_add(amount.packages).is_some();
        if !fits {
            return Err(AppError::BadRequest(
                "Target route cannot hold that many stops or packages".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: TransferAmount = TransferAmount { stops: 1, packages: 1 };

    fn source() -> RouteList {
        RouteList {
            id: 1,
            number_of_stops: 40,
            number_of_packages: 55,
            route: "R-12".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        }
    }

    #[test]
    fn test_transfer_within_bounds() {
        assert!(source()
            .ensure_can_give(TransferAmount { stops: 40, packages: 10 })
            .is_ok());
    }

    #[test]
    fn test_too_many_stops_reports_available() {
        let err = source()
            .ensure_can_give(TransferAmount { stops: 41, packages: 0 })
            .unwrap_err();
        assert!(err.to_string().contains("Available: 40"));
    }

    #[test]
    fn test_too_many_packages() {
        assert!(source()
            .ensure_can_give(TransferAmount { stops: 1, packages: 56 })
            .is_err());
    }

    #[test]
    fn test_target_must_share_date_and_differ() {
        let src = source();
        let mut target = RouteList {
            id: 2,
            route: "R-13".to_string(),
            ..src.clone()
        };
        assert!(target.ensure_can_receive_from(&src, ONE).is_ok());
        assert!(src.ensure_can_receive_from(&src, ONE).is_err());

        target.date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let err = target.ensure_can_receive_from(&src, ONE).unwrap_err();
        assert!(err.to_string().contains("different dates"));
    }

    #[test]
    fn test_target_totals_must_not_overflow() {
        let src = source();
        let target = RouteList {
            id: 2,
            number_of_stops: i32::MAX - 5,
            ..src.clone()
        };
        let err = target
            .ensure_can_receive_from(&src, TransferAmount { stops: 6, packages: 0 })
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(target
            .ensure_can_receive_from(&src, TransferAmount { stops: 5, packages: 0 })
            .is_ok());
    }

    #[test]
    fn test_negative_and_empty_rejected() {
        assert!(source()
            .ensure_can_give(TransferAmount { stops: -1, packages: 0 })
            .is_err());
        assert!(source()
            .ensure_can_give(TransferAmount { stops: 0, packages: 0 })
            .is_err());
    }
}

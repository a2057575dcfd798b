//! Work entry model and the pay/revenue calculation

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::car_owner;

/// Work entry database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct WorkEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub route_id: Option<Uuid>,
    pub car_id: Option<Uuid>,
    pub stops_completed: i32,
    pub work_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Work entry joined with everything the financial calculation needs
#[derive(Debug, Clone, FromRow)]
pub struct WorkEntryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub route_id: Option<Uuid>,
    pub car_id: Option<Uuid>,
    pub stops_completed: i32,
    pub work_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_email: String,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_paid_per_stop: Decimal,
    pub route_name: Option<String>,
    pub region_id: Option<Uuid>,
    pub car_name: Option<String>,
    pub car_license_plate: Option<String>,
    pub car_owner: Option<String>,
}

/// Rates read from settings, loaded once per request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rates {
    pub company_rate_per_stop: Decimal,
    pub company_car_rate: Decimal,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            company_rate_per_stop: Decimal::new(35, 1),
            company_car_rate: Decimal::new(60, 1),
        }
    }
}

/// Derived money figures for one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Financials {
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub driver_pay: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub company_profit: Decimal,
}

impl Financials {
    /// Own-company cars earn the company car rate, anything else (parent
    /// company car or no car) earns the standard per-stop rate.
    pub fn compute(
        stops: i32,
        car_owner_kind: Option<&str>,
        paid_per_stop: Decimal,
        rates: &Rates,
    ) -> Self {
        let stops = Decimal::from(stops);
        let rate = match car_owner_kind {
            Some(car_owner::OWN_COMPANY) => rates.company_car_rate,
            _ => rates.company_rate_per_stop,
        };
        let revenue = (stops * rate).round_dp(2);
        let driver_pay = (stops * paid_per_stop).round_dp(2);

        Self {
            revenue,
            driver_pay,
            company_profit: revenue - driver_pay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_own_company_car_uses_car_rate() {
        let f = Financials::compute(100, Some("own_company"), dec("2.50"), &Rates::default());
        assert_eq!(f.revenue, dec("600.00"));
        assert_eq!(f.driver_pay, dec("250.00"));
        assert_eq!(f.company_profit, dec("350.00"));
    }

    #[test]
    fn test_parent_company_car_uses_stop_rate() {
        let f = Financials::compute(100, Some("parent_company"), dec("2.50"), &Rates::default());
        assert_eq!(f.revenue, dec("350.00"));
        assert_eq!(f.company_profit, dec("100.00"));
    }

    #[test]
    fn test_entry_without_car_uses_stop_rate() {
        let rates = Rates {
            company_rate_per_stop: dec("4"),
            company_car_rate: dec("7"),
        };
        let f = Financials::compute(10, None, Decimal::ZERO, &rates);
        assert_eq!(f.revenue, dec("40"));
        assert_eq!(f.driver_pay, Decimal::ZERO);
    }

    #[test]
    fn test_profit_can_be_negative() {
        let f = Financials::compute(10, Some("parent_company"), dec("5"), &Rates::default());
        assert_eq!(f.company_profit, dec("-15.0"));
    }

    #[test]
    fn test_zero_stops() {
        let f = Financials::compute(0, Some("own_company"), dec("3"), &Rates::default());
        assert_eq!(f.revenue, Decimal::ZERO);
        assert_eq!(f.company_profit, Decimal::ZERO);
    }
}

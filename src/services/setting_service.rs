//! Settings service

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::{
    constants::settings,
    db::repositories::SettingRepository,
    error::{AppError, AppResult},
    models::{Rates, Setting, SettingValue},
    utils::fits_money_column,
};

pub struct SettingService;

impl SettingService {
    /// Seed every known key that is missing. Existing values are kept.
    pub async fn ensure_defaults(pool: &PgPool) -> AppResult<()> {
        for (key, value, description) in settings::DEFAULTS {
            if SettingRepository::insert_if_missing(pool, key, &SettingValue::parse(value), description)
                .await?
            {
                info!(key = %key, value = %value, "Default setting created");
            }
        }
        Ok(())
    }

    pub async fn list(pool: &PgPool) -> AppResult<Vec<Setting>> {
        SettingRepository::list(pool).await
    }

    pub async fn update(pool: &PgPool, key: &str, raw: &str) -> AppResult<Setting> {
        if SettingRepository::find_by_key(pool, key).await?.is_none() {
            return Err(AppError::NotFound(format!("Setting {} not found", key)));
        }

        let value = Self::parse_for_key(key, raw)?;
        let setting = SettingRepository::set_value(pool, key, &value).await?;
        info!(key = %key, value = %raw, "Setting updated");
        Ok(setting)
    }

    /// Current pay rates, falling back to the defaults for missing values
    pub async fn rates(pool: &PgPool) -> AppResult<Rates> {
        let mut rates = Rates::default();
        let values = SettingRepository::numeric_values(
            pool,
            &[settings::COMPANY_RATE_PER_STOP, settings::COMPANY_CAR_RATE],
        )
        .await?;

        for (key, value) in values {
            let Some(value) = value else {
                warn!(key = %key, "Rate setting has no numeric value, using default");
                continue;
            };
            match key.as_str() {
                settings::COMPANY_RATE_PER_STOP => rates.company_rate_per_stop = value,
                settings::COMPANY_CAR_RATE => rates.company_car_rate = value,
                _ => {}
            }
        }

        Ok(rates)
    }

    /// Rate keys only accept non-negative numbers
    fn parse_for_key(key: &str, raw: &str) -> AppResult<SettingValue> {
        let value = SettingValue::parse(raw);
        if !settings::NUMERIC.contains(&key) {
            return Ok(value);
        }

        match value.numeric() {
            Some(n) if n >= Decimal::ZERO && fits_money_column(&n) => {
                Ok(SettingValue::Numeric(n.round_dp(2)))
            }
            _ => Err(AppError::BadRequest(format!(
                "Setting {} requires a number between 0 and 99999999.99",
                key
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_keys_need_numbers() {
        assert!(SettingService::parse_for_key(settings::COMPANY_CAR_RATE, "abc").is_err());
        assert!(SettingService::parse_for_key(settings::COMPANY_CAR_RATE, "-1").is_err());
        assert_eq!(
            SettingService::parse_for_key(settings::COMPANY_CAR_RATE, "7.257").unwrap(),
            SettingValue::Numeric(Decimal::new(726, 2))
        );
    }

    #[test]
    fn test_display_names_accept_text() {
        let value =
            SettingService::parse_for_key(settings::OWN_COMPANY_DISPLAY_NAME, "Acme Fleet").unwrap();
        assert_eq!(value.text(), Some("Acme Fleet"));
    }

    #[test]
    fn test_rate_must_fit_money_column() {
        let err = SettingService::parse_for_key(settings::COMPANY_CAR_RATE, "100000000000").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(SettingService::parse_for_key(settings::COMPANY_CAR_RATE, "99999999.99").is_ok());
    }

    #[test]
    fn test_zero_rate_allowed() {
        assert!(SettingService::parse_for_key(settings::COMPANY_RATE_PER_STOP, "0").is_ok());
    }
}

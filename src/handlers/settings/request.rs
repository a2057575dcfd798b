//! Settings request DTOs

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// `{ "value": "text" }` or `{ "value": 4.25 }`
#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    pub value: Value,
}

impl UpdateSettingRequest {
    /// The raw value as the settings service expects it
    pub fn raw_value(&self) -> AppResult<String> {
        match &self.value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(AppError::BadRequest(
                "Setting value must be a string or a number".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> UpdateSettingRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_strings_and_numbers_accepted() {
        assert_eq!(parse(r#"{"value": "Acme"}"#).raw_value().unwrap(), "Acme");
        assert_eq!(parse(r#"{"value": 4.25}"#).raw_value().unwrap(), "4.25");
        assert_eq!(parse(r#"{"value": 6}"#).raw_value().unwrap(), "6");
    }

    #[test]
    fn test_other_values_rejected() {
        assert!(parse(r#"{"value": null}"#).raw_value().is_err());
        assert!(parse(r#"{"value": [1]}"#).raw_value().is_err());
        assert!(parse(r#"{"value": true}"#).raw_value().is_err());
    }
}

//! Admin-editable settings

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Setting {
    pub id: Uuid,
    pub key: String,
    pub numeric_value: Option<Decimal>,
    pub text_value: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Setting {
    /// Text value when present, otherwise the number rendered
    pub fn value(&self) -> Option<String> {
        self.text_value
            .clone()
            .or_else(|| self.numeric_value.map(|n| n.normalize().to_string()))
    }
}

/// A value to store: numbers go to `numeric_value`, everything else to `text_value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Numeric(Decimal),
    Text(String),
}

impl SettingValue {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<Decimal>() {
            Ok(n) => SettingValue::Numeric(n),
            Err(_) => SettingValue::Text(raw.to_string()),
        }
    }

    pub fn numeric(&self) -> Option<Decimal> {
        match self {
            SettingValue::Numeric(n) => Some(*n),
            SettingValue::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            SettingValue::Numeric(_) => None,
            SettingValue::Text(t) => Some(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_are_numeric() {
        assert_eq!(
            SettingValue::parse("3.5"),
            SettingValue::Numeric(Decimal::new(35, 1))
        );
        assert_eq!(SettingValue::parse(" 6 ").numeric(), Some(Decimal::from(6)));
    }

    #[test]
    fn test_words_are_text() {
        let v = SettingValue::parse("Parent Company");
        assert_eq!(v.text(), Some("Parent Company"));
        assert_eq!(v.numeric(), None);
    }

    #[test]
    fn test_value_prefers_text() {
        let setting = Setting {
            id: Uuid::new_v4(),
            key: "k".into(),
            numeric_value: Some(Decimal::new(600, 2)),
            text_value: None,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(setting.value().as_deref(), Some("6"));
    }
}

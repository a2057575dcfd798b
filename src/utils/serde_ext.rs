//! Deserialization helpers for partial updates
//!
//! PATCH bodies need to tell "field absent" from "field set to null". Fields
//! using [`double_option`] deserialize to `None` when absent,
//! `Some(None)` for `null` and `Some(Some(v))` otherwise. They must also be
//! marked `#[serde(default)]`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, de::Error};

pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

fn parse_date<E: Error>(raw: &str) -> Result<Option<NaiveDate>, E> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    // Accept full timestamps by keeping the date part
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| E::custom(format!("invalid date: {}", raw)))
}

/// Optional date where an empty string means "no date"
pub fn blank_date<'de, D>(de: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(de)? {
        Some(raw) => parse_date(&raw),
        None => Ok(None),
    }
}

/// Tri-state date: absent, cleared (`null` or `""`), or set
pub fn patch_date<'de, D>(de: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(de)? {
        Some(raw) => parse_date(&raw).map(Some),
        None => Ok(Some(None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use uuid::Uuid;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        assigned_user_id: Option<Option<Uuid>>,
        #[serde(default, deserialize_with = "patch_date")]
        checkup_date: Option<Option<NaiveDate>>,
        #[serde(default, deserialize_with = "blank_date")]
        oil_change_date: Option<NaiveDate>,
    }

    #[test]
    fn test_absent_fields_are_untouched() {
        let p: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(p.assigned_user_id, None);
        assert_eq!(p.checkup_date, None);
        assert_eq!(p.oil_change_date, None);
    }

    #[test]
    fn test_null_clears() {
        let p: Patch =
            serde_json::from_str(r#"{"assigned_user_id": null, "checkup_date": null}"#).unwrap();
        assert_eq!(p.assigned_user_id, Some(None));
        assert_eq!(p.checkup_date, Some(None));
    }

    #[test]
    fn test_empty_string_date_clears() {
        let p: Patch =
            serde_json::from_str(r#"{"checkup_date": "", "oil_change_date": ""}"#).unwrap();
        assert_eq!(p.checkup_date, Some(None));
        assert_eq!(p.oil_change_date, None);
    }

    #[test]
    fn test_values_are_set() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{"assigned_user_id": "{}", "checkup_date": "2024-05-01T00:00:00.000Z"}}"#,
            id
        );
        let p: Patch = serde_json::from_str(&json).unwrap();
        assert_eq!(p.assigned_user_id, Some(Some(id)));
        assert_eq!(p.checkup_date, Some(NaiveDate::from_ymd_opt(2024, 5, 1)));
    }

    #[test]
    fn test_garbage_date_rejected() {
        assert!(serde_json::from_str::<Patch>(r#"{"checkup_date": "soon"}"#).is_err());
    }
}

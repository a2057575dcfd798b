//! User model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::roles;

/// User database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub post_code: Option<String>,
    pub street: String,
    pub house_number: String,
    pub phone_number: String,
    pub car_id: Option<Uuid>,
    pub route_id: Option<Uuid>,
    pub role: String,
    pub active: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_per_stop: Decimal,
    #[serde(skip_serializing)]
    pub invitation_token_hash: Option<String>,
    #[serde(skip_serializing)]
    pub invitation_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub password_reset_token_hash: Option<String>,
    #[serde(skip_serializing)]
    pub password_reset_expires_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::User)
    }

    /// An invited user who has not completed registration yet
    pub fn has_pending_invitation(&self) -> bool {
        self.invitation_token_hash.is_some()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Compact user view embedded in other resources
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

/// Role hierarchy. Owners carry admin privileges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Leader,
    Admin,
    Owner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => roles::USER,
            Role::Leader => roles::LEADER,
            Role::Admin => roles::ADMIN,
            Role::Owner => roles::OWNER,
        }
    }

    /// Admin or owner
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::Owner)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            roles::USER => Ok(Role::User),
            roles::LEADER => Ok(Role::Leader),
            roles::ADMIN => Ok(Role::Admin),
            roles::OWNER => Ok(Role::Owner),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_str() {
        for role in roles::ALL {
            let parsed: Role = role.parse().unwrap();
            assert_eq!(parsed.as_str(), *role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_owner_counts_as_admin() {
        assert!(Role::Owner.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Leader.is_admin());
    }
}

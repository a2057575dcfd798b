//! Car response DTOs

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Car, UserSummary};

/// A car with the people it references
#[derive(Debug, Serialize)]
pub struct CarResponse {
    #[serde(flatten)]
    pub car: Car,
    pub assigned_user: Option<UserSummary>,
    pub updated_by_user: Option<UserSummary>,
}

impl CarResponse {
    pub fn new(car: Car, people: &HashMap<Uuid, UserSummary>) -> Self {
        let lookup = |id: Option<Uuid>| id.and_then(|id| people.get(&id).cloned());
        Self {
            assigned_user: lookup(car.assigned_user_id),
            updated_by_user: lookup(car.updated_by),
            car,
        }
    }
}

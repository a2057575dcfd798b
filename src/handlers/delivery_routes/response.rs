//! Route response DTOs

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Route, UserSummary};

/// A route with the people it references
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    #[serde(flatten)]
    pub route: Route,
    pub assigned_user: Option<UserSummary>,
    pub updated_by_user: Option<UserSummary>,
}

impl RouteResponse {
    pub fn new(route: Route, people: &HashMap<Uuid, UserSummary>) -> Self {
        let lookup = |id: Option<Uuid>| id.and_then(|id| people.get(&id).cloned());
        Self {
            assigned_user: lookup(route.assigned_user_id),
            updated_by_user: lookup(route.updated_by),
            route,
        }
    }
}

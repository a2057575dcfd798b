//! Route request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    services::route_service::RouteChanges,
    utils::{sanitize_string, serde_ext::double_option},
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRouteRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub region_id: Option<Uuid>,
}

/// Partial route update. `region_id: null` detaches the route from its region.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRouteRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub region_id: Option<Option<Uuid>>,

    pub active: Option<bool>,
}

impl From<UpdateRouteRequest> for RouteChanges {
    fn from(req: UpdateRouteRequest) -> Self {
        RouteChanges {
            name: req.name.map(|n| sanitize_string(&n)),
            description: req.description,
            region_id: req.region_id,
            active: req.active,
        }
    }
}

/// `null` or a missing id takes the route back
#[derive(Debug, Deserialize)]
pub struct AssignRouteRequest {
    pub assigned_user_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_can_be_detached() {
        let req: UpdateRouteRequest = serde_json::from_str(r#"{"region_id": null}"#).unwrap();
        assert_eq!(RouteChanges::from(req).region_id, Some(None));

        let req: UpdateRouteRequest = serde_json::from_str(r#"{"name": "North 4"}"#).unwrap();
        let changes = RouteChanges::from(req);
        assert_eq!(changes.region_id, None);
        assert_eq!(changes.name.as_deref(), Some("North 4"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let req: CreateRouteRequest = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert!(req.validate().is_err());
    }
}

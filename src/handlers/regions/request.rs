//! Region request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRegionRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub leader_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRegionRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddRoutesRequest {
    #[validate(length(min = 1, message = "At least one route is required"))]
    pub route_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SetLeaderRequest {
    pub leader_id: Uuid,
}

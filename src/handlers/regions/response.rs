//! Region response DTOs

use serde::Serialize;

use crate::{
    models::{Region, Route, UserSummary},
    services::region_service::RegionDetails,
};

#[derive(Debug, Serialize)]
pub struct RegionResponse {
    #[serde(flatten)]
    pub region: Region,
    pub leader: Option<UserSummary>,
    pub routes: Vec<Route>,
}

impl From<RegionDetails> for RegionResponse {
    fn from(details: RegionDetails) -> Self {
        Self {
            region: details.region,
            leader: details.leader,
            routes: details.routes,
        }
    }
}

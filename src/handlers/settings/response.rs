//! Settings response DTOs

use serde::Serialize;

use crate::models::Setting;

#[derive(Debug, Serialize)]
pub struct SettingResponse {
    #[serde(flatten)]
    pub setting: Setting,
    pub value: Option<String>,
}

impl From<Setting> for SettingResponse {
    fn from(setting: Setting) -> Self {
        Self {
            value: setting.value(),
            setting,
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::{ConfigDocument, SystemName, Version};

/// Body of `GET /api/configs/{systemName}?version={version}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    #[serde(default)]
    pub system_name: Option<SystemName>,
    #[serde(default)]
    pub version: Option<Version>,
    #[serde(default)]
    pub config: Option<ConfigDocument>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

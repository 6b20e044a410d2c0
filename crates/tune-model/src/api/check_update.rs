use serde::{Deserialize, Serialize};

use crate::{ConfigDocument, SystemName, Version};

/// Body of `POST /api/configs/checkUpdate`.
///
/// The system identifier is capitalized on the wire (`SystemName`) while the
/// other fields are camelCase; the controller expects exactly this shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckUpdateRequest {
    #[serde(rename = "SystemName")]
    pub system_name: SystemName,
    pub version: Version,
    pub config: ConfigDocument,
}

/// Controller answer to a negotiation request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckUpdateResponse {
    #[serde(default)]
    pub need_update: bool,
    #[serde(default)]
    pub current_version: Option<Version>,
}

impl CheckUpdateResponse {
    /// Version to fetch, if the controller asks for an update and names a target.
    pub fn target_version(&self) -> Option<&str> {
        if self.need_update {
            self.current_version.as_deref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_capitalized_system_name() {
        let req = CheckUpdateRequest {
            system_name: "test-mock".into(),
            version: "v1".into(),
            config: ConfigDocument::default(),
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["SystemName"], "test-mock");
        assert_eq!(json["version"], "v1");
        assert!(json["config"].is_object());
        assert!(json.get("systemName").is_none());
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let resp: CheckUpdateResponse = serde_json::from_str("{}").unwrap();
        assert!(!resp.need_update);
        assert_eq!(resp.current_version, None);
        assert_eq!(resp.target_version(), None);
    }

    #[test]
    fn target_version_requires_need_update() {
        let resp: CheckUpdateResponse =
            serde_json::from_str(r#"{"needUpdate":false,"currentVersion":"v3"}"#).unwrap();
        assert_eq!(resp.target_version(), None);

        let resp: CheckUpdateResponse =
            serde_json::from_str(r#"{"needUpdate":true,"currentVersion":"v3"}"#).unwrap();
        assert_eq!(resp.target_version(), Some("v3"));

        let resp: CheckUpdateResponse = serde_json::from_str(r#"{"needUpdate":true}"#).unwrap();
        assert_eq!(resp.target_version(), None);
    }
}

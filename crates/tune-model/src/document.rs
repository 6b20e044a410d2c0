use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::Category;

/// Fleet-wide configuration snapshot exchanged with the controller.
///
/// Four category mappings (attribute name → wire string) plus the logging level.
/// A missing mapping deserializes as empty, which distributes as "no change".
///
/// Wire shape:
/// ```json
/// {
///   "delays": {"delayHelloWorld": "1000"},
///   "intParams": {"intHelloStatusCode": "200"},
///   "stringParams": {"stringHelloWorldRs": "Hello World!"},
///   "booleanVariables": {"isHealthTrue": "true"},
///   "loggingLv": "INFO"
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    #[serde(default, deserialize_with = "wire_map")]
    pub delays: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "wire_map")]
    pub int_params: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "wire_map")]
    pub string_params: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "wire_map")]
    pub boolean_variables: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging_lv: Option<String>,
}

impl ConfigDocument {
    /// Mapping for the given category.
    pub fn category(&self, category: Category) -> &BTreeMap<String, String> {
        match category {
            Category::Delay => &self.delays,
            Category::Int => &self.int_params,
            Category::String => &self.string_params,
            Category::Is => &self.boolean_variables,
        }
    }

    /// Mutable mapping for the given category.
    pub fn category_mut(&mut self, category: Category) -> &mut BTreeMap<String, String> {
        match category {
            Category::Delay => &mut self.delays,
            Category::Int => &mut self.int_params,
            Category::String => &mut self.string_params,
            Category::Is => &mut self.boolean_variables,
        }
    }

    /// Total number of attribute entries across all categories.
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.category(*c).len()).sum()
    }

    /// Returns `true` if no category carries any entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Accepts JSON scalars of any type as map values.
///
/// Controllers are not consistent about quoting numbers, so `{"delayX": 2000}`
/// and `{"delayX": "2000"}` are treated the same; `null` reads as `"null"`.
fn wire_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| {
            let s = match v {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (k, s)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_field_names() {
        let mut doc = ConfigDocument::default();
        doc.delays.insert("delayHelloWorld".into(), "1000".into());
        doc.boolean_variables.insert("isHealthTrue".into(), "true".into());
        doc.logging_lv = Some("INFO".into());

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["delays"]["delayHelloWorld"], "1000");
        assert_eq!(json["booleanVariables"]["isHealthTrue"], "true");
        assert_eq!(json["intParams"], serde_json::json!({}));
        assert_eq!(json["stringParams"], serde_json::json!({}));
        assert_eq!(json["loggingLv"], "INFO");
    }

    #[test]
    fn missing_categories_deserialize_as_empty() {
        let doc: ConfigDocument =
            serde_json::from_str(r#"{"delays":{"delayHelloWorld":"2000"}}"#).unwrap();

        assert_eq!(doc.delays.get("delayHelloWorld").map(String::as_str), Some("2000"));
        assert!(doc.int_params.is_empty());
        assert!(doc.string_params.is_empty());
        assert!(doc.boolean_variables.is_empty());
        assert_eq!(doc.logging_lv, None);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn non_string_scalars_are_stringified() {
        let doc: ConfigDocument = serde_json::from_str(
            r#"{"delays":{"delayA":2000},"booleanVariables":{"isB":true},"stringParams":{"stringC":null},"intParams":null}"#,
        )
        .unwrap();

        assert_eq!(doc.delays["delayA"], "2000");
        assert_eq!(doc.boolean_variables["isB"], "true");
        assert_eq!(doc.string_params["stringC"], "null");
        assert!(doc.int_params.is_empty());
    }

    #[test]
    fn category_accessors_follow_wire_keys() {
        let mut doc = ConfigDocument::default();
        for c in Category::ALL {
            doc.category_mut(c).insert(format!("{}X", c.prefix()), "1".into());
        }

        let json = serde_json::to_value(&doc).unwrap();
        for c in Category::ALL {
            assert_eq!(json[c.wire_key()][format!("{}X", c.prefix())], "1");
        }
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn empty_document_has_no_logging_field() {
        let json = serde_json::to_string(&ConfigDocument::default()).unwrap();
        assert!(!json.contains("loggingLv"));
        assert!(ConfigDocument::default().is_empty());
    }
}

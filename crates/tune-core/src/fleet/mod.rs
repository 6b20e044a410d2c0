//! Aggregation layer: merges every registered attribute table into one
//! configuration document and fans received documents back out.
use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info, warn};
use tune_model::{Category, ConfigDocument};

use crate::{
    attribute::{ApplyReport, AttributeFailure, AttributeTable},
    level::LevelSink,
};

/// Outcome of one [`Fleet::distribute`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributeReport {
    /// Attribute writes that succeeded, summed over instances.
    pub applied: usize,
    /// Per-attribute failures, in application order.
    pub failed: Vec<AttributeFailure>,
    /// Keys that no registered instance knows, sorted.
    pub unknown: Vec<String>,
    /// Level in effect after the distribution, if the document carried one.
    pub level: Option<String>,
}

/// Immutable set of registered service instances, in enumeration order.
#[derive(Debug, Clone, Default)]
pub struct Fleet {
    tables: Vec<AttributeTable>,
}

impl Fleet {
    pub fn builder() -> FleetBuilder {
        FleetBuilder::default()
    }

    /// Number of registered instances.
    #[inline]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn tables(&self) -> &[AttributeTable] {
        &self.tables
    }

    /// Snapshot every instance into one document.
    ///
    /// Instances are merged in registration order; a name exposed by more than one
    /// instance takes the value of the last one.
    pub fn build_document(&self, logging_level: Option<String>) -> ConfigDocument {
        let mut doc = ConfigDocument::default();
        for table in &self.tables {
            for category in Category::ALL {
                doc.category_mut(category).extend(table.extract(category));
            }
        }
        doc.logging_lv = logging_level;
        doc
    }

    /// Apply `doc` to every instance, then update the process logging level once.
    ///
    /// Failed and unknown entries are logged and reported; they never stop the rest of
    /// the document from being applied.
    pub fn distribute(&self, doc: &ConfigDocument, levels: &dyn LevelSink) -> DistributeReport {
        let mut merged = ApplyReport::default();
        for table in &self.tables {
            for category in Category::ALL {
                let entries = doc.category(category);
                if entries.is_empty() {
                    continue;
                }
                merged.merge(table.apply(category, entries));
            }
        }

        let unknown: BTreeSet<String> = Category::ALL
            .iter()
            .flat_map(|c| doc.category(*c).keys())
            .filter(|name| !self.tables.iter().any(|t| t.contains(name)))
            .cloned()
            .collect();
        for name in &unknown {
            warn!(attribute = %name, "configuration key matches no registered attribute, ignoring it");
        }

        let level = doc.logging_lv.as_deref().and_then(|lv| {
            match levels.apply(lv) {
                Ok(()) => {
                    let current = levels.current();
                    info!(requested = %lv, level = %current, "logging level updated");
                    Some(current)
                }
                Err(e) => {
                    warn!(requested = %lv, error = %e, "failed to update logging level");
                    None
                }
            }
        });

        debug!(
            applied = merged.applied,
            failed = merged.failed.len(),
            unknown = unknown.len(),
            "configuration distributed"
        );

        DistributeReport {
            applied: merged.applied,
            failed: merged.failed,
            unknown: unknown.into_iter().collect(),
            level,
        }
    }
}

/// Collects attribute tables before the fleet is frozen.
#[derive(Debug, Default)]
pub struct FleetBuilder {
    tables: Vec<AttributeTable>,
}

impl FleetBuilder {
    /// Register one service instance. Enumeration order is registration order.
    pub fn register(mut self, table: AttributeTable) -> Self {
        self.tables.push(table);
        self
    }

    /// Freeze the fleet.
    ///
    /// Names shared by several instances are logged: the merged document keeps the
    /// value of the instance registered last.
    pub fn build(self) -> Fleet {
        let mut owners: HashMap<&str, &str> = HashMap::new();
        for table in &self.tables {
            for attr in table.iter() {
                if let Some(previous) = owners.insert(attr.name(), table.owner()) {
                    warn!(
                        attribute = %attr.name(),
                        first = %previous,
                        second = %table.owner(),
                        "attribute name registered by several instances, last registered wins in merged document"
                    );
                }
            }
        }
        info!(instances = self.tables.len(), "fleet registered");
        Fleet {
            tables: self.tables,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{
        attribute::{ApplyError, Tunable},
        error::LevelError,
        level::StaticLevel,
    };

    struct RejectingLevel;

    impl LevelSink for RejectingLevel {
        fn current(&self) -> String {
            "INFO".into()
        }

        fn apply(&self, level: &str) -> Result<(), LevelError> {
            Err(LevelError::Reload(level.into()))
        }
    }

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    struct Mock {
        delay: Tunable<i64>,
        code: Tunable<i32>,
        message: Tunable<String>,
        healthy: Tunable<bool>,
    }

    impl Mock {
        fn new() -> Self {
            Self {
                delay: Tunable::new(1000),
                code: Tunable::new(200),
                message: Tunable::new("Hello World!".into()),
                healthy: Tunable::new(true),
            }
        }

        fn table(&self, owner: &str) -> AttributeTable {
            AttributeTable::builder(owner)
                .long("delayHelloWorld", &self.delay)
                .int("intHelloStatusCode", &self.code)
                .text("stringHelloWorldRs", &self.message)
                .bool("isHealthTrue", &self.healthy)
                .build()
                .unwrap()
        }
    }

    #[test]
    fn build_document_merges_all_instances() {
        let mock = Mock::new();
        let user_id = Tunable::new(12345_i32);
        let fleet = Fleet::builder()
            .register(mock.table("MockService"))
            .register(
                AttributeTable::builder("UserService")
                    .int("intUserId", &user_id)
                    .build()
                    .unwrap(),
            )
            .build();

        let doc = fleet.build_document(Some("INFO".into()));

        assert_eq!(doc.delays, map(&[("delayHelloWorld", "1000")]));
        assert_eq!(
            doc.int_params,
            map(&[("intHelloStatusCode", "200"), ("intUserId", "12345")])
        );
        assert_eq!(doc.string_params, map(&[("stringHelloWorldRs", "Hello World!")]));
        assert_eq!(doc.boolean_variables, map(&[("isHealthTrue", "true")]));
        assert_eq!(doc.logging_lv.as_deref(), Some("INFO"));
        assert_eq!(fleet.len(), 2);
    }

    #[test]
    fn collision_takes_last_registered_value() {
        let first = Tunable::new(1_i64);
        let second = Tunable::new(2_i64);
        let fleet = Fleet::builder()
            .register(AttributeTable::builder("A").long("delayShared", &first).build().unwrap())
            .register(AttributeTable::builder("B").long("delayShared", &second).build().unwrap())
            .build();

        let doc = fleet.build_document(None);
        assert_eq!(doc.delays["delayShared"], "2");
        assert_eq!(fleet.build_document(None), doc);
    }

    #[test]
    fn collision_distributes_to_every_owner() {
        let first = Tunable::new(1_i64);
        let second = Tunable::new(2_i64);
        let fleet = Fleet::builder()
            .register(AttributeTable::builder("A").long("delayShared", &first).build().unwrap())
            .register(AttributeTable::builder("B").long("delayShared", &second).build().unwrap())
            .build();

        let mut doc = ConfigDocument::default();
        doc.delays.insert("delayShared".into(), "7".into());
        let report = fleet.distribute(&doc, &StaticLevel::default());

        assert_eq!(report.applied, 2);
        assert_eq!((first.get(), second.get()), (7, 7));
    }

    #[test]
    fn redistributing_own_snapshot_is_idempotent() {
        let mock = Mock::new();
        let fleet = Fleet::builder().register(mock.table("MockService")).build();
        let levels = StaticLevel::default();

        let before = fleet.build_document(Some(levels.current()));
        let report = fleet.distribute(&before, &levels);
        let after = fleet.build_document(Some(levels.current()));

        assert_eq!(before, after);
        assert!(report.failed.is_empty());
        assert!(report.unknown.is_empty());
        assert_eq!(report.applied, 4);
    }

    #[test]
    fn unknown_field_does_not_block_other_keys() {
        let mock = Mock::new();
        let fleet = Fleet::builder().register(mock.table("MockService")).build();

        let doc: ConfigDocument = serde_json::from_str(
            r#"{
                "delays": {"delayHelloWorld": "2000", "unknownField": "1"},
                "stringParams": {"stringHelloWorldRs": "Bonjour"},
                "booleanVariables": {"isHealthTrue": "FALSE"}
            }"#,
        )
        .unwrap();
        let report = fleet.distribute(&doc, &StaticLevel::default());

        assert_eq!(report.unknown, vec!["unknownField".to_string()]);
        assert!(report.failed.is_empty());
        assert_eq!(mock.delay.get(), 2000);
        assert_eq!(mock.message.get(), "Bonjour");
        assert!(!mock.healthy.get());
        assert_eq!(mock.code.get(), 200);
    }

    #[test]
    fn unparseable_value_fails_only_its_attribute() {
        let mock = Mock::new();
        let fleet = Fleet::builder().register(mock.table("MockService")).build();

        let mut doc = ConfigDocument::default();
        doc.int_params.insert("intHelloStatusCode".into(), "5xx".into());
        doc.delays.insert("delayHelloWorld".into(), "50".into());
        let report = fleet.distribute(&doc, &StaticLevel::default());

        assert_eq!(report.applied, 1);
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(report.failed[0].error, ApplyError::Coercion(_)));
        assert_eq!(mock.code.get(), 200);
        assert_eq!(mock.delay.get(), 50);
    }

    #[test]
    fn logging_level_is_applied_and_persisted() {
        let mock = Mock::new();
        let fleet = Fleet::builder().register(mock.table("MockService")).build();
        let levels = StaticLevel::default();

        let doc = ConfigDocument {
            logging_lv: Some("DEBUG".into()),
            ..ConfigDocument::default()
        };
        let report = fleet.distribute(&doc, &levels);

        assert_eq!(report.level.as_deref(), Some("DEBUG"));
        assert_eq!(
            fleet.build_document(Some(levels.current())).logging_lv.as_deref(),
            Some("DEBUG")
        );
    }

    #[test]
    fn rejected_level_is_reported_as_unchanged() {
        let fleet = Fleet::builder().build();
        let doc = ConfigDocument {
            logging_lv: Some("LOUD".into()),
            ..ConfigDocument::default()
        };
        assert_eq!(fleet.distribute(&doc, &RejectingLevel).level, None);
    }

    #[test]
    fn document_without_level_leaves_sink_alone() {
        let fleet = Fleet::builder().build();
        let levels = StaticLevel::new("WARN");
        let report = fleet.distribute(&ConfigDocument::default(), &levels);

        assert_eq!(report, DistributeReport::default());
        assert_eq!(levels.current(), "WARN");
    }
}

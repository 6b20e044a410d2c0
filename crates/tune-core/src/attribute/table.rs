use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::Arc,
};

use tracing::{debug, trace, warn};
use tune_model::{AttrType, Category, coerce};

use super::{ApplyError, ApplyReport, AttributeAccess, AttributeFailure, Tunable};
use crate::error::RegistryError;

/// One registered attribute: name, category and accessor.
#[derive(Clone)]
pub struct Attribute {
    name: String,
    category: Category,
    access: Arc<dyn AttributeAccess>,
}

impl Attribute {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    #[inline]
    pub fn attr_type(&self) -> AttrType {
        self.access.attr_type()
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("type", &self.access.attr_type())
            .finish()
    }
}

/// Explicit attribute table of one service instance.
///
/// Built once at registration; categories and native types never change afterwards.
/// Enumeration order is registration order.
#[derive(Clone)]
pub struct AttributeTable {
    owner: String,
    attrs: Vec<Attribute>,
    index: HashMap<String, usize>,
}

impl AttributeTable {
    /// Start a table for the service named `owner` (used in logs only).
    pub fn builder(owner: impl Into<String>) -> AttributeTableBuilder {
        AttributeTableBuilder {
            owner: owner.into(),
            pending: Vec::new(),
        }
    }

    #[inline]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Returns `true` if an attribute with exactly this name is registered.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up an attribute by exact name.
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.index.get(name).map(|&i| &self.attrs[i])
    }

    /// Attributes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.iter()
    }

    /// Read every attribute of `category` into its wire form.
    ///
    /// An attribute that cannot be read is logged and left out; the rest is still returned.
    pub fn extract(&self, category: Category) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for attr in self.attrs.iter().filter(|a| a.category == category) {
            match attr.access.read() {
                Ok(value) => {
                    out.insert(attr.name.clone(), value.to_wire());
                }
                Err(e) => {
                    warn!(owner = %self.owner, attribute = %attr.name, error = %e, "failed to read attribute, omitting it");
                }
            }
        }
        out
    }

    /// Coerce and write every entry of `entries` whose key names an attribute of this table.
    ///
    /// Lookup is by exact name. Unknown keys are reported, not fatal.
    /// A failed entry is reported and the remaining entries are still applied.
    pub fn apply(&self, category: Category, entries: &BTreeMap<String, String>) -> ApplyReport {
        let mut report = ApplyReport::default();

        for (name, wire) in entries {
            let Some(attr) = self.get(name) else {
                trace!(owner = %self.owner, %category, attribute = %name, "attribute not present on instance");
                report.unknown.push(name.clone());
                continue;
            };

            let result = coerce(attr.attr_type(), wire)
                .map_err(ApplyError::from)
                .and_then(|v| attr.access.write(v).map_err(ApplyError::from));

            match result {
                Ok(()) => {
                    debug!(owner = %self.owner, attribute = %name, value = %wire, "attribute updated");
                    report.applied += 1;
                }
                Err(error) => {
                    warn!(owner = %self.owner, attribute = %name, value = %wire, %error, "failed to apply attribute, skipping it");
                    report.failed.push(AttributeFailure {
                        owner: self.owner.clone(),
                        name: name.clone(),
                        error,
                    });
                }
            }
        }
        report
    }
}

impl fmt::Debug for AttributeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeTable")
            .field("owner", &self.owner)
            .field("attrs", &self.attrs)
            .finish()
    }
}

/// Builder for [`AttributeTable`].
///
/// # Examples
/// ```
/// use tune_core::{AttributeTable, Tunable};
/// use tune_model::Category;
///
/// let delay = Tunable::new(1000_i64);
/// let message = Tunable::new(String::from("Hello World!"));
///
/// let table = AttributeTable::builder("MockService")
///     .long("delayHelloWorld", &delay)
///     .text("stringHelloWorldRs", &message)
///     .build()
///     .unwrap();
///
/// assert_eq!(table.extract(Category::Delay)["delayHelloWorld"], "1000");
/// ```
pub struct AttributeTableBuilder {
    owner: String,
    pending: Vec<(String, Arc<dyn AttributeAccess>)>,
}

impl AttributeTableBuilder {
    /// Register a 32-bit integer attribute.
    pub fn int(self, name: impl Into<String>, cell: &Tunable<i32>) -> Self {
        self.custom(name, Arc::new(cell.clone()))
    }

    /// Register a 64-bit integer attribute.
    pub fn long(self, name: impl Into<String>, cell: &Tunable<i64>) -> Self {
        self.custom(name, Arc::new(cell.clone()))
    }

    /// Register a boolean attribute.
    pub fn bool(self, name: impl Into<String>, cell: &Tunable<bool>) -> Self {
        self.custom(name, Arc::new(cell.clone()))
    }

    /// Register a text attribute.
    pub fn text(self, name: impl Into<String>, cell: &Tunable<String>) -> Self {
        self.custom(name, Arc::new(cell.clone()))
    }

    /// Register an attribute backed by any accessor.
    pub fn custom(mut self, name: impl Into<String>, access: Arc<dyn AttributeAccess>) -> Self {
        self.pending.push((name.into(), access));
        self
    }

    /// Validate and freeze the table.
    ///
    /// Fails if a name has no category prefix, if its native type does not fit the
    /// category, or if a name is registered twice.
    pub fn build(self) -> Result<AttributeTable, RegistryError> {
        let mut attrs = Vec::with_capacity(self.pending.len());
        let mut index = HashMap::with_capacity(self.pending.len());

        for (name, access) in self.pending {
            let Some(category) = Category::classify(&name) else {
                return Err(RegistryError::UnknownCategory {
                    owner: self.owner,
                    name,
                });
            };
            let ty = access.attr_type();
            if !ty.accepts(category) {
                return Err(RegistryError::TypeMismatch {
                    owner: self.owner,
                    name,
                    category,
                    ty,
                });
            }
            if index.contains_key(&name) {
                return Err(RegistryError::Duplicate {
                    owner: self.owner,
                    name,
                });
            }
            index.insert(name.clone(), attrs.len());
            attrs.push(Attribute {
                name,
                category,
                access,
            });
        }

        Ok(AttributeTable {
            owner: self.owner,
            attrs,
            index,
        })
    }
}

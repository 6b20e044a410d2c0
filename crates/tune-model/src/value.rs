use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Category, error::CoercionError};

/// Native scalar type of an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrType {
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// Boolean flag.
    Bool,
    /// UTF-8 text.
    Text,
}

impl AttrType {
    /// Returns `true` if an attribute of this type may live in `category`.
    ///
    /// Delays and integers are numeric, strings are text, `is*` attributes are booleans.
    pub const fn accepts(&self, category: Category) -> bool {
        matches!(
            (category, self),
            (Category::Delay, AttrType::Int | AttrType::Long)
                | (Category::Int, AttrType::Int | AttrType::Long)
                | (Category::String, AttrType::Text)
                | (Category::Is, AttrType::Bool)
        )
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttrType::Int => "int",
            AttrType::Long => "long",
            AttrType::Bool => "bool",
            AttrType::Text => "text",
        };
        f.write_str(s)
    }
}

/// Typed attribute value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrValue {
    Int(i32),
    Long(i64),
    Bool(bool),
    Text(String),
}

impl AttrValue {
    /// Native type of the value.
    #[inline]
    pub fn attr_type(&self) -> AttrType {
        match self {
            AttrValue::Int(_) => AttrType::Int,
            AttrValue::Long(_) => AttrType::Long,
            AttrValue::Bool(_) => AttrType::Bool,
            AttrValue::Text(_) => AttrType::Text,
        }
    }

    /// String form used in a [`crate::ConfigDocument`].
    #[inline]
    pub fn to_wire(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Int(v) => write!(f, "{v}"),
            AttrValue::Long(v) => write!(f, "{v}"),
            AttrValue::Bool(v) => write!(f, "{v}"),
            AttrValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Long(v)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

/// Convert a wire string into a value of `target` type.
///
/// - integers: base-10 with an optional leading sign; surrounding whitespace is an error;
/// - booleans: `true` in any letter case, everything else (garbage included) is `false`;
/// - text: passed through unchanged.
///
/// # Examples
/// ```
/// use tune_model::{AttrType, AttrValue, coerce};
///
/// assert_eq!(coerce(AttrType::Long, "2000").unwrap(), AttrValue::Long(2000));
/// assert_eq!(coerce(AttrType::Bool, "TRUE").unwrap(), AttrValue::Bool(true));
/// assert_eq!(coerce(AttrType::Bool, "yes").unwrap(), AttrValue::Bool(false));
/// assert!(coerce(AttrType::Int, "12ms").is_err());
/// ```
pub fn coerce(target: AttrType, wire: &str) -> Result<AttrValue, CoercionError> {
    let format_error = || CoercionError::Format {
        target,
        value: wire.to_string(),
    };
    match target {
        AttrType::Int => wire
            .parse::<i32>()
            .map(AttrValue::Int)
            .map_err(|_| format_error()),
        AttrType::Long => wire
            .parse::<i64>()
            .map(AttrValue::Long)
            .map_err(|_| format_error()),
        AttrType::Bool => Ok(AttrValue::Bool(wire.eq_ignore_ascii_case("true"))),
        AttrType::Text => Ok(AttrValue::Text(wire.to_string())),
    }
}

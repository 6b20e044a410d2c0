use thiserror::Error;

use crate::AttrType;

/// Failure to convert a wire string into an attribute's native type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("value {value:?} is not a valid {target} numeral")]
    Format { target: AttrType, value: String },
}

mod domain;
pub use domain::{Category, INITIAL_VERSION, SystemName, Version};

mod error;
pub use error::CoercionError;

mod value;
pub use value::{AttrType, AttrValue, coerce};

mod document;
pub use document::ConfigDocument;

mod api;
pub use api::{CheckUpdateRequest, CheckUpdateResponse, ConfigResponse};

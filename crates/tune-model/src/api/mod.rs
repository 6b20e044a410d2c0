mod check_update;
pub use check_update::{CheckUpdateRequest, CheckUpdateResponse};

mod config_response;
pub use config_response::ConfigResponse;

//! HTTP surface of the sync engine: operator status snapshot and Prometheus exposition.
mod adapter;
pub use adapter::EngineAdapter;

mod error;
pub use error::ApiError;

mod handler;
pub use handler::ApiHandler;

mod http;
pub use http::HttpApi;

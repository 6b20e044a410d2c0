//! Well-known values shared between the engine and the controller protocol.

/// Version reported before the controller has acknowledged anything.
pub const INITIAL_VERSION: &str = "v1";

mod category;
pub use category::Category;

mod constants;
pub use constants::INITIAL_VERSION;

/// Identifier of the service fleet towards the controller (`SystemName` on the wire).
pub type SystemName = String;

/// Opaque configuration version issued by the controller.
pub type Version = String;

//! Attribute registry: explicit per-service tables of runtime-tunable values.
//!
//! A service keeps [`Tunable`] cells for its request path and registers clones of the
//! same cells in an [`AttributeTable`]. The table classifies each attribute by name
//! prefix and moves values between native and wire form.
mod report;
pub use report::{ApplyError, ApplyReport, AttributeFailure};

mod table;
pub use table::{Attribute, AttributeTable, AttributeTableBuilder};

mod tunable;
pub use tunable::{AccessError, AttributeAccess, Tunable};

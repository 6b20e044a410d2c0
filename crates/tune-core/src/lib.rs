pub mod attribute;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod fleet;
pub mod level;
pub mod metrics;
pub mod supervisor;
pub mod tasks;

pub use attribute::{
    AccessError, ApplyError, ApplyReport, Attribute, AttributeAccess, AttributeFailure,
    AttributeTable, AttributeTableBuilder, Tunable,
};
pub use client::{ControllerClient, HttpControllerClient};
pub use config::{ProbeMethod, SyncConfig};
pub use engine::{CheckOutcome, HealthState, ProbeOutcome, SyncEngine, SyncStatus};
pub use error::{CoreError, LevelError, RegistryError, SyncError};
pub use fleet::{DistributeReport, Fleet, FleetBuilder};
pub use level::{LevelSink, StaticLevel};
pub use metrics::{MetricsHandle, NoOpMetrics, SyncMetrics, SyncStage, noop_metrics};
pub use supervisor::SyncSupervisor;

pub mod prelude {
    pub use crate::attribute::{AttributeTable, Tunable};
    pub use crate::engine::SyncEngine;
    pub use crate::error::CoreError;
    pub use crate::fleet::Fleet;
    pub use crate::supervisor::SyncSupervisor;
}

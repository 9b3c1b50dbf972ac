// Domain models: instance snapshots, views over instances, summaries

mod instance;
mod snapshot;
mod summary;

pub use instance::{Application, ApplicationView, Instance, InstanceHandle, InstanceState};
pub use snapshot::{
    ACTIVE_SESSION_COUNT_KEY, AVERAGE_IDLE_TIME_KEY, AVERAGE_TRANSACTION_TIME_KEY,
    InstanceSnapshot, STARTED_AT_KEY, TRANSACTION_COUNT_KEY,
};
pub use summary::{ApplicationSummary, RunningSummary};

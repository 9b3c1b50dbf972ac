// Cluster-wide scalars for one application, as returned by the summary endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub instance_count: usize,
    pub running_instance_count: usize,
    pub total_transactions: u64,
    pub total_active_sessions: u64,
    pub total_average_transaction_time: f64,
    pub total_average_idle_time: f64,
    pub actual_transactions_per_second: f64,
    pub running: RunningSummary,
}

/// Same scalars restricted to running instances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningSummary {
    pub total_transactions: u64,
    pub total_active_sessions: u64,
    pub average_transaction_time: f64,
    pub average_idle_time: f64,
}

// Instance and application views consumed by the aggregator.
// The monitor that owns them replaces whole values; the aggregator only reads.

use serde::{Deserialize, Deserializer, Serialize};

use super::InstanceSnapshot;

/// Read access to one monitored instance.
pub trait InstanceHandle {
    /// Latest statistics, or `None` while the instance has not reported yet.
    fn statistics(&self) -> Option<&InstanceSnapshot>;
    fn is_running(&self) -> bool;
}

/// All instances (running or not) of one monitored application.
pub trait ApplicationView {
    type Instance: InstanceHandle;

    fn instances(&self) -> &[Self::Instance];
}

impl<H: InstanceHandle> ApplicationView for [H] {
    type Instance = H;

    fn instances(&self) -> &[H] {
        self
    }
}

impl<H: InstanceHandle> ApplicationView for Vec<H> {
    type Instance = H;

    fn instances(&self) -> &[H] {
        self
    }
}

/// Instance lifecycle state as reported by the monitor; serializes to lowercase JSON and
/// reads any spelling `from_monitor` accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceState {
    Running,
    Starting,
    Stopping,
    Stopped,
    Dead,
    #[default]
    Unknown,
}

impl InstanceState {
    /// Parse from a monitor state string (e.g. "running", "STOPPED").
    pub fn from_monitor(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "running" | "alive" => InstanceState::Running,
            "starting" => InstanceState::Starting,
            "stopping" => InstanceState::Stopping,
            "stopped" => InstanceState::Stopped,
            "dead" => InstanceState::Dead,
            _ => InstanceState::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for InstanceState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(InstanceState::from_monitor(&raw))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub state: InstanceState,
    #[serde(default)]
    pub statistics: Option<InstanceSnapshot>,
}

impl InstanceHandle for Instance {
    fn statistics(&self) -> Option<&InstanceSnapshot> {
        self.statistics.as_ref()
    }

    fn is_running(&self) -> bool {
        self.state == InstanceState::Running
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub name: String,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

impl ApplicationView for Application {
    type Instance = Instance;

    fn instances(&self) -> &[Instance] {
        &self.instances
    }
}

// Instance statistics snapshot: flat string-keyed record as sent by the instance reporter.

use std::collections::BTreeMap;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Number of transactions processed since the instance was started.
pub const TRANSACTION_COUNT_KEY: &str = "transactions";

/// Number of currently active sessions on the instance.
pub const ACTIVE_SESSION_COUNT_KEY: &str = "activeSessions";

/// Mean transaction duration since start. Units are whatever the reporter uses.
pub const AVERAGE_TRANSACTION_TIME_KEY: &str = "avgTransactionTime";

/// Mean idle period since start. Units are whatever the reporter uses.
pub const AVERAGE_IDLE_TIME_KEY: &str = "averageIdlePeriod";

/// Start time, formatted `YYYY:MM:DD:HH:MM:SS <zone>` in UTC.
pub const STARTED_AT_KEY: &str = "startedAt";

/// Most recent statistics record of one instance. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InstanceSnapshot {
    values: BTreeMap<String, String>,
}

impl InstanceSnapshot {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    /// Raw string value for `key`, if the reporter sent one.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for InstanceSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Non-string JSON values are dropped; the aggregator sees them as absent keys.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for InstanceSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, RawValue>::deserialize(deserializer)?;
        let values = raw
            .into_iter()
            .filter_map(|(k, v)| match v {
                RawValue::Text(s) => Some((k, s)),
                RawValue::Other(_) => None,
            })
            .collect();
        Ok(Self { values })
    }
}

//! # Persisted Snapshot
//!
//! The only state that outlives a session. Written as JSON with an explicit
//! `version`; decoding reads the version first and walks the migration chain
//! up to [`SNAPSHOT_VERSION`] before binding the typed schema.
//!
//! Production rates are never stored: they come from the player's equipment
//! and are set again by the app after a restore.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{SnapshotError, SnapshotResult};

/// Newest schema this build writes and reads.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Governor counters worth keeping across sessions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GovernorSnapshot {
    pub current_day: NaiveDate,
    pub coins_awarded_today: u64,
    pub difficulty: f64,
}

/// Node progress of one lane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaneSnapshot {
    pub lane_index: usize,
    pub node_index: u32,
    pub node_capacity: f64,
    pub node_remaining: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub governor: GovernorSnapshot,
    /// `None` when lane progress was never saved; resume then falls back to
    /// the flat offline estimate.
    #[serde(default)]
    pub lanes: Option<Vec<LaneSnapshot>>,
    /// When the app last saw the player.
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Encodes as JSON.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization errors.
    pub fn to_json(&self) -> SnapshotResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a blob of any supported version.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::Json`] for malformed blobs,
    /// [`SnapshotError::MissingVersion`] when `version` is absent or not a number,
    /// [`SnapshotError::UnsupportedVersion`] for `0` or anything newer than this build.
    pub fn from_json(text: &str) -> SnapshotResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        let value = migrate(value)?;
        Ok(serde_json::from_value(value)?)
    }
}

fn version_of(value: &Value) -> SnapshotResult<u64> {
    value
        .get("version")
        .and_then(Value::as_u64)
        .ok_or(SnapshotError::MissingVersion)
}

/// Upgrades `value` one version at a time until it reaches the current schema.
fn migrate(value: Value) -> SnapshotResult<Value> {
    let found = version_of(&value)?;
    if found == 0 || found > u64::from(SNAPSHOT_VERSION) {
        return Err(SnapshotError::UnsupportedVersion { found, supported: SNAPSHOT_VERSION });
    }
    // Version 1 is current. A future schema adds `1 => upgrade_v1_to_v2(value)?` here.
    debug!(version = found, "snapshot schema accepted");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            governor: GovernorSnapshot {
                current_day: NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
                coins_awarded_today: 4_200,
                difficulty: 1.5,
            },
            lanes: Some(vec![LaneSnapshot {
                lane_index: 0,
                node_index: 7,
                node_capacity: 52.0,
                node_remaining: 12.5,
            }]),
            last_seen: None,
        }
    }

    #[test]
    fn json_keeps_fields() {
        let snap = sample();
        let back = Snapshot::from_json(&snap.to_json().unwrap()).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn lanes_and_last_seen_are_optional() {
        let text = r#"{"version":1,"governor":{"current_day":"2026-05-04","coins_awarded_today":3,"difficulty":1.0}}"#;
        let snap = Snapshot::from_json(text).unwrap();
        assert_eq!(snap.lanes, None);
        assert_eq!(snap.last_seen, None);
    }

    #[test]
    fn newer_version_is_rejected() {
        let text = r#"{"version":9,"governor":{"current_day":"2026-05-04","coins_awarded_today":3,"difficulty":1.0}}"#;
        assert!(matches!(
            Snapshot::from_json(text),
            Err(SnapshotError::UnsupportedVersion { found: 9, supported: 1 })
        ));
    }

    #[test]
    fn missing_version_is_rejected() {
        assert!(matches!(Snapshot::from_json(r#"{"governor":{}}"#), Err(SnapshotError::MissingVersion)));
        assert!(matches!(Snapshot::from_json("not json"), Err(SnapshotError::Json(_))));
    }
}

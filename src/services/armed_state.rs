//! Disk persistence for armed alert flags.
//!
//! The armed sets survive restarts so a bounce of the process does not
//! replay alerts for conditions that already fired. A snapshot older than
//! an hour is discarded and the engine starts cold.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::types::AlertKind;

/// Current on-disk record version.
pub const STATE_VERSION: u32 = 1;

/// Snapshots older than this are treated as absent.
const MAX_AGE_SECS: i64 = 3600;

/// Timestamp format used in the state file.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn default_version() -> u32 {
    STATE_VERSION
}

/// The persisted armed-alert snapshot: per alert kind, the symbols whose
/// alert has fired and whose condition is still active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmedStateRecord {
    /// Record format version; files written before versioning parse as 1.
    #[serde(default = "default_version")]
    pub version: u32,
    pub high_roi: BTreeSet<String>,
    pub high_loss: BTreeSet<String>,
    pub rapid_growth: BTreeSet<String>,
    pub high_pnl: BTreeSet<String>,
    /// Wall-clock time of the last write, "%Y-%m-%d %H:%M:%S" local time.
    pub last_update: String,
}

impl ArmedStateRecord {
    /// Empty record stamped with the current time.
    pub fn new() -> Self {
        Self {
            version: STATE_VERSION,
            high_roi: BTreeSet::new(),
            high_loss: BTreeSet::new(),
            rapid_growth: BTreeSet::new(),
            high_pnl: BTreeSet::new(),
            last_update: now_string(),
        }
    }

    /// The armed symbol set for an alert kind.
    pub fn armed(&self, kind: AlertKind) -> &BTreeSet<String> {
        match kind {
            AlertKind::HighPnl => &self.high_pnl,
            AlertKind::HighRoi => &self.high_roi,
            AlertKind::HighLoss => &self.high_loss,
            AlertKind::RapidGrowth => &self.rapid_growth,
        }
    }

    /// Mutable armed symbol set for an alert kind.
    pub fn armed_mut(&mut self, kind: AlertKind) -> &mut BTreeSet<String> {
        match kind {
            AlertKind::HighPnl => &mut self.high_pnl,
            AlertKind::HighRoi => &mut self.high_roi,
            AlertKind::HighLoss => &mut self.high_loss,
            AlertKind::RapidGrowth => &mut self.rapid_growth,
        }
    }

    /// Whether the record's timestamp is older than the expiry window.
    pub fn is_expired(&self) -> bool {
        let Ok(written) = NaiveDateTime::parse_from_str(&self.last_update, TIMESTAMP_FORMAT)
        else {
            return true;
        };
        let age = Local::now().naive_local() - written;
        age.num_seconds() > MAX_AGE_SECS
    }
}

impl Default for ArmedStateRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Current local time in the state file's timestamp format.
pub fn now_string() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// File-backed store for the armed-alert snapshot.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Create a store writing to the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the persisted record, if present, parseable and fresh.
    ///
    /// Missing, corrupt and expired files all come back as `None`; the
    /// caller cold-starts with empty armed sets.
    pub fn load(&self) -> Option<ArmedStateRecord> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return None,
        };

        let record: ArmedStateRecord = match serde_json::from_str(&content) {
            Ok(r) => r,
            Err(e) => {
                warn!("Failed to parse state file {:?}: {}", self.path, e);
                return None;
            }
        };

        if record.is_expired() {
            debug!("State file {:?} expired, starting cold", self.path);
            return None;
        }

        Some(record)
    }

    /// Write the record wholesale, stamped with the current time.
    ///
    /// Failures are logged and swallowed; the in-memory state remains
    /// authoritative for the rest of the process lifetime.
    pub fn save(&self, record: &ArmedStateRecord) {
        let stamped = ArmedStateRecord {
            last_update: now_string(),
            ..record.clone()
        };

        match serde_json::to_string_pretty(&stamped) {
            Ok(content) => {
                if let Err(e) = fs::write(&self.path, content) {
                    warn!("Failed to write state file {:?}: {}", self.path, e);
                } else {
                    debug!("Saved armed state to {:?}", self.path);
                }
            }
            Err(e) => {
                warn!("Failed to serialize armed state: {}", e);
            }
        }
    }

    /// Delete the state file if it exists.
    pub fn remove(&self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_store(name: &str) -> StateStore {
        let dir = std::env::temp_dir().join(format!("vigil_state_test_{}", name));
        if dir.exists() {
            let _ = fs::remove_dir_all(&dir);
        }
        let _ = fs::create_dir_all(&dir);
        StateStore::new(dir.join("states.json"))
    }

    fn cleanup(store: &StateStore) {
        if let Some(dir) = store.path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    // =========================================================================
    // ArmedStateRecord Tests
    // =========================================================================

    #[test]
    fn test_record_new_is_empty_and_fresh() {
        let record = ArmedStateRecord::new();
        assert!(record.high_pnl.is_empty());
        assert!(record.high_roi.is_empty());
        assert!(record.high_loss.is_empty());
        assert!(record.rapid_growth.is_empty());
        assert_eq!(record.version, STATE_VERSION);
        assert!(!record.is_expired());
    }

    #[test]
    fn test_record_armed_accessor_per_kind() {
        let mut record = ArmedStateRecord::new();
        record.armed_mut(AlertKind::HighRoi).insert("BTC".to_string());
        record.armed_mut(AlertKind::HighLoss).insert("ETH".to_string());

        assert!(record.armed(AlertKind::HighRoi).contains("BTC"));
        assert!(record.armed(AlertKind::HighLoss).contains("ETH"));
        assert!(record.armed(AlertKind::HighPnl).is_empty());
        assert!(record.armed(AlertKind::RapidGrowth).is_empty());
    }

    #[test]
    fn test_record_expiry_by_timestamp() {
        let old = Local::now().naive_local() - Duration::seconds(MAX_AGE_SECS + 60);
        let record = ArmedStateRecord {
            last_update: old.format(TIMESTAMP_FORMAT).to_string(),
            ..ArmedStateRecord::new()
        };
        assert!(record.is_expired());

        let recent = Local::now().naive_local() - Duration::seconds(60);
        let record = ArmedStateRecord {
            last_update: recent.format(TIMESTAMP_FORMAT).to_string(),
            ..ArmedStateRecord::new()
        };
        assert!(!record.is_expired());
    }

    #[test]
    fn test_record_unparseable_timestamp_is_expired() {
        let record = ArmedStateRecord {
            last_update: "not a timestamp".to_string(),
            ..ArmedStateRecord::new()
        };
        assert!(record.is_expired());
    }

    #[test]
    fn test_record_wire_format_keys() {
        let mut record = ArmedStateRecord::new();
        record.high_roi.insert("BTC".to_string());
        record.high_pnl.insert("SOL".to_string());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["high_roi"][0], "BTC");
        assert_eq!(json["high_pnl"][0], "SOL");
        assert!(json["high_loss"].as_array().unwrap().is_empty());
        assert!(json["rapid_growth"].as_array().unwrap().is_empty());
        assert!(json["last_update"].is_string());
    }

    #[test]
    fn test_record_parses_legacy_file_without_version() {
        let json = r#"{
            "high_roi": ["BTC"],
            "high_loss": [],
            "rapid_growth": ["DOGE"],
            "high_pnl": [],
            "last_update": "2024-01-15 12:00:00"
        }"#;

        let record: ArmedStateRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.version, STATE_VERSION);
        assert!(record.high_roi.contains("BTC"));
        assert!(record.rapid_growth.contains("DOGE"));
    }

    // =========================================================================
    // StateStore Tests
    // =========================================================================

    #[test]
    fn test_store_round_trip() {
        let store = test_store("round_trip");

        let mut record = ArmedStateRecord::new();
        record.high_roi.insert("BTC".to_string());
        record.high_loss.insert("ETH".to_string());
        store.save(&record);

        let loaded = store.load().unwrap();
        assert_eq!(loaded.high_roi, record.high_roi);
        assert_eq!(loaded.high_loss, record.high_loss);
        assert!(loaded.high_pnl.is_empty());

        cleanup(&store);
    }

    #[test]
    fn test_store_load_missing_file() {
        let store = test_store("missing");
        assert!(store.load().is_none());
        cleanup(&store);
    }

    #[test]
    fn test_store_load_corrupt_file() {
        let store = test_store("corrupt");
        fs::write(&store.path, "{ this is not json").unwrap();

        assert!(store.load().is_none());
        cleanup(&store);
    }

    #[test]
    fn test_store_load_discards_expired_snapshot() {
        let store = test_store("expired");

        let old = Local::now().naive_local() - Duration::seconds(MAX_AGE_SECS + 120);
        let mut record = ArmedStateRecord::new();
        record.high_pnl.insert("BTC".to_string());
        record.last_update = old.format(TIMESTAMP_FORMAT).to_string();
        // Write directly so save() does not refresh the timestamp.
        fs::write(&store.path, serde_json::to_string(&record).unwrap()).unwrap();

        assert!(store.load().is_none());
        cleanup(&store);
    }

    #[test]
    fn test_store_save_refreshes_timestamp() {
        let store = test_store("refresh");

        let old = Local::now().naive_local() - Duration::seconds(MAX_AGE_SECS + 120);
        let mut record = ArmedStateRecord::new();
        record.rapid_growth.insert("SOL".to_string());
        record.last_update = old.format(TIMESTAMP_FORMAT).to_string();
        store.save(&record);

        // save() stamps the current time, so the snapshot is fresh again.
        let loaded = store.load().unwrap();
        assert!(loaded.rapid_growth.contains("SOL"));

        cleanup(&store);
    }

    #[test]
    fn test_store_remove() {
        let store = test_store("remove");
        store.save(&ArmedStateRecord::new());
        assert!(store.load().is_some());

        store.remove();
        assert!(store.load().is_none());

        cleanup(&store);
    }
}

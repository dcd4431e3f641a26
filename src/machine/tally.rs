//! Persistent vote tally
//!
//! The tally lives under one reserved key in an external key-value store.
//! Read and deserialize failures degrade to the zero-state record; write
//! failures are logged and swallowed. The in-memory record stays the source
//! of truth for the rest of the session either way.

use crate::types::{Candidate, TallyRecord};
use crate::{Result, storage_error};
use chrono::Utc;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Minimal key-value store boundary the tally persists against
///
/// The store is treated as a flat string-to-string mapping with no
/// durability guarantees beyond what the backing medium provides.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under a key; `None` when the key is absent
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write the value under a key, replacing any previous value
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| storage_error!("Store read lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| storage_error!("Store write lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store: one JSON file per key under a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at a directory, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| storage_error!("Cannot create store directory: {}", e))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error!("Cannot read key {}: {}", key, e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.path_for(key), value)
            .map_err(|e| storage_error!("Cannot write key {}: {}", key, e))
    }
}

/// Durable vote counters under one reserved store key
///
/// `record_vote` is a plain read-modify-write with no cross-instance guard:
/// independent panel instances sharing one store can lose updates to each
/// other (last write wins on the whole record). Accepted limitation of the
/// widget, matching its always-available contract.
pub struct PersistentTally {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl PersistentTally {
    /// Create a tally persisting under `key` in the given store
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Create a tally over a fresh in-memory store (for tests)
    pub fn for_testing() -> Self {
        Self::new(Arc::new(MemoryStore::new()), "vfsVotes")
    }

    /// Load the record, degrading to the zero-state on any failure
    ///
    /// Missing key, unreadable store, and malformed payload all land on the
    /// zero-state; the failure is logged, never surfaced.
    pub fn load(&self) -> TallyRecord {
        let raw = match self.store.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return TallyRecord::zero(),
            Err(e) => {
                warn!("Unable to read stored votes: {e}");
                return TallyRecord::zero();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!("Stored votes are malformed, starting from zero: {e}");
                TallyRecord::zero()
            }
        }
    }

    /// Write the record back; failures are logged and swallowed
    pub fn save(&self, record: &TallyRecord) {
        let payload = match serde_json::to_string(record) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Unable to serialize votes: {e}");
                return;
            }
        };
        if let Err(e) = self.store.write(&self.key, &payload) {
            warn!("Unable to save votes: {e}");
        }
    }

    /// Record one vote for a candidate and persist the updated record
    ///
    /// load → total += 1 → per-candidate count += 1 (created at 1) →
    /// remember the display name → stamp → save. Returns the updated record.
    pub fn record_vote(&self, candidate: &Candidate) -> TallyRecord {
        let mut record = self.load();
        record.total += 1;
        *record.candidates.entry(candidate.id.clone()).or_insert(0) += 1;
        record
            .candidate_names
            .insert(candidate.id.clone(), candidate.name.clone());
        record.updated_at = Some(Utc::now());
        self.save(&record);

        debug!(
            candidate = %candidate.id,
            count = record.count_for(&candidate.id),
            total = record.total,
            "vote recorded"
        );
        record
    }

    /// The reserved store key this tally persists under
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Store double whose reads and writes always fail
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Err(storage_error!("store unplugged"))
        }

        fn write(&self, _key: &str, _value: &str) -> Result<()> {
            Err(storage_error!("store unplugged"))
        }
    }

    #[test]
    fn test_load_missing_key_is_zero_state() {
        let tally = PersistentTally::for_testing();
        assert_eq!(tally.load(), TallyRecord::zero());
    }

    #[test]
    fn test_load_garbage_is_zero_state() {
        let store = Arc::new(MemoryStore::new());
        store.write("vfsVotes", "{not json").unwrap();
        let tally = PersistentTally::new(store, "vfsVotes");
        assert_eq!(tally.load(), TallyRecord::zero());
    }

    #[test]
    fn test_record_vote_increments() {
        let tally = PersistentTally::for_testing();
        let candidate = Candidate::new("c1", "Aarav Sharma");

        let record = tally.record_vote(&candidate);
        assert_eq!(record.total, 1);
        assert_eq!(record.count_for("c1"), 1);
        assert_eq!(record.candidate_names["c1"], "Aarav Sharma");
        assert!(record.updated_at.is_some());

        let record = tally.record_vote(&candidate);
        assert_eq!(record.total, 2);
        assert_eq!(record.count_for("c1"), 2);

        // Persisted copy agrees with the returned record
        let loaded = tally.load();
        assert_eq!(loaded.total, 2);
        assert_eq!(loaded.count_for("c1"), 2);
    }

    #[test]
    fn test_record_vote_remembers_latest_name() {
        let tally = PersistentTally::for_testing();
        tally.record_vote(&Candidate::new("c2", "Diya Kapoor"));
        tally.record_vote(&Candidate::new("c2", "Diya R. Kapoor"));
        assert_eq!(tally.load().candidate_names["c2"], "Diya R. Kapoor");
    }

    #[test]
    fn test_broken_store_never_surfaces() {
        let tally = PersistentTally::new(Arc::new(BrokenStore), "vfsVotes");
        // Load degrades, record_vote still returns the incremented record
        assert_eq!(tally.load(), TallyRecord::zero());
        let record = tally.record_vote(&Candidate::new("c1", "Test"));
        assert_eq!(record.total, 1);
        assert_eq!(record.count_for("c1"), 1);
    }

    #[test]
    fn test_save_load_is_idempotent() {
        let tally = PersistentTally::for_testing();
        tally.record_vote(&Candidate::new("c1", "Test"));
        let once = tally.load();
        tally.save(&once);
        tally.save(&tally.load());
        assert_eq!(tally.load(), once);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("evm-panel-test-{}", uuid::Uuid::new_v4()));
        let store = Arc::new(FileStore::new(&dir).unwrap());
        let tally = PersistentTally::new(store.clone(), "vfsVotes");

        tally.record_vote(&Candidate::new("c1", "Test"));

        // A second tally over the same directory sees the write
        let reopened = PersistentTally::new(Arc::new(FileStore::new(&dir).unwrap()), "vfsVotes");
        assert_eq!(reopened.load().total, 1);

        std::fs::remove_dir_all(&dir).ok();
    }
}

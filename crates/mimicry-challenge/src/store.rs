//! Key-value record stores.
//!
//! [`RecordStore`] is the persistence seam. Two implementations are provided:
//! [`MemoryStore`] for tests and embedding, and [`JsonDirStore`], which keeps one
//! pretty-printed JSON file per challenge in a directory.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{ChallengeError, ChallengeResult};
use crate::record::ChallengeRecord;

/// Storage for challenge records keyed by id.
pub trait RecordStore {
    /// Returns an id greater than every stored id.
    fn next_id(&mut self) -> ChallengeResult<u64>;

    /// Inserts a new record. Fails if the id is already taken.
    fn insert(&mut self, record: ChallengeRecord) -> ChallengeResult<()>;

    /// Fetches a record, `None` if absent.
    fn get(&self, id: u64) -> ChallengeResult<Option<ChallengeRecord>>;

    /// Replaces an existing record. Fails with `NotFound` if absent.
    fn update(&mut self, record: ChallengeRecord) -> ChallengeResult<()>;

    /// Removes and returns a record. Fails with `NotFound` if absent.
    fn delete(&mut self, id: u64) -> ChallengeResult<ChallengeRecord>;

    /// All records in ascending id order.
    fn list(&self) -> ChallengeResult<Vec<ChallengeRecord>>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<u64, ChallengeRecord>,
    last_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn next_id(&mut self) -> ChallengeResult<u64> {
        self.last_id += 1;
        Ok(self.last_id)
    }

    fn insert(&mut self, record: ChallengeRecord) -> ChallengeResult<()> {
        if self.records.contains_key(&record.id) {
            return Err(ChallengeError::store(format!(
                "challenge {} already exists",
                record.id
            )));
        }
        self.last_id = self.last_id.max(record.id);
        self.records.insert(record.id, record);
        Ok(())
    }

    fn get(&self, id: u64) -> ChallengeResult<Option<ChallengeRecord>> {
        Ok(self.records.get(&id).cloned())
    }

    fn update(&mut self, record: ChallengeRecord) -> ChallengeResult<()> {
        match self.records.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(ChallengeError::NotFound { id: record.id }),
        }
    }

    fn delete(&mut self, id: u64) -> ChallengeResult<ChallengeRecord> {
        self.records
            .remove(&id)
            .ok_or(ChallengeError::NotFound { id })
    }

    fn list(&self) -> ChallengeResult<Vec<ChallengeRecord>> {
        Ok(self.records.values().cloned().collect())
    }
}

/// Directory-backed store: `challenge-<id>.json` per record.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so a reader never sees a half-written record.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> ChallengeResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding record `id`.
    pub fn record_path(&self, id: u64) -> PathBuf {
        self.root.join(format!("challenge-{}.json", id))
    }

    fn stored_ids(&self) -> ChallengeResult<Vec<u64>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if let Some(id) = parse_record_file_name(&entry.file_name().to_string_lossy()) {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    fn read_record(&self, path: &Path) -> ChallengeResult<ChallengeRecord> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            ChallengeError::store(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    fn write_record(&self, record: &ChallengeRecord) -> ChallengeResult<()> {
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| ChallengeError::store(format!("failed to serialize record: {}", e)))?;

        let mut staged = tempfile::NamedTempFile::new_in(&self.root)?;
        staged.write_all(json.as_bytes())?;
        staged.as_file().sync_all()?;
        staged
            .persist(self.record_path(record.id))
            .map_err(|e| ChallengeError::Io(e.error))?;
        Ok(())
    }
}

fn parse_record_file_name(name: &str) -> Option<u64> {
    name.strip_prefix("challenge-")?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

impl RecordStore for JsonDirStore {
    fn next_id(&mut self) -> ChallengeResult<u64> {
        Ok(self.stored_ids()?.last().map_or(1, |id| id + 1))
    }

    fn insert(&mut self, record: ChallengeRecord) -> ChallengeResult<()> {
        if self.record_path(record.id).exists() {
            return Err(ChallengeError::store(format!(
                "challenge {} already exists",
                record.id
            )));
        }
        self.write_record(&record)?;
        log::info!(
            "stored challenge {} in {}",
            record.id,
            self.root.display()
        );
        Ok(())
    }

    fn get(&self, id: u64) -> ChallengeResult<Option<ChallengeRecord>> {
        let path = self.record_path(id);
        if !path.exists() {
            return Ok(None);
        }
        self.read_record(&path).map(Some)
    }

    fn update(&mut self, record: ChallengeRecord) -> ChallengeResult<()> {
        if !self.record_path(record.id).exists() {
            return Err(ChallengeError::NotFound { id: record.id });
        }
        self.write_record(&record)
    }

    fn delete(&mut self, id: u64) -> ChallengeResult<ChallengeRecord> {
        let record = self.get(id)?.ok_or(ChallengeError::NotFound { id })?;
        fs::remove_file(self.record_path(id))?;
        Ok(record)
    }

    fn list(&self) -> ChallengeResult<Vec<ChallengeRecord>> {
        self.stored_ids()?
            .into_iter()
            .map(|id| self.read_record(&self.record_path(id)))
            .collect()
    }
}

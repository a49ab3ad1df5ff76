//! Progression persistence adapters
//!
//! The store is an external collaborator behind a narrow load/save API.
//! Implementations here cover tests and single-server deployments; a host
//! embedding a real database implements the same trait.

use crate::core::types::PlayerId;
use crate::progression::progress::PlayerProgression;
use ahash::AHashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

/// Errors from the persistence substrate
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable record storage for player progression.
///
/// Blocking API by design: the embedded stores this models are synchronous,
/// and the persistence worker calls it off the hot path via
/// `spawn_blocking`. `save` must be atomic per record; a reader must never
/// observe a half-written snapshot.
pub trait ProgressionStore: Send + Sync {
    fn load(&self, player: PlayerId) -> Result<Option<PlayerProgression>, StoreError>;
    fn save(&self, record: &PlayerProgression) -> Result<(), StoreError>;
}

/// In-memory store for tests and ephemeral servers
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<AHashMap<PlayerId, PlayerProgression>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProgressionStore for MemoryStore {
    fn load(&self, player: PlayerId) -> Result<Option<PlayerProgression>, StoreError> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        Ok(records.get(&player).cloned())
    }

    fn save(&self, record: &PlayerProgression) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.insert(record.player, record.clone());
        Ok(())
    }
}

/// One JSON file per player under a data directory.
///
/// Writes go to a temp file first and land with an atomic rename, so a
/// crash mid-save leaves the previous consistent snapshot in place.
pub struct JsonFileStore {
    directory: PathBuf,
}

impl JsonFileStore {
    /// Create the store, making the directory if needed
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    fn record_path(&self, player: PlayerId) -> PathBuf {
        self.directory.join(format!("{}.json", player.0))
    }
}

impl ProgressionStore for JsonFileStore {
    fn load(&self, player: PlayerId) -> Result<Option<PlayerProgression>, StoreError> {
        let path = self.record_path(player);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, record: &PlayerProgression) -> Result<(), StoreError> {
        let path = self.record_path(record.player);
        let json = serde_json::to_string_pretty(record)?;
        let temp = path.with_extension("json.tmp");
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }
}

/// Shared handle type stores are passed around as
pub type SharedStore = std::sync::Arc<dyn ProgressionStore>;

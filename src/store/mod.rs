pub mod chunks;
pub mod keys;
pub mod migrate;
pub mod operations;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use thiserror::Error;

#[derive(Debug)]
pub struct Store {
    db: Db,
    pub triggers: sled::Tree,
    pub trigger_chunks: sled::Tree,
    pub detections: sled::Tree,
    pub tracking: sled::Tree,
    pub profiles: sled::Tree,
    pub config_versions: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("not found: entity={entity}, key={key}")]
    NotFound { entity: String, key: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("migration error at version {version}: {message}")]
    Migration { version: u32, message: String },
    #[error("corrupt chunks: trigger={trigger_id}, kind={kind}: {source}")]
    CorruptChunks {
        trigger_id: String,
        kind: String,
        #[source]
        source: chunks::ReassemblyError,
    },
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let triggers = db.open_tree(trees::TRIGGERS)?;
        let trigger_chunks = db.open_tree(trees::TRIGGER_CHUNKS)?;
        let detections = db.open_tree(trees::DETECTIONS)?;
        let tracking = db.open_tree(trees::TRACKING)?;
        let profiles = db.open_tree(trees::PROFILES)?;
        let config_versions = db.open_tree(trees::CONFIG_VERSIONS)?;

        Ok(Self {
            db,
            triggers,
            trigger_chunks,
            detections,
            tracking,
            profiles,
            config_versions,
        })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        migrate::run(self)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    /// Monotonic id used to order records written within the same millisecond.
    pub(crate) fn next_seq(&self) -> Result<u64, StoreError> {
        Ok(self.db.generate_id()?)
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Maps a failed multi-tree transaction back onto `StoreError`.
pub(crate) fn transaction_error(error: sled::transaction::TransactionError<StoreError>) -> StoreError {
    match error {
        sled::transaction::TransactionError::Abort(store_error) => store_error,
        sled::transaction::TransactionError::Storage(storage_error) => StoreError::Sled(storage_error),
    }
}

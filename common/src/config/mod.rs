//! Runtime configuration: the record, its validation, and persistence.

mod memory;
mod record;
mod store;

pub use memory::{MemoryStore, OpenStatus, SnapshotMedium, SnapshotStore, StoredValue, MAX_ENTRIES, SNAPSHOT_CAPACITY};
pub use record::{keys, ConfigUpdate, Corrections, GaugeConfig};
pub use store::{ConfigStore, KeyValueStore, SaveOutcome, StorageError};

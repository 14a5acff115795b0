//! RAM-backed key-value store and its postcard snapshot format.
//!
//! Targets without a native key-value layer keep the namespace in a
//! [`MemoryStore`] and persist it as one postcard blob through a
//! [`SnapshotMedium`] (a flash sector on the Pico 2, a file on the desktop).

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use super::record::keys::MAX_KEY_LEN;
use super::store::{KeyValueStore, StorageError};

/// Maximum number of keys in one namespace.
pub const MAX_ENTRIES: usize = 24;

/// Buffer size that fits a full namespace snapshot.
pub const SNAPSHOT_CAPACITY: usize = 1024;

/// Snapshot header, "GCFG" little-endian.
const SNAPSHOT_MAGIC: u32 = 0x4746_4347;
const SNAPSHOT_VERSION: u8 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum StoredValue {
    Bool(bool),
    F32(f32),
    I32(i32),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Entry {
    key: String<MAX_KEY_LEN>,
    value: StoredValue,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    magic: u32,
    version: u8,
    entries: Vec<Entry, MAX_ENTRIES>,
}

/// A namespace held in RAM. Commit is a no-op.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    entries: Vec<Entry, MAX_ENTRIES>,
}

impl MemoryStore {
    pub const fn new() -> Self { Self { entries: Vec::new() } }

    #[inline]
    pub fn len(&self) -> usize { self.entries.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn get(
        &self,
        key: &str,
    ) -> Option<StoredValue> {
        self.entries.iter().find(|e| e.key.as_str() == key).map(|e| e.value)
    }

    pub fn put(
        &mut self,
        key: &str,
        value: StoredValue,
    ) -> Result<(), StorageError> {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key.as_str() == key) {
            entry.value = value;
            return Ok(());
        }

        let mut owned = String::new();
        owned.push_str(key).map_err(|_| StorageError::KeyTooLong)?;
        self.entries
            .push(Entry { key: owned, value })
            .map_err(|_| StorageError::Full)
    }

    /// Serialize into `buf`, returning the number of bytes used.
    pub fn encode(
        &self,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        let snapshot = Snapshot {
            magic: SNAPSHOT_MAGIC,
            version: SNAPSHOT_VERSION,
            entries: self.entries.clone(),
        };
        postcard::to_slice(&snapshot, buf)
            .map(|used| used.len())
            .map_err(|_| StorageError::Encode)
    }

    /// Parse a snapshot produced by [`encode`](Self::encode).
    pub fn decode(bytes: &[u8]) -> Result<Self, StorageError> {
        let snapshot: Snapshot = postcard::from_bytes(bytes).map_err(|_| StorageError::Corrupted)?;
        if snapshot.magic != SNAPSHOT_MAGIC || snapshot.version != SNAPSHOT_VERSION {
            return Err(StorageError::Corrupted);
        }
        Ok(Self { entries: snapshot.entries })
    }
}

impl KeyValueStore for MemoryStore {
    fn get_bool(
        &mut self,
        key: &str,
    ) -> Option<bool> {
        match self.get(key)? {
            StoredValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    fn get_f32(
        &mut self,
        key: &str,
    ) -> Option<f32> {
        match self.get(key)? {
            StoredValue::F32(v) => Some(v),
            _ => None,
        }
    }

    fn get_i32(
        &mut self,
        key: &str,
    ) -> Option<i32> {
        match self.get(key)? {
            StoredValue::I32(v) => Some(v),
            _ => None,
        }
    }

    fn put_bool(
        &mut self,
        key: &str,
        value: bool,
    ) -> Result<(), StorageError> {
        self.put(key, StoredValue::Bool(value))
    }

    fn put_f32(
        &mut self,
        key: &str,
        value: f32,
    ) -> Result<(), StorageError> {
        self.put(key, StoredValue::F32(value))
    }

    fn put_i32(
        &mut self,
        key: &str,
        value: i32,
    ) -> Result<(), StorageError> {
        self.put(key, StoredValue::I32(value))
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        Ok(())
    }
}

// =============================================================================
// Snapshot Persistence
// =============================================================================

/// Raw byte storage that holds one snapshot.
pub trait SnapshotMedium {
    /// Fill `buf` with the stored bytes, returning how many are valid.
    /// An empty or erased medium may return garbage; decoding rejects it.
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> Result<usize, StorageError>;

    /// Replace the stored bytes.
    fn write(
        &mut self,
        bytes: &[u8],
    ) -> Result<(), StorageError>;
}

/// How [`SnapshotStore::open`] found the medium.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OpenStatus {
    /// A valid snapshot with this many keys was restored.
    Restored(usize),
    /// Nothing usable was stored; starting empty.
    Blank,
    /// The medium could not be read; starting empty.
    Unreadable(StorageError),
}

/// A [`MemoryStore`] persisted as a whole on every commit.
pub struct SnapshotStore<M> {
    memory: MemoryStore,
    medium: M,
}

impl<M: SnapshotMedium> SnapshotStore<M> {
    pub fn open(mut medium: M) -> (Self, OpenStatus) {
        let mut buf = [0u8; SNAPSHOT_CAPACITY];
        let (memory, status) = match medium.read(&mut buf) {
            Ok(len) => match MemoryStore::decode(&buf[..len.min(SNAPSHOT_CAPACITY)]) {
                Ok(memory) => {
                    let count = memory.len();
                    (memory, OpenStatus::Restored(count))
                }
                Err(_) => (MemoryStore::new(), OpenStatus::Blank),
            },
            Err(err) => (MemoryStore::new(), OpenStatus::Unreadable(err)),
        };
        (Self { memory, medium }, status)
    }

    #[inline]
    pub fn memory(&self) -> &MemoryStore { &self.memory }

    #[inline]
    pub fn medium(&self) -> &M { &self.medium }
}

impl<M: SnapshotMedium> KeyValueStore for SnapshotStore<M> {
    fn get_bool(
        &mut self,
        key: &str,
    ) -> Option<bool> {
        self.memory.get_bool(key)
    }

    fn get_f32(
        &mut self,
        key: &str,
    ) -> Option<f32> {
        self.memory.get_f32(key)
    }

    fn get_i32(
        &mut self,
        key: &str,
    ) -> Option<i32> {
        self.memory.get_i32(key)
    }

    fn put_bool(
        &mut self,
        key: &str,
        value: bool,
    ) -> Result<(), StorageError> {
        self.memory.put_bool(key, value)
    }

    fn put_f32(
        &mut self,
        key: &str,
        value: f32,
    ) -> Result<(), StorageError> {
        self.memory.put_f32(key, value)
    }

    fn put_i32(
        &mut self,
        key: &str,
        value: i32,
    ) -> Result<(), StorageError> {
        self.memory.put_i32(key, value)
    }

    fn clear(&mut self) -> Result<(), StorageError> { self.memory.clear() }

    fn commit(&mut self) -> Result<(), StorageError> {
        let mut buf = [0u8; SNAPSHOT_CAPACITY];
        let len = self.memory.encode(&mut buf)?;
        self.medium.write(&buf[..len])
    }
}

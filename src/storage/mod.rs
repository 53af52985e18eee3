//! Durable key/value media the container is mirrored to.
//!
//! The store only ever reads and writes one key holding one JSON blob, so a
//! medium is three calls. [`memory::MemoryStorage`] backs tests,
//! [`file::FileStorage`] keeps one JSON file per key, and
//! [`sqlite::SqliteStorage`] keeps a `kv` table in a single database file.

pub mod file;
pub mod memory;
pub mod sqlite;

pub trait StorageMedium {
    fn get_raw(&self, key: &str) -> anyhow::Result<Option<String>>;

    fn set_raw(&mut self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Removing an absent key is not an error.
    fn remove_raw(&mut self, key: &str) -> anyhow::Result<()>;
}

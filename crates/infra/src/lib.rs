//! Infrastructure layer: the record store, its persistence, and upload storage.

pub mod files;
pub mod persistence;
pub mod store;

pub use files::{FileStorage, FileStorageError, InMemoryFileStorage, LocalFileStorage, Namespace};
pub use persistence::{JsonSnapshot, MemoryPersistence, Persistence};
pub use store::{
    Deletion, Detached, OrderBy, Query, Reader, Store, StoredRecord, Table, Tables, Transaction,
};

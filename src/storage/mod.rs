//! Storage layer for tasbeeh - key-collection persistence over a local
//! key-value backend.
//!
//! The layer is built bottom-up:
//! - [`KeyValueBackend`]: the on-device storage primitive (one string per key)
//! - [`KvStorage`]: one JSON-serialized value under one namespaced key
//! - [`CollectionStorage`]: treats the stored value as an id-keyed sequence
//! - [`TasbeehStorage`]: domain operations over the tasbeeh collection
//!
//! Every mutation reads the entire collection, mutates an in-memory copy and
//! persists the whole sequence back. There is no partial write and no index;
//! two overlapped mutations race with last-write-wins semantics.

mod backend;
mod collection;
mod kv;
mod tasbeeh;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use collection::{CollectionStorage, HasId};
pub use kv::KvStorage;
pub use tasbeeh::{TASBEEH_COLLECTION, TasbeehStorage};

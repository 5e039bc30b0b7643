pub mod atomic_writer;
pub mod json_file_store;
pub mod memory_store;
pub mod snapshot_repository;

pub use atomic_writer::AtomicWriter;
pub use json_file_store::{JsonEnvelope, JsonFileStore, FORMAT_VERSION};
pub use memory_store::MemoryStore;
pub use snapshot_repository::{Dataset, SnapshotRepository};

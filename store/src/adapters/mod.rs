pub mod firestore;
pub mod in_memory;

pub use firestore::{FirestoreConfig, FirestoreStore};
pub use in_memory::MemoryStore;

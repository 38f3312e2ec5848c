// Persisted domain entities and their stores:
// - Task and user-profile records
// - Store traits with in-memory and Firestore REST adapters
// - Streak/XP progression and weekly aggregation

// Export errors module - shared store error type
pub mod errors;
pub use errors::{StoreError, StoreResult};

// Export task module - task records, drafts, updates and filters
pub mod task;
pub use task::*;

// Export profile module - per-user profile and gamification counters
pub mod profile;
pub use profile::*;

// Export store module - storage traits
pub mod store;
pub use store::*;

// Export week module - weekly aggregation for the feedback flow
pub mod week;
pub use week::WeeklySummary;

// Storage adapters
pub mod adapters;
pub use adapters::{FirestoreConfig, FirestoreStore, MemoryStore};

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::StoreResult;
use crate::profile::UserProfile;
use crate::task::{Task, TaskDraft, TaskFilter, TaskUpdate};

/// Trait defining the interface for per-user task storage.
///
/// Every operation is scoped by the authenticated user's uid. Writes are
/// explicit awaited operations; concurrent edits are not reconciled (last
/// write wins in the backing store).
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Validate the draft and persist a new task for the user.
    async fn create_task(&self, uid: &str, draft: TaskDraft) -> StoreResult<Task>;

    /// Fetch one task by id.
    async fn get_task(&self, uid: &str, task_id: &str) -> StoreResult<Task>;

    /// List the user's tasks matching the due-date/completion filter,
    /// ordered by due date.
    async fn list_tasks(&self, uid: &str, filter: &TaskFilter) -> StoreResult<Vec<Task>>;

    /// Apply a partial update to one task.
    async fn update_task(&self, uid: &str, task_id: &str, update: TaskUpdate) -> StoreResult<Task>;

    /// Set the completion flag (and matching status) of one task.
    async fn set_completed(&self, uid: &str, task_id: &str, completed: bool) -> StoreResult<Task>;

    /// Delete one task.
    async fn delete_task(&self, uid: &str, task_id: &str) -> StoreResult<()>;
}

/// Trait defining the interface for the per-user profile record.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the user's profile, if one has been created yet.
    async fn get_profile(&self, uid: &str) -> StoreResult<Option<UserProfile>>;

    /// Create or replace the user's profile.
    async fn put_profile(&self, profile: UserProfile) -> StoreResult<()>;
}

/// Type alias for Arc-wrapped TaskStore trait objects
pub type TaskStoreRef = Arc<dyn TaskStore>;

/// Type alias for Arc-wrapped ProfileStore trait objects
pub type ProfileStoreRef = Arc<dyn ProfileStore>;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::errors::{StoreError, StoreResult};
use crate::profile::UserProfile;
use crate::store::{ProfileStore, TaskStore};
use crate::task::{Task, TaskDraft, TaskFilter, TaskStatus, TaskUpdate};

/// In-memory implementation of the task and profile stores, used by tests
/// and local runs without a document-store backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: Arc<RwLock<HashMap<String, HashMap<String, Task>>>>,
    profiles: Arc<RwLock<HashMap<String, UserProfile>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_tasks(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, HashMap<String, HashMap<String, Task>>>> {
        self.tasks
            .read()
            .map_err(|e| StoreError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_tasks(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, HashMap<String, HashMap<String, Task>>>> {
        self.tasks
            .write()
            .map_err(|e| StoreError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, uid: &str, draft: TaskDraft) -> StoreResult<Task> {
        let task = draft.build(Uuid::new_v4().to_string(), Utc::now())?;

        let mut tasks = self.write_tasks()?;
        tasks
            .entry(uid.to_string())
            .or_default()
            .insert(task.id.clone(), task.clone());
        debug!(uid, task_id = %task.id, "Created task");

        Ok(task)
    }

    async fn get_task(&self, uid: &str, task_id: &str) -> StoreResult<Task> {
        let tasks = self.read_tasks()?;
        tasks
            .get(uid)
            .and_then(|user_tasks| user_tasks.get(task_id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(task_id.to_string()))
    }

    async fn list_tasks(&self, uid: &str, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let tasks = self.read_tasks()?;
        let mut matching: Vec<Task> = tasks
            .get(uid)
            .map(|user_tasks| {
                user_tasks
                    .values()
                    .filter(|task| filter.matches(task))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        matching.sort_by_key(|task| task.due_date);
        Ok(matching)
    }

    async fn update_task(&self, uid: &str, task_id: &str, update: TaskUpdate) -> StoreResult<Task> {
        let mut tasks = self.write_tasks()?;
        let task = tasks
            .get_mut(uid)
            .and_then(|user_tasks| user_tasks.get_mut(task_id))
            .ok_or_else(|| StoreError::NotFound(task_id.to_string()))?;

        update.apply(task)?;
        Ok(task.clone())
    }

    async fn set_completed(&self, uid: &str, task_id: &str, completed: bool) -> StoreResult<Task> {
        let mut tasks = self.write_tasks()?;
        let task = tasks
            .get_mut(uid)
            .and_then(|user_tasks| user_tasks.get_mut(task_id))
            .ok_or_else(|| StoreError::NotFound(task_id.to_string()))?;

        task.is_completed = completed;
        task.status = if completed {
            TaskStatus::Done
        } else {
            TaskStatus::Pending
        };
        Ok(task.clone())
    }

    async fn delete_task(&self, uid: &str, task_id: &str) -> StoreResult<()> {
        let mut tasks = self.write_tasks()?;
        let removed = tasks
            .get_mut(uid)
            .and_then(|user_tasks| user_tasks.remove(task_id));

        if removed.is_none() {
            return Err(StoreError::NotFound(task_id.to_string()));
        }
        debug!(uid, task_id, "Deleted task");
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, uid: &str) -> StoreResult<Option<UserProfile>> {
        let profiles = self
            .profiles
            .read()
            .map_err(|e| StoreError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(profiles.get(uid).cloned())
    }

    async fn put_profile(&self, profile: UserProfile) -> StoreResult<()> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|e| StoreError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        profiles.insert(profile.uid.clone(), profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn draft(title: &str, days_out: i64) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            due_date: Some(
                Utc.with_ymd_and_hms(2024, 8, 10, 12, 0, 0).unwrap() + Duration::days(days_out),
            ),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_get_delete_round_trip() {
        let store = MemoryStore::new();

        let task = store.create_task("u1", draft("Math HW", 1)).await.unwrap();
        let fetched = store.get_task("u1", &task.id).await.unwrap();
        assert_eq!(fetched, task);

        store.delete_task("u1", &task.id).await.unwrap();
        assert!(matches!(
            store.get_task("u1", &task.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn tasks_are_scoped_per_user() {
        let store = MemoryStore::new();
        let task = store.create_task("u1", draft("Math HW", 1)).await.unwrap();

        assert!(matches!(
            store.get_task("u2", &task.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected() {
        let store = MemoryStore::new();
        let result = store
            .create_task(
                "u1",
                TaskDraft {
                    title: "".to_string(),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[tokio::test]
    async fn list_orders_by_due_date_and_honors_filter() {
        let store = MemoryStore::new();
        store.create_task("u1", draft("Later", 5)).await.unwrap();
        let earlier = store.create_task("u1", draft("Earlier", 1)).await.unwrap();
        store.set_completed("u1", &earlier.id, true).await.unwrap();

        let all = store.list_tasks("u1", &TaskFilter::default()).await.unwrap();
        assert_eq!(all[0].title, "Earlier");
        assert_eq!(all[1].title, "Later");

        let open = store
            .list_tasks(
                "u1",
                &TaskFilter {
                    completed: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].title, "Later");
    }

    #[tokio::test]
    async fn toggle_updates_status_alongside_the_flag() {
        let store = MemoryStore::new();
        let task = store.create_task("u1", draft("Math HW", 1)).await.unwrap();

        let done = store.set_completed("u1", &task.id, true).await.unwrap();
        assert!(done.is_completed);
        assert_eq!(done.status, TaskStatus::Done);

        let reopened = store.set_completed("u1", &task.id, false).await.unwrap();
        assert!(!reopened.is_completed);
        assert_eq!(reopened.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn profile_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get_profile("u1").await.unwrap().is_none());

        let mut profile = UserProfile::new("u1");
        profile.onboarded = true;
        store.put_profile(profile.clone()).await.unwrap();

        let fetched = store.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(fetched, profile);
    }
}

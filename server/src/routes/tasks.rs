//! Task CRUD, scoped to the authenticated user. Every write is awaited;
//! the XP/streak side of a toggle is awaited too and its failure reported
//! rather than swallowed.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::error;

use studymate_store::{Task, TaskDraft, TaskFilter, TaskUpdate, UserProfile};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.tasks.list_tasks(&user.uid, &filter).await?;
    Ok(Json(tasks))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(draft): Json<TaskDraft>,
) -> Result<Json<Task>, ApiError> {
    let task = state.tasks.create_task(&user.uid, draft).await?;
    Ok(Json(task))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(task_id): Path<String>,
    Json(patch): Json<TaskUpdate>,
) -> Result<Json<Task>, ApiError> {
    let task = state.tasks.update_task(&user.uid, &task_id, patch).await?;
    Ok(Json(task))
}

pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(task_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.tasks.delete_task(&user.uid, &task_id).await?;
    Ok(Json(serde_json::json!({ "deleted": task_id })))
}

/// Response of a completion toggle: the task, plus the profile after the
/// XP/streak update — or `None` when that write failed (the failure is
/// logged, the toggle itself stands).
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub task: Task,
    pub profile: Option<UserProfile>,
}

pub async fn toggle(
    State(state): State<AppState>,
    user: AuthUser,
    Path(task_id): Path<String>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let current = state.tasks.get_task(&user.uid, &task_id).await?;
    let completed = !current.is_completed;
    let task = state
        .tasks
        .set_completed(&user.uid, &task_id, completed)
        .await?;

    let profile = match apply_gamification(&state, &user.uid, completed).await {
        Ok(profile) => Some(profile),
        Err(e) => {
            error!(error = %e, uid = %user.uid, "Failed to update XP/streak after toggle");
            None
        }
    };

    Ok(Json(ToggleResponse { task, profile }))
}

/// Awards or refunds XP and feeds the streak counter for one toggle.
async fn apply_gamification(
    state: &AppState,
    uid: &str,
    completed: bool,
) -> Result<UserProfile, studymate_store::StoreError> {
    let mut profile = state
        .profiles
        .get_profile(uid)
        .await?
        .unwrap_or_else(|| UserProfile::new(uid));

    if completed {
        profile.record_task_completion(Utc::now().date_naive());
    } else {
        profile.revoke_task_completion();
    }

    state.profiles.put_profile(profile.clone()).await?;
    Ok(profile)
}

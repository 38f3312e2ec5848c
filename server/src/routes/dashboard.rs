//! Aggregated reads: the dashboard snapshot and the store-backed weekly
//! feedback action.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use studymate_flows::{WeeklyFeedbackInput, WeeklyFeedbackOutput};
use studymate_store::{Task, TaskFilter, UserProfile, WeeklySummary};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

const UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub todays_tasks: Vec<Task>,
    pub upcoming_deadlines: Vec<Task>,
    pub streak_days: u32,
    pub total_xp: u32,
    pub current_level: u32,
    pub xp_to_next_level: u32,
    pub weekly_completed: usize,
    pub weekly_total: usize,
}

pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let now = Utc::now();
    let tasks = state
        .tasks
        .list_tasks(&user.uid, &TaskFilter::default())
        .await?;
    let profile = state
        .profiles
        .get_profile(&user.uid)
        .await?
        .unwrap_or_else(|| UserProfile::new(&user.uid));

    let today = now.date_naive();
    let todays_tasks: Vec<Task> = tasks
        .iter()
        .filter(|task| task.due_date.date_naive() == today)
        .cloned()
        .collect();
    let upcoming_deadlines: Vec<Task> = tasks
        .iter()
        .filter(|task| task.due_date > now && !task.is_completed)
        .take(UPCOMING_LIMIT)
        .cloned()
        .collect();

    let week = WeeklySummary::from_tasks(&tasks, now);
    let weekly_completed = week.completed.len();
    let weekly_total = week.completed.len() + week.missed.len();

    Ok(Json(DashboardResponse {
        todays_tasks,
        upcoming_deadlines,
        streak_days: profile.streak_days,
        total_xp: profile.total_xp,
        current_level: profile.level(),
        xp_to_next_level: profile.xp_to_next_level(),
        weekly_completed,
        weekly_total,
    }))
}

/// Builds the weekly feedback input from the user's last seven days of
/// tasks and invokes the feedback flow.
pub async fn weekly_feedback(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<WeeklyFeedbackOutput>, ApiError> {
    let tasks = state
        .tasks
        .list_tasks(&user.uid, &TaskFilter::default())
        .await?;
    let week = WeeklySummary::from_tasks(&tasks, Utc::now());

    let input = WeeklyFeedbackInput {
        completed_tasks: week.completed_tasks_text(),
        missed_tasks: week.missed_tasks_text(),
        study_time: week.study_time_text(),
        difficulty_levels: week.difficulty_levels_text(),
    };
    let output = state.gateway.weekly_feedback(&input).await?;
    Ok(Json(output))
}

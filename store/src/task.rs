use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{StoreError, StoreResult};

/// Kind of work a task represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TaskType {
    #[default]
    Assignment,
    Exam,
    Project,
    #[serde(rename = "Study Session")]
    StudySession,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

/// A task record as persisted per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_completed: bool,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

/// Unvalidated task fields as submitted by a form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDraft {
    pub title: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub subject: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub estimated_time: Option<f64>,
    pub description: Option<String>,
}

impl TaskDraft {
    /// Form-level validation: a title and a due date are required, the
    /// enumerated fields are closed sets by construction.
    pub fn validate(&self) -> StoreResult<()> {
        if self.title.trim().is_empty() {
            return Err(StoreError::Validation("Title is required".to_string()));
        }
        if self.due_date.is_none() {
            return Err(StoreError::Validation("A due date is required".to_string()));
        }
        Ok(())
    }

    /// Validates the draft and builds the task record to persist.
    pub fn build(self, id: String, now: DateTime<Utc>) -> StoreResult<Task> {
        self.validate()?;
        let due_date = self
            .due_date
            .ok_or_else(|| StoreError::Validation("A due date is required".to_string()))?;
        Ok(Task {
            id,
            title: self.title.trim().to_string(),
            task_type: self.task_type,
            subject: self.subject.filter(|s| !s.trim().is_empty()),
            due_date,
            priority: self.priority,
            estimated_time: self.estimated_time,
            description: self.description.filter(|s| !s.trim().is_empty()),
            is_completed: false,
            status: TaskStatus::Pending,
            created_at: now,
        })
    }
}

/// Partial update for an existing task; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
    pub subject: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub estimated_time: Option<f64>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    pub fn apply(&self, task: &mut Task) -> StoreResult<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(StoreError::Validation("Title is required".to_string()));
            }
            task.title = title.trim().to_string();
        }
        if let Some(task_type) = self.task_type {
            task.task_type = task_type;
        }
        if let Some(subject) = &self.subject {
            task.subject = Some(subject.clone()).filter(|s| !s.trim().is_empty());
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(estimated_time) = self.estimated_time {
            task.estimated_time = Some(estimated_time);
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone()).filter(|s| !s.trim().is_empty());
        }
        if let Some(status) = self.status {
            task.status = status;
            task.is_completed = status == TaskStatus::Done;
        }
        Ok(())
    }
}

/// Equality/range filter over the due-date and completion fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskFilter {
    pub due_after: Option<DateTime<Utc>>,
    pub due_before: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(after) = self.due_after {
            if task.due_date < after {
                return false;
            }
        }
        if let Some(before) = self.due_before {
            if task.due_date > before {
                return false;
            }
        }
        if let Some(completed) = self.completed {
            if task.is_completed != completed {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft() -> TaskDraft {
        TaskDraft {
            title: "Review Chapter 3 of Biology".to_string(),
            task_type: TaskType::Assignment,
            subject: Some("Biology".to_string()),
            due_date: Some(Utc.with_ymd_and_hms(2024, 8, 15, 12, 0, 0).unwrap()),
            priority: Priority::Medium,
            estimated_time: Some(1.5),
            description: None,
        }
    }

    #[test]
    fn draft_without_title_is_rejected() {
        let mut d = draft();
        d.title = "  ".to_string();
        assert!(matches!(d.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn draft_without_due_date_is_rejected() {
        let mut d = draft();
        d.due_date = None;
        assert!(matches!(d.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn built_task_starts_pending_and_incomplete() {
        let now = Utc.with_ymd_and_hms(2024, 8, 1, 9, 0, 0).unwrap();
        let task = draft().build("task-1".to_string(), now).unwrap();

        assert_eq!(task.id, "task-1");
        assert!(!task.is_completed);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.created_at, now);
    }

    #[test]
    fn task_type_serializes_display_labels() {
        assert_eq!(
            serde_json::to_value(TaskType::StudySession).unwrap(),
            serde_json::json!("Study Session")
        );
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            serde_json::json!("In Progress")
        );
    }

    #[test]
    fn update_marks_done_status_as_completed() {
        let now = Utc.with_ymd_and_hms(2024, 8, 1, 9, 0, 0).unwrap();
        let mut task = draft().build("task-1".to_string(), now).unwrap();

        let update = TaskUpdate {
            status: Some(TaskStatus::Done),
            ..Default::default()
        };
        update.apply(&mut task).unwrap();

        assert!(task.is_completed);
        assert_eq!(task.status, TaskStatus::Done);
    }

    #[test]
    fn filter_applies_range_and_completion() {
        let now = Utc.with_ymd_and_hms(2024, 8, 10, 0, 0, 0).unwrap();
        let task = draft().build("task-1".to_string(), now).unwrap();

        let in_range = TaskFilter {
            due_after: Some(Utc.with_ymd_and_hms(2024, 8, 10, 0, 0, 0).unwrap()),
            due_before: Some(Utc.with_ymd_and_hms(2024, 8, 20, 0, 0, 0).unwrap()),
            completed: Some(false),
        };
        assert!(in_range.matches(&task));

        let wrong_completion = TaskFilter {
            completed: Some(true),
            ..Default::default()
        };
        assert!(!wrong_completion.matches(&task));

        let past_window = TaskFilter {
            due_before: Some(Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(!past_window.matches(&task));
    }
}

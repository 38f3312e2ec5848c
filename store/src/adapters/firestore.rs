use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use crate::errors::{StoreError, StoreResult};
use crate::profile::UserProfile;
use crate::store::{ProfileStore, TaskStore};
use crate::task::{Task, TaskDraft, TaskFilter, TaskStatus, TaskUpdate};

const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Configuration for the Firestore REST backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FirestoreConfig {
    pub project_id: String,
    /// Database id; the service default when unset.
    pub database: Option<String>,
    /// API key for key-authenticated projects.
    pub api_key: Option<String>,
    /// Bearer token minted by the external identity provider.
    pub auth_token: Option<String>,
}

/// Thin REST wrapper over per-user collections:
/// `users/{uid}` holds the profile record, `users/{uid}/tasks` the task
/// documents. No transactions and no locking discipline; concurrent edits
/// resolve last-write-wins in the service.
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    client: Client,
    config: FirestoreConfig,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn database(&self) -> &str {
        self.config.database.as_deref().unwrap_or("(default)")
    }

    fn user_path(&self, uid: &str) -> String {
        format!(
            "projects/{}/databases/{}/documents/users/{}",
            self.config.project_id,
            self.database(),
            uid
        )
    }

    fn user_url(&self, uid: &str) -> String {
        format!("{}/{}", FIRESTORE_BASE_URL, self.user_path(uid))
    }

    fn tasks_url(&self, uid: &str) -> String {
        format!("{}/tasks", self.user_url(uid))
    }

    fn task_url(&self, uid: &str, task_id: &str) -> String {
        format!("{}/tasks/{}", self.user_url(uid), task_id)
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.config.auth_token {
            request.bearer_auth(token)
        } else if let Some(key) = &self.config.api_key {
            request.query(&[("key", key.as_str())])
        } else {
            request
        }
    }

    /// Sends the request and decodes the JSON body; 404 becomes NotFound.
    async fn execute(&self, request: RequestBuilder, what: &str) -> StoreResult<Value> {
        let response = self
            .with_auth(request)
            .send()
            .await
            .map_err(|e| StoreError::Request(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| StoreError::Request(format!("Failed to parse response: {}", e)))
    }
}

// ---- typed-value field encoding ----

fn string_value(value: &str) -> Value {
    json!({ "stringValue": value })
}

fn bool_value(value: bool) -> Value {
    json!({ "booleanValue": value })
}

fn double_value(value: f64) -> Value {
    json!({ "doubleValue": value })
}

fn integer_value(value: u32) -> Value {
    // Firestore encodes integers as strings on the wire.
    json!({ "integerValue": value.to_string() })
}

fn timestamp_value(value: DateTime<Utc>) -> Value {
    json!({ "timestampValue": value.to_rfc3339() })
}

fn enum_label<T: Serialize>(value: &T) -> StoreResult<String> {
    match serde_json::to_value(value)? {
        Value::String(label) => Ok(label),
        other => Err(StoreError::Storage(format!(
            "Expected a string label, got {}",
            other
        ))),
    }
}

fn enum_from_label<T: serde::de::DeserializeOwned>(label: &str) -> StoreResult<T> {
    serde_json::from_value(Value::String(label.to_string()))
        .map_err(|e| StoreError::Storage(format!("Unknown label '{}': {}", label, e)))
}

fn field_str<'a>(fields: &'a Value, name: &str) -> Option<&'a str> {
    fields.get(name)?.get("stringValue")?.as_str()
}

fn field_bool(fields: &Value, name: &str) -> Option<bool> {
    fields.get(name)?.get("booleanValue")?.as_bool()
}

fn field_double(fields: &Value, name: &str) -> Option<f64> {
    let value = fields.get(name)?;
    value
        .get("doubleValue")
        .and_then(Value::as_f64)
        .or_else(|| {
            value
                .get("integerValue")
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok())
        })
}

fn field_integer(fields: &Value, name: &str) -> Option<u32> {
    fields
        .get(name)?
        .get("integerValue")?
        .as_str()?
        .parse()
        .ok()
}

fn field_timestamp(fields: &Value, name: &str) -> Option<DateTime<Utc>> {
    let raw = fields.get(name)?.get("timestampValue")?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Document id: the last segment of the resource name.
fn document_id(document: &Value) -> StoreResult<String> {
    document
        .get("name")
        .and_then(Value::as_str)
        .and_then(|name| name.rsplit('/').next())
        .map(str::to_string)
        .ok_or_else(|| StoreError::Storage("Document has no resource name".to_string()))
}

fn task_to_fields(uid: &str, task: &Task) -> StoreResult<Value> {
    let mut fields = serde_json::Map::new();
    fields.insert("userProfileId".to_string(), string_value(uid));
    fields.insert("title".to_string(), string_value(&task.title));
    fields.insert("type".to_string(), string_value(&enum_label(&task.task_type)?));
    if let Some(subject) = &task.subject {
        fields.insert("subject".to_string(), string_value(subject));
    }
    fields.insert("dueDate".to_string(), timestamp_value(task.due_date));
    fields.insert(
        "priority".to_string(),
        string_value(&enum_label(&task.priority)?),
    );
    if let Some(estimated_time) = task.estimated_time {
        fields.insert("estimatedTime".to_string(), double_value(estimated_time));
    }
    if let Some(description) = &task.description {
        fields.insert("description".to_string(), string_value(description));
    }
    fields.insert("isCompleted".to_string(), bool_value(task.is_completed));
    fields.insert(
        "status".to_string(),
        string_value(&enum_label(&task.status)?),
    );
    fields.insert("createdAt".to_string(), timestamp_value(task.created_at));
    Ok(Value::Object(fields))
}

fn task_from_document(document: &Value) -> StoreResult<Task> {
    let id = document_id(document)?;
    let fields = document
        .get("fields")
        .ok_or_else(|| StoreError::Storage(format!("Task document {} has no fields", id)))?;

    fn missing(id: &str, name: &str) -> StoreError {
        StoreError::Storage(format!("Task {} is missing '{}'", id, name))
    }

    let title = field_str(fields, "title")
        .ok_or_else(|| missing(&id, "title"))?
        .to_string();
    let task_type = enum_from_label(field_str(fields, "type").ok_or_else(|| missing(&id, "type"))?)?;
    let due_date = field_timestamp(fields, "dueDate").ok_or_else(|| missing(&id, "dueDate"))?;
    let priority =
        enum_from_label(field_str(fields, "priority").ok_or_else(|| missing(&id, "priority"))?)?;
    let status = enum_from_label(field_str(fields, "status").unwrap_or("Pending"))?;

    Ok(Task {
        title,
        task_type,
        subject: field_str(fields, "subject").map(str::to_string),
        due_date,
        priority,
        estimated_time: field_double(fields, "estimatedTime"),
        description: field_str(fields, "description").map(str::to_string),
        is_completed: field_bool(fields, "isCompleted").unwrap_or(false),
        status,
        created_at: field_timestamp(fields, "createdAt").unwrap_or_else(Utc::now),
        id,
    })
}

fn profile_to_fields(profile: &UserProfile) -> Value {
    let mut fields = serde_json::Map::new();
    if let Some(display_name) = &profile.display_name {
        fields.insert("displayName".to_string(), string_value(display_name));
    }
    let subjects: Vec<Value> = profile.subjects.iter().map(|s| string_value(s)).collect();
    fields.insert(
        "subjects".to_string(),
        json!({ "arrayValue": { "values": subjects } }),
    );
    fields.insert("totalXp".to_string(), integer_value(profile.total_xp));
    fields.insert("streakDays".to_string(), integer_value(profile.streak_days));
    if let Some(last_completed) = profile.last_completed {
        fields.insert(
            "lastCompleted".to_string(),
            string_value(&last_completed.to_string()),
        );
    }
    fields.insert("onboarded".to_string(), bool_value(profile.onboarded));
    Value::Object(fields)
}

fn profile_from_document(uid: &str, document: &Value) -> UserProfile {
    let fields = document.get("fields").cloned().unwrap_or(Value::Null);

    let subjects = fields
        .get("subjects")
        .and_then(|v| v.get("arrayValue"))
        .and_then(|v| v.get("values"))
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.get("stringValue").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    UserProfile {
        uid: uid.to_string(),
        display_name: field_str(&fields, "displayName").map(str::to_string),
        subjects,
        total_xp: field_integer(&fields, "totalXp").unwrap_or(0),
        streak_days: field_integer(&fields, "streakDays").unwrap_or(0),
        last_completed: field_str(&fields, "lastCompleted")
            .and_then(|raw| raw.parse::<NaiveDate>().ok()),
        onboarded: field_bool(&fields, "onboarded").unwrap_or(false),
    }
}

/// structuredQuery over the tasks collection with the due-date range and
/// completion filters.
fn build_task_query(filter: &TaskFilter) -> Value {
    let mut filters = Vec::new();
    if let Some(after) = filter.due_after {
        filters.push(json!({
            "fieldFilter": {
                "field": { "fieldPath": "dueDate" },
                "op": "GREATER_THAN_OR_EQUAL",
                "value": { "timestampValue": after.to_rfc3339() }
            }
        }));
    }
    if let Some(before) = filter.due_before {
        filters.push(json!({
            "fieldFilter": {
                "field": { "fieldPath": "dueDate" },
                "op": "LESS_THAN_OR_EQUAL",
                "value": { "timestampValue": before.to_rfc3339() }
            }
        }));
    }
    if let Some(completed) = filter.completed {
        filters.push(json!({
            "fieldFilter": {
                "field": { "fieldPath": "isCompleted" },
                "op": "EQUAL",
                "value": { "booleanValue": completed }
            }
        }));
    }

    let mut query = json!({
        "from": [{ "collectionId": "tasks" }],
        "orderBy": [{ "field": { "fieldPath": "dueDate" }, "direction": "ASCENDING" }]
    });
    let where_clause = if filters.len() == 1 {
        filters.pop()
    } else if filters.len() > 1 {
        Some(json!({ "compositeFilter": { "op": "AND", "filters": filters } }))
    } else {
        None
    };
    if let Some(where_clause) = where_clause {
        query["where"] = where_clause;
    }
    json!({ "structuredQuery": query })
}

#[async_trait]
impl TaskStore for FirestoreStore {
    async fn create_task(&self, uid: &str, draft: TaskDraft) -> StoreResult<Task> {
        let task = draft.build(Uuid::new_v4().to_string(), Utc::now())?;
        let body = json!({ "fields": task_to_fields(uid, &task)? });

        let request = self
            .client
            .post(self.tasks_url(uid))
            .query(&[("documentId", task.id.as_str())])
            .json(&body);
        let document = self.execute(request, &task.id).await?;
        debug!(uid, task_id = %task.id, "Created task");

        task_from_document(&document)
    }

    async fn get_task(&self, uid: &str, task_id: &str) -> StoreResult<Task> {
        let request = self.client.get(self.task_url(uid, task_id));
        let document = self.execute(request, task_id).await?;
        task_from_document(&document)
    }

    async fn list_tasks(&self, uid: &str, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let request = self
            .client
            .post(format!("{}:runQuery", self.user_url(uid)))
            .json(&build_task_query(filter));
        let results = self.execute(request, "tasks").await?;

        let mut tasks = Vec::new();
        for entry in results.as_array().into_iter().flatten() {
            if let Some(document) = entry.get("document") {
                tasks.push(task_from_document(document)?);
            }
        }
        Ok(tasks)
    }

    async fn update_task(&self, uid: &str, task_id: &str, update: TaskUpdate) -> StoreResult<Task> {
        // Read-modify-write; the service resolves concurrent writers
        // last-write-wins.
        let mut task = self.get_task(uid, task_id).await?;
        update.apply(&mut task)?;

        let body = json!({ "fields": task_to_fields(uid, &task)? });
        let request = self.client.patch(self.task_url(uid, task_id)).json(&body);
        let document = self.execute(request, task_id).await?;
        task_from_document(&document)
    }

    async fn set_completed(&self, uid: &str, task_id: &str, completed: bool) -> StoreResult<Task> {
        let mut task = self.get_task(uid, task_id).await?;
        task.is_completed = completed;
        task.status = if completed {
            TaskStatus::Done
        } else {
            TaskStatus::Pending
        };

        let body = json!({ "fields": task_to_fields(uid, &task)? });
        let request = self.client.patch(self.task_url(uid, task_id)).json(&body);
        let document = self.execute(request, task_id).await?;
        task_from_document(&document)
    }

    async fn delete_task(&self, uid: &str, task_id: &str) -> StoreResult<()> {
        let request = self.client.delete(self.task_url(uid, task_id));
        self.execute(request, task_id).await?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for FirestoreStore {
    async fn get_profile(&self, uid: &str) -> StoreResult<Option<UserProfile>> {
        let request = self.client.get(self.user_url(uid));
        match self.execute(request, uid).await {
            Ok(document) => Ok(Some(profile_from_document(uid, &document))),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn put_profile(&self, profile: UserProfile) -> StoreResult<()> {
        let body = json!({ "fields": profile_to_fields(&profile) });
        let request = self.client.patch(self.user_url(&profile.uid)).json(&body);
        self.execute(request, &profile.uid).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Priority, TaskType};
    use chrono::TimeZone;

    fn sample_task() -> Task {
        Task {
            id: "task-1".to_string(),
            title: "Physics project proposal".to_string(),
            task_type: TaskType::StudySession,
            subject: Some("Physics".to_string()),
            due_date: Utc.with_ymd_and_hms(2024, 8, 22, 10, 0, 0).unwrap(),
            priority: Priority::High,
            estimated_time: Some(2.5),
            description: None,
            is_completed: false,
            status: TaskStatus::InProgress,
            created_at: Utc.with_ymd_and_hms(2024, 8, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn task_round_trips_through_document_fields() {
        let task = sample_task();
        let fields = task_to_fields("u1", &task).unwrap();
        let document = json!({
            "name": "projects/p/databases/(default)/documents/users/u1/tasks/task-1",
            "fields": fields,
        });

        let decoded = task_from_document(&document).unwrap();
        assert_eq!(decoded, task);
    }

    #[test]
    fn enum_labels_match_the_form_values() {
        let fields = task_to_fields("u1", &sample_task()).unwrap();
        assert_eq!(fields["type"]["stringValue"], "Study Session");
        assert_eq!(fields["status"]["stringValue"], "In Progress");
        assert_eq!(fields["priority"]["stringValue"], "High");
        assert_eq!(fields["userProfileId"]["stringValue"], "u1");
    }

    #[test]
    fn profile_round_trips_through_document_fields() {
        let mut profile = UserProfile::new("u1");
        profile.display_name = Some("Sam".to_string());
        profile.subjects = vec!["Biology".to_string(), "Math".to_string()];
        profile.total_xp = 540;
        profile.streak_days = 23;
        profile.last_completed = NaiveDate::from_ymd_opt(2024, 8, 10);
        profile.onboarded = true;

        let document = json!({
            "name": "projects/p/databases/(default)/documents/users/u1",
            "fields": profile_to_fields(&profile),
        });
        let decoded = profile_from_document("u1", &document);
        assert_eq!(decoded, profile);
    }

    #[test]
    fn query_combines_range_and_equality_filters() {
        let filter = TaskFilter {
            due_after: Some(Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap()),
            due_before: Some(Utc.with_ymd_and_hms(2024, 8, 8, 0, 0, 0).unwrap()),
            completed: Some(false),
        };
        let query = build_task_query(&filter);

        let composite = &query["structuredQuery"]["where"]["compositeFilter"];
        assert_eq!(composite["op"], "AND");
        assert_eq!(composite["filters"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn unfiltered_query_has_no_where_clause() {
        let query = build_task_query(&TaskFilter::default());
        assert!(query["structuredQuery"].get("where").is_none());
        assert_eq!(
            query["structuredQuery"]["from"][0]["collectionId"],
            "tasks"
        );
    }

    #[test]
    fn single_filter_is_not_wrapped_in_a_composite() {
        let filter = TaskFilter {
            completed: Some(true),
            ..Default::default()
        };
        let query = build_task_query(&filter);
        let where_clause = &query["structuredQuery"]["where"];
        assert!(where_clause.get("fieldFilter").is_some());
        assert!(where_clause.get("compositeFilter").is_none());
    }
}

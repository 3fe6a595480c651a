use super::{ApiClient, ApiResult, Params, Progress, RequestOptions, parse_timestamp, path_segment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use urlencoding::encode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    Construction,
    Inspection,
    Maintenance,
    Repair,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub company_id: String,
    pub project_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: TaskType,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to: Option<String>,
    pub created_by: Option<String>,
    pub due_date: Option<String>,
    pub completed_at: Option<String>,
    #[serde(default)]
    pub progress: f64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Task {
    /// Past its due date and not yet finished. Tasks without a readable due
    /// date are never overdue.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        if matches!(self.status, TaskStatus::Completed | TaskStatus::Cancelled) {
            return false;
        }
        self.due_date
            .as_deref()
            .and_then(parse_timestamp)
            .is_some_and(|due| due < now)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TaskType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,
}

/// Body of `POST /api/tasks/search`. Every field narrows the result.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TaskType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_recurring: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_template: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_progress_percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_progress_percentage: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskStats {
    pub total_tasks: u64,
    pub todo_tasks: u64,
    pub in_progress_tasks: u64,
    pub completed_tasks: u64,
    pub cancelled_tasks: u64,
    pub on_hold_tasks: u64,
    pub closed_tasks: u64,
    pub overdue_tasks: u64,
    pub tasks_by_type: HashMap<String, u64>,
    pub tasks_by_priority: HashMap<String, u64>,
    pub tasks_by_status: HashMap<String, u64>,
    pub average_resolution_time_hours: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignRequest<'a> {
    user_id: &'a str,
}

#[derive(Debug, Serialize)]
struct ProgressUpdate {
    progress: Progress,
}

pub struct TasksApi {
    client: ApiClient,
}

impl TasksApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create_task(&self, input: &TaskInput) -> ApiResult<Task> {
        self.client.post("/api/tasks", input).await
    }

    pub async fn get_task(&self, task_id: &str) -> ApiResult<Task> {
        let endpoint = format!("/api/tasks/{}", encode(task_id));
        self.client.get(&endpoint).await
    }

    pub async fn company_tasks(&self, company_id: &str) -> ApiResult<Vec<Task>> {
        let endpoint = format!("/api/tasks/company/{}", encode(company_id));
        self.client.get(&endpoint).await
    }

    pub async fn project_tasks(&self, project_id: &str) -> ApiResult<Vec<Task>> {
        let endpoint = format!("/api/tasks/project/{}", encode(project_id));
        self.client.get(&endpoint).await
    }

    pub async fn tasks_by_creator(&self, user_id: &str) -> ApiResult<Vec<Task>> {
        let endpoint = format!("/api/tasks/creator/{}", encode(user_id));
        self.client.get(&endpoint).await
    }

    pub async fn assigned_tasks(&self, user_id: &str) -> ApiResult<Vec<Task>> {
        let endpoint = format!("/api/tasks/assigned/{}", encode(user_id));
        self.client.get(&endpoint).await
    }

    pub async fn tasks_by_status(&self, company_id: &str, status: TaskStatus) -> ApiResult<Vec<Task>> {
        let endpoint = format!(
            "/api/tasks/company/{}/status/{}",
            encode(company_id),
            path_segment(&status)?,
        );
        self.client.get(&endpoint).await
    }

    pub async fn tasks_by_priority(
        &self,
        company_id: &str,
        priority: TaskPriority,
    ) -> ApiResult<Vec<Task>> {
        let endpoint = format!(
            "/api/tasks/company/{}/priority/{}",
            encode(company_id),
            path_segment(&priority)?,
        );
        self.client.get(&endpoint).await
    }

    pub async fn tasks_by_type(&self, company_id: &str, kind: TaskType) -> ApiResult<Vec<Task>> {
        let endpoint = format!(
            "/api/tasks/company/{}/type/{}",
            encode(company_id),
            path_segment(&kind)?,
        );
        self.client.get(&endpoint).await
    }

    pub async fn subtasks(&self, task_id: &str) -> ApiResult<Vec<Task>> {
        let endpoint = format!("/api/tasks/{}/subtasks", encode(task_id));
        self.client.get(&endpoint).await
    }

    pub async fn overdue_tasks(&self, company_id: &str) -> ApiResult<Vec<Task>> {
        let endpoint = format!("/api/tasks/company/{}/overdue", encode(company_id));
        self.client.get(&endpoint).await
    }

    pub async fn recurring_tasks(&self, company_id: &str) -> ApiResult<Vec<Task>> {
        let endpoint = format!("/api/tasks/company/{}/recurring", encode(company_id));
        self.client.get(&endpoint).await
    }

    pub async fn task_templates(&self, company_id: &str) -> ApiResult<Vec<Task>> {
        let endpoint = format!("/api/tasks/company/{}/templates", encode(company_id));
        self.client.get(&endpoint).await
    }

    pub async fn search_tasks(&self, search: &TaskSearch) -> ApiResult<Vec<Task>> {
        self.client.post("/api/tasks/search", search).await
    }

    pub async fn update_task(&self, task_id: &str, input: &TaskInput) -> ApiResult<Task> {
        let endpoint = format!("/api/tasks/{}", encode(task_id));
        self.client.put(&endpoint, input).await
    }

    pub async fn assign_task(&self, task_id: &str, user_id: &str) -> ApiResult<Task> {
        let endpoint = format!("/api/tasks/{}/assign", encode(task_id));
        self.client.put(&endpoint, &AssignRequest { user_id }).await
    }

    pub async fn update_progress(&self, task_id: &str, progress: Progress) -> ApiResult<Task> {
        let endpoint = format!("/api/tasks/{}/progress", encode(task_id));
        self.client.put(&endpoint, &ProgressUpdate { progress }).await
    }

    pub async fn complete_task(&self, task_id: &str) -> ApiResult<Task> {
        let endpoint = format!("/api/tasks/{}/complete", encode(task_id));
        self.client.put_empty(&endpoint).await
    }

    pub async fn delete_task(&self, task_id: &str, hard_delete: bool) -> ApiResult<()> {
        let endpoint = format!("/api/tasks/{}", encode(task_id));
        let params = Params::new().set("hardDelete", hard_delete);
        self.client
            .send(&endpoint, RequestOptions::delete().with_params(params))
            .await
    }

    pub async fn task_stats(&self, company_id: &str) -> ApiResult<TaskStats> {
        let endpoint = format!("/api/tasks/company/{}/stats", encode(company_id));
        self.client.get(&endpoint).await
    }
}

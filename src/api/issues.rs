use super::{ApiClient, ApiError, ApiResult, Params, RequestOptions, path_segment};
use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use urlencoding::encode;

/// The issue service identifies the acting user through this header.
const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    Open,
    InProgress,
    UnderReview,
    Resolved,
    Closed,
    Reopened,
    OnHold,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCategory {
    Technical,
    Operational,
    Financial,
    Hr,
    Safety,
    Quality,
    CustomerService,
    Equipment,
    Inventory,
    Facility,
    Compliance,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    Bug,
    FeatureRequest,
    Improvement,
    Question,
    Complaint,
    Maintenance,
    Incident,
    Task,
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub user_id: Option<String>,
    pub company_id: String,
    pub assigned_to: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub category: IssueCategory,
    pub status: IssueStatus,
    #[serde(rename = "type")]
    pub kind: IssueType,
    pub project_id: Option<String>,
    pub task_id: Option<String>,
    pub asset_id: Option<String>,
    pub resolution: Option<String>,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<String>,
    pub due_date: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    pub title: String,
    pub company_id: String,
    pub category: IssueCategory,
    #[serde(rename = "type")]
    pub kind: IssueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<IssueCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IssueStatus>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<IssueType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<IssueCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IssueStatus>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<IssueType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date_before: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueStats {
    pub total_issues: u64,
    pub open_issues: u64,
    pub in_progress_issues: u64,
    pub resolved_issues: u64,
    pub closed_issues: u64,
    pub overdue_issues: u64,
    pub issues_by_category: HashMap<String, u64>,
    pub issues_by_type: HashMap<String, u64>,
    pub issues_by_priority: HashMap<String, u64>,
    pub issues_by_status: HashMap<String, u64>,
    pub average_resolution_time_hours: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignRequest<'a> {
    assigned_to: &'a str,
}

#[derive(Debug, Serialize)]
struct ResolveRequest<'a> {
    resolution: &'a str,
}

fn acting_user(user_id: &str) -> ApiResult<(HeaderName, HeaderValue)> {
    let value = HeaderValue::from_str(user_id)
        .map_err(|_| ApiError::Validation(format!("Invalid user id: {}", user_id)))?;
    Ok((HeaderName::from_static(USER_ID_HEADER), value))
}

pub struct IssuesApi {
    client: ApiClient,
}

impl IssuesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Files an issue on behalf of `user_id`.
    pub async fn create_issue(&self, issue: &NewIssue, user_id: &str) -> ApiResult<Issue> {
        let (name, value) = acting_user(user_id)?;
        let options = RequestOptions::post().with_json(issue)?.with_header(name, value);
        self.client.request("/api/issues", options).await
    }

    pub async fn get_issue(&self, issue_id: &str) -> ApiResult<Issue> {
        let endpoint = format!("/api/issues/{}", encode(issue_id));
        self.client.get(&endpoint).await
    }

    pub async fn company_issues(&self, company_id: &str) -> ApiResult<Vec<Issue>> {
        let endpoint = format!("/api/issues/company/{}", encode(company_id));
        self.client.get(&endpoint).await
    }

    pub async fn user_issues(&self, user_id: &str) -> ApiResult<Vec<Issue>> {
        let endpoint = format!("/api/issues/user/{}", encode(user_id));
        self.client.get(&endpoint).await
    }

    pub async fn assigned_issues(&self, user_id: &str) -> ApiResult<Vec<Issue>> {
        let endpoint = format!("/api/issues/assigned/{}", encode(user_id));
        self.client.get(&endpoint).await
    }

    pub async fn issues_by_status(&self, company_id: &str, status: IssueStatus) -> ApiResult<Vec<Issue>> {
        let endpoint = format!(
            "/api/issues/company/{}/status/{}",
            encode(company_id),
            path_segment(&status)?,
        );
        self.client.get(&endpoint).await
    }

    pub async fn project_issues(&self, project_id: &str) -> ApiResult<Vec<Issue>> {
        let endpoint = format!("/api/issues/project/{}", encode(project_id));
        self.client.get(&endpoint).await
    }

    pub async fn task_issues(&self, task_id: &str) -> ApiResult<Vec<Issue>> {
        let endpoint = format!("/api/issues/task/{}", encode(task_id));
        self.client.get(&endpoint).await
    }

    pub async fn overdue_issues(&self, company_id: &str) -> ApiResult<Vec<Issue>> {
        let endpoint = format!("/api/issues/company/{}/overdue", encode(company_id));
        self.client.get(&endpoint).await
    }

    pub async fn search_issues(&self, search: &IssueSearch) -> ApiResult<Vec<Issue>> {
        self.client.post("/api/issues/search", search).await
    }

    pub async fn update_issue(&self, issue_id: &str, update: &IssueUpdate) -> ApiResult<Issue> {
        let endpoint = format!("/api/issues/{}", encode(issue_id));
        self.client.put(&endpoint, update).await
    }

    pub async fn assign_issue(&self, issue_id: &str, assigned_to: &str) -> ApiResult<Issue> {
        let endpoint = format!("/api/issues/{}/assign", encode(issue_id));
        self.client.put(&endpoint, &AssignRequest { assigned_to }).await
    }

    pub async fn resolve_issue(
        &self,
        issue_id: &str,
        resolution: &str,
        user_id: &str,
    ) -> ApiResult<Issue> {
        let endpoint = format!("/api/issues/{}/resolve", encode(issue_id));
        let (name, value) = acting_user(user_id)?;
        let options = RequestOptions::put()
            .with_json(&ResolveRequest { resolution })?
            .with_header(name, value);
        self.client.request(&endpoint, options).await
    }

    pub async fn close_issue(&self, issue_id: &str) -> ApiResult<Issue> {
        let endpoint = format!("/api/issues/{}/close", encode(issue_id));
        self.client.put_empty(&endpoint).await
    }

    pub async fn reopen_issue(&self, issue_id: &str) -> ApiResult<Issue> {
        let endpoint = format!("/api/issues/{}/reopen", encode(issue_id));
        self.client.put_empty(&endpoint).await
    }

    pub async fn delete_issue(&self, issue_id: &str, hard_delete: bool) -> ApiResult<()> {
        let endpoint = format!("/api/issues/{}", encode(issue_id));
        let params = Params::new().set("hardDelete", hard_delete);
        self.client
            .send(&endpoint, RequestOptions::delete().with_params(params))
            .await
    }

    pub async fn issue_stats(&self, company_id: &str) -> ApiResult<IssueStats> {
        let endpoint = format!("/api/issues/company/{}/stats", encode(company_id));
        self.client.get(&endpoint).await
    }
}

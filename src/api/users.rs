use super::{ApiClient, ApiResult, FilePart, Params, RequestOptions, path_segment};
use serde::{Deserialize, Serialize};
use urlencoding::encode;

const DEFAULT_TOP_WORKERS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub keycloak_id: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub profile_image_url: Option<String>,
    pub city: Option<String>,
    pub specialty: Option<String>,
    pub status: UserStatus,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerProfile {
    pub id: String,
    pub user_id: String,
    pub specialty: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub is_available: bool,
    pub available_from: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub completed_projects: u32,
    #[serde(default)]
    pub performance_score: f64,
    pub years_of_experience: Option<u32>,
}

/// A user together with their worker profile.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    #[serde(flatten)]
    pub user: User,
    pub worker_profile: Option<WorkerProfile>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerProfileInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_from: Option<String>,
}

/// Query for `GET /api/workers/search`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerSearch {
    pub specialty: Option<String>,
    pub city: Option<String>,
    pub is_available: Option<bool>,
    pub min_rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_time: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkerStats {
    pub worker_id: Option<String>,
    pub full_name: Option<String>,
    pub specialty: Option<String>,
    pub rating: Option<f64>,
    pub completed_tasks: u32,
    pub total_work_days: u32,
    pub on_time_completion_count: u32,
    pub late_completion_count: u32,
    pub reliability_score: Option<f64>,
    pub active_project_count: u32,
    pub is_available: Option<bool>,
    pub experience_years: Option<u32>,
    pub certifications: Vec<String>,
}

pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_user(&self, user_id: &str) -> ApiResult<User> {
        let endpoint = format!("/api/users/{}", encode(user_id));
        self.client.get(&endpoint).await
    }

    pub async fn user_profile(&self, user_id: &str) -> ApiResult<User> {
        let endpoint = format!("/api/users/{}/profile", encode(user_id));
        self.client.get(&endpoint).await
    }

    pub async fn update_user(&self, user_id: &str, changes: &UserUpdate) -> ApiResult<User> {
        let endpoint = format!("/api/users/{}", encode(user_id));
        self.client.put(&endpoint, changes).await
    }

    pub async fn upload_avatar(&self, user_id: &str, file: FilePart) -> ApiResult<User> {
        let endpoint = format!("/api/users/{}/avatar", encode(user_id));
        self.client
            .upload(&endpoint, file.into_form()?, Params::new())
            .await
    }

    pub async fn create_worker_profile(
        &self,
        user_id: &str,
        input: &WorkerProfileInput,
    ) -> ApiResult<WorkerProfile> {
        let endpoint = format!("/api/users/{}/worker-profile", encode(user_id));
        self.client.post(&endpoint, input).await
    }

    pub async fn search_users(
        &self,
        keyword: Option<&str>,
        status: Option<UserStatus>,
    ) -> ApiResult<Vec<User>> {
        let status = status.map(|s| path_segment(&s)).transpose()?;
        let params = Params::new()
            .set_opt("keyword", keyword)
            .set_opt("status", status);
        self.client.get_with("/api/users/search", params).await
    }

    pub async fn delete_user(&self, user_id: &str) -> ApiResult<()> {
        let endpoint = format!("/api/users/{}", encode(user_id));
        self.client.send(&endpoint, RequestOptions::delete()).await
    }
}

pub struct WorkersApi {
    client: ApiClient,
}

impl WorkersApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn search_workers(&self, search: &WorkerSearch) -> ApiResult<Vec<Worker>> {
        self.client
            .get_with("/api/workers/search", Params::from_serialize(search)?)
            .await
    }

    pub async fn company_workers(&self, company_id: &str) -> ApiResult<Vec<Worker>> {
        let endpoint = format!("/api/workers/company/{}", encode(company_id));
        self.client.get(&endpoint).await
    }

    pub async fn update_availability(
        &self,
        worker_id: &str,
        is_available: bool,
        available_from: Option<&str>,
    ) -> ApiResult<Worker> {
        let endpoint = format!("/api/workers/{}/availability", encode(worker_id));
        let params = Params::new()
            .set("isAvailable", is_available)
            .set_opt("availableFrom", available_from);
        self.client.patch_with(&endpoint, params).await
    }

    pub async fn add_performance(&self, worker_id: &str, input: &PerformanceInput) -> ApiResult<()> {
        let endpoint = format!("/api/workers/{}/performance", encode(worker_id));
        self.client
            .send(&endpoint, RequestOptions::post().with_json(input)?)
            .await
    }

    pub async fn assign_to_project(&self, worker_id: &str, project_id: &str) -> ApiResult<()> {
        let endpoint = format!(
            "/api/workers/{}/projects/{}",
            encode(worker_id),
            encode(project_id),
        );
        self.client.send(&endpoint, RequestOptions::post()).await
    }

    pub async fn remove_from_project(&self, worker_id: &str, project_id: &str) -> ApiResult<()> {
        let endpoint = format!(
            "/api/workers/{}/projects/{}",
            encode(worker_id),
            encode(project_id),
        );
        self.client.send(&endpoint, RequestOptions::delete()).await
    }

    /// Best-rated workers, ten unless `limit` says otherwise.
    pub async fn top_workers(
        &self,
        specialty: Option<&str>,
        limit: Option<u32>,
    ) -> ApiResult<Vec<Worker>> {
        let params = Params::new()
            .set_opt("specialty", specialty)
            .set("limit", limit.unwrap_or(DEFAULT_TOP_WORKERS));
        self.client.get_with("/api/workers/top", params).await
    }

    pub async fn worker_stats(&self, worker_id: &str) -> ApiResult<WorkerStats> {
        let endpoint = format!("/api/workers/{}/stats", encode(worker_id));
        self.client.get(&endpoint).await
    }

    pub async fn available_workers(
        &self,
        city: Option<&str>,
        specialty: Option<&str>,
    ) -> ApiResult<Vec<Worker>> {
        let params = Params::new()
            .set_opt("city", city)
            .set_opt("specialty", specialty);
        self.client.get_with("/api/workers/available", params).await
    }
}

use super::{ApiClient, ApiResult, Page, PageParams, Progress, RequestOptions};
use serde::{Deserialize, Serialize};
use urlencoding::encode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    Completed,
    OnHold,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseStatus {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub progress: f64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub estimated_completion_date: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPhase {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: PhaseStatus,
    #[serde(default)]
    pub progress: f64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub order: u32,
}

/// Body for create, full update and partial update. Unset fields are not
/// sent, so a PATCH only touches what is filled in.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_completion_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProgress {
    pub phase_id: Option<serde_json::Value>,
    pub phase_name: Option<String>,
    pub current_progress: Option<f64>,
    pub status: Option<PhaseStatus>,
    pub days_remaining: Option<i32>,
    pub is_delayed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    #[serde(alias = "progress")]
    pub overall_progress: f64,
    pub total_phases: Option<u32>,
    pub completed_phases: Option<u32>,
    pub in_progress_phases: Option<u32>,
    #[serde(default)]
    pub phase_progresses: Vec<PhaseProgress>,
}

#[derive(Debug, Serialize)]
struct ProgressUpdate {
    progress: Progress,
}

pub struct ProjectsApi {
    client: ApiClient,
}

impl ProjectsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create_project(&self, input: &ProjectInput) -> ApiResult<Project> {
        self.client.post("/api/projects", input).await
    }

    pub async fn list_projects(&self, page: &PageParams) -> ApiResult<Page<Project>> {
        self.client.get_with("/api/projects", page.to_params()?).await
    }

    pub async fn get_project(&self, project_id: &str) -> ApiResult<Project> {
        let endpoint = format!("/api/projects/{}", encode(project_id));
        self.client.get(&endpoint).await
    }

    pub async fn update_project(&self, project_id: &str, input: &ProjectInput) -> ApiResult<Project> {
        let endpoint = format!("/api/projects/{}", encode(project_id));
        self.client.put(&endpoint, input).await
    }

    pub async fn patch_project(&self, project_id: &str, input: &ProjectInput) -> ApiResult<Project> {
        let endpoint = format!("/api/projects/{}", encode(project_id));
        self.client.patch(&endpoint, input).await
    }

    pub async fn delete_project(&self, project_id: &str) -> ApiResult<()> {
        let endpoint = format!("/api/projects/{}", encode(project_id));
        self.client.send(&endpoint, RequestOptions::delete()).await
    }

    pub async fn project_progress(&self, project_id: &str) -> ApiResult<ProjectProgress> {
        let endpoint = format!("/api/projects/{}/progress", encode(project_id));
        self.client.get(&endpoint).await
    }

    pub async fn projects_for_map(&self) -> ApiResult<Vec<Project>> {
        self.client.get("/api/projects/map").await
    }

    pub async fn company_projects(&self, company_id: &str) -> ApiResult<Vec<Project>> {
        let endpoint = format!("/api/projects/company/{}", encode(company_id));
        self.client.get(&endpoint).await
    }

    pub async fn create_phase(&self, project_id: &str, input: &PhaseInput) -> ApiResult<ProjectPhase> {
        let endpoint = format!("/api/projects/{}/phases", encode(project_id));
        self.client.post(&endpoint, input).await
    }

    pub async fn update_phase_progress(
        &self,
        project_id: &str,
        phase_id: &str,
        progress: Progress,
    ) -> ApiResult<ProjectPhase> {
        let endpoint = format!(
            "/api/projects/{}/phases/{}/progress",
            encode(project_id),
            encode(phase_id),
        );
        self.client.patch(&endpoint, &ProgressUpdate { progress }).await
    }

    pub async fn delete_phase(&self, project_id: &str, phase_id: &str) -> ApiResult<()> {
        let endpoint = format!("/api/projects/{}/phases/{}", encode(project_id), encode(phase_id));
        self.client.send(&endpoint, RequestOptions::delete()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockGateway, Stub};
    use serde_json::json;

    fn project_json(id: &str, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "companyId": "c-1",
            "name": "Tower A",
            "status": status,
            "progress": 35,
            "city": "Istanbul",
            "createdAt": "2024-03-01T09:00:00",
            "updatedAt": "2024-03-02T09:00:00"
        })
    }

    #[actix_web::test]
    async fn patch_sends_only_filled_fields() {
        let gateway = MockGateway::start().await;
        gateway.stub("PATCH", "/api/projects/p-1", Stub::json(200, project_json("p-1", "ON_HOLD")));
        let api = ProjectsApi::new(gateway.client());

        let input = ProjectInput {
            status: Some(ProjectStatus::OnHold),
            ..ProjectInput::default()
        };
        let project = api.patch_project("p-1", &input).await.unwrap();

        assert_eq!(project.status, ProjectStatus::OnHold);
        let request = gateway.last_request();
        assert_eq!(request.method, "PATCH");
        assert_eq!(request.json(), json!({"status": "ON_HOLD"}));
    }

    #[actix_web::test]
    async fn phase_progress_is_patched() {
        let gateway = MockGateway::start().await;
        gateway.stub(
            "PATCH",
            "/api/projects/p-1/phases/ph-2/progress",
            Stub::json(
                200,
                json!({
                    "id": "ph-2",
                    "projectId": "p-1",
                    "name": "Foundation",
                    "status": "IN_PROGRESS",
                    "progress": 40,
                    "order": 2
                }),
            ),
        );
        let api = ProjectsApi::new(gateway.client());

        let phase = api
            .update_phase_progress("p-1", "ph-2", Progress::new(40).unwrap())
            .await
            .unwrap();

        assert_eq!(phase.status, PhaseStatus::InProgress);
        assert_eq!(phase.order, 2);
        assert_eq!(gateway.last_request().json(), json!({"progress": 40}));
    }

    #[actix_web::test]
    async fn company_projects_are_listed() {
        let gateway = MockGateway::start().await;
        gateway.stub(
            "GET",
            "/api/projects/company/c-1",
            Stub::json(200, json!([project_json("p-1", "PLANNING"), project_json("p-2", "COMPLETED")])),
        );
        let api = ProjectsApi::new(gateway.client());

        let projects = api.company_projects("c-1").await.unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[1].status, ProjectStatus::Completed);
        assert_eq!(projects[0].city.as_deref(), Some("Istanbul"));
    }

    #[actix_web::test]
    async fn delete_propagates_gateway_error() {
        let gateway = MockGateway::start().await;
        gateway.stub(
            "DELETE",
            "/api/projects/p-9",
            Stub::json(403, json!({"message": "Not allowed"})),
        );
        let api = ProjectsApi::new(gateway.client());

        let err = api.delete_project("p-9").await.unwrap_err();
        assert_eq!(err.to_string(), "Not allowed");
        assert_eq!(err.status(), Some(403));
    }
}

use crate::api::projects::{Project, ProjectStatus, ProjectsApi};
use crate::api::tasks::{Task, TasksApi};
use crate::api::users::{Worker, WorkersApi};
use crate::api::{ApiClient, ApiResult, PageParams};
use futures_util::future::join3;
use serde::Serialize;
use tracing::warn;

const PROJECT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_projects: usize,
    pub total_tasks: usize,
    pub total_workers: usize,
    pub completed_units: usize,
}

/// Everything the dashboard view shows, fetched in one go.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub workers: Vec<Worker>,
}

fn or_empty<T: Default>(what: &str, result: ApiResult<T>) -> T {
    result.unwrap_or_else(|e| {
        warn!("Failed to load {}: {}", what, e);
        T::default()
    })
}

/// Loads projects, company tasks and company workers concurrently. A failed
/// fetch counts as empty so the rest still shows.
pub async fn load_dashboard(client: &ApiClient, company_id: &str) -> Dashboard {
    let projects_api = ProjectsApi::new(client.clone());
    let tasks_api = TasksApi::new(client.clone());
    let workers_api = WorkersApi::new(client.clone());
    let first_page = PageParams::new(0, PROJECT_PAGE_SIZE);

    let (projects, tasks, workers) = join3(
        projects_api.list_projects(&first_page),
        tasks_api.company_tasks(company_id),
        workers_api.company_workers(company_id),
    )
    .await;

    let projects = or_empty("projects", projects.map(|page| page.content));
    let tasks = or_empty("tasks", tasks);
    let workers = or_empty("workers", workers);

    let stats = DashboardStats {
        active_projects: projects
            .iter()
            .filter(|project| project.status == ProjectStatus::InProgress)
            .count(),
        total_tasks: tasks.len(),
        total_workers: workers.len(),
        // unit totals are not fetched for the dashboard
        completed_units: 0,
    };

    Dashboard {
        stats,
        projects,
        tasks,
        workers,
    }
}

/// Counts only, for callers that do not need the lists.
pub async fn load_dashboard_stats(client: &ApiClient, company_id: &str) -> DashboardStats {
    load_dashboard(client, company_id).await.stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockGateway, Stub};
    use serde_json::json;

    fn project(id: &str, status: &str) -> serde_json::Value {
        json!({"id": id, "companyId": "c-1", "name": id, "status": status, "progress": 10})
    }

    fn task(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "companyId": "c-1",
            "title": id,
            "type": "OTHER",
            "status": "PENDING",
            "priority": "LOW"
        })
    }

    fn worker(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "email": format!("{}@strux.az", id),
            "firstName": "W",
            "lastName": id,
            "status": "ACTIVE"
        })
    }

    #[actix_web::test]
    async fn counts_come_from_all_three_sources() {
        let gateway = MockGateway::start().await;
        gateway.stub(
            "GET",
            "/api/projects",
            Stub::json(
                200,
                json!({
                    "content": [
                        project("p-1", "IN_PROGRESS"),
                        project("p-2", "IN_PROGRESS"),
                        project("p-3", "PLANNING")
                    ],
                    "totalElements": 3,
                    "totalPages": 1,
                    "size": 100,
                    "number": 0
                }),
            ),
        );
        gateway.stub("GET", "/api/tasks/company/c-1", Stub::json(200, json!([task("t-1")])));
        gateway.stub(
            "GET",
            "/api/workers/company/c-1",
            Stub::json(200, json!([worker("w-1"), worker("w-2")])),
        );

        let stats = load_dashboard_stats(&gateway.client(), "c-1").await;

        assert_eq!(
            stats,
            DashboardStats {
                active_projects: 2,
                total_tasks: 1,
                total_workers: 2,
                completed_units: 0,
            }
        );
        let project_request = gateway
            .requests()
            .into_iter()
            .find(|r| r.path == "/api/projects")
            .unwrap();
        assert_eq!(project_request.query, "page=0&size=100");
    }

    #[actix_web::test]
    async fn failed_fetch_falls_back_to_empty() {
        let gateway = MockGateway::start().await;
        gateway.stub("GET", "/api/projects", Stub::json(500, json!({"message": "down"})));
        gateway.stub(
            "GET",
            "/api/tasks/company/c-1",
            Stub::json(200, json!([task("t-1"), task("t-2")])),
        );
        // workers left unstubbed: the mock answers 404

        let dashboard = load_dashboard(&gateway.client(), "c-1").await;

        assert!(dashboard.projects.is_empty());
        assert!(dashboard.workers.is_empty());
        assert_eq!(dashboard.stats.total_tasks, 2);
        assert_eq!(dashboard.stats.active_projects, 0);
        assert_eq!(gateway.requests().len(), 3);
    }
}

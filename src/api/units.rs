use super::{ApiClient, ApiResult, Params, Progress, RequestOptions, path_segment};
use serde::{Deserialize, Serialize};
use urlencoding::encode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    Studio,
    OneBedroom,
    TwoBedroom,
    ThreeBedroom,
    Penthouse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitStatus {
    NotStarted,
    InProgress,
    Completed,
    Delayed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    Available,
    Reserved,
    Sold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkItemStatus {
    NotStarted,
    InProgress,
    OnHold,
    Completed,
    Verified,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: String,
    pub project_id: String,
    pub building_id: Option<String>,
    pub unit_number: String,
    pub block_name: Option<String>,
    #[serde(default)]
    pub floor: i32,
    #[serde(rename = "type")]
    pub kind: UnitType,
    pub area: Option<f64>,
    pub status: UnitStatus,
    pub sale_status: SaleStatus,
    #[serde(default)]
    pub progress: f64,
    pub price: Option<f64>,
    pub owner_id: Option<String>,
    pub reserved_by: Option<String>,
    pub reserved_at: Option<String>,
    pub sold_at: Option<String>,
    pub estimated_completion_date: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<UnitType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UnitStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_status: Option<SaleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_completion_date: Option<String>,
}

/// Body of `POST /api/units/search`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<UnitType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UnitStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_status: Option<SaleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_floor: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_floor: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_completion_percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_percentage: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectStats {
    pub total_units: u64,
    pub completed_units: u64,
    pub in_progress_units: u64,
    pub not_started_units: u64,
    pub available_units: u64,
    pub reserved_units: u64,
    pub sold_units: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: String,
    pub unit_id: String,
    pub work_name: String,
    pub description: Option<String>,
    pub status: WorkItemStatus,
    #[serde(default)]
    pub completion_percentage: u8,
    pub weight_percentage: Option<u8>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub completed_at: Option<String>,
    pub assigned_contractor_id: Option<String>,
    pub assigned_worker_id: Option<String>,
    pub task_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkItemStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_percentage: Option<Progress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_contractor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_worker_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReserveRequest<'a> {
    reserved_by: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaleRequest<'a> {
    owner_id: &'a str,
    price: f64,
}

#[derive(Debug, Serialize)]
struct ProgressUpdate {
    progress: Progress,
}

pub struct UnitsApi {
    client: ApiClient,
}

impl UnitsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create_unit(&self, input: &UnitInput) -> ApiResult<Unit> {
        self.client.post("/api/units", input).await
    }

    pub async fn get_unit(&self, unit_id: &str) -> ApiResult<Unit> {
        let endpoint = format!("/api/units/{}", encode(unit_id));
        self.client.get(&endpoint).await
    }

    pub async fn project_units(&self, project_id: &str) -> ApiResult<Vec<Unit>> {
        let endpoint = format!("/api/units/project/{}", encode(project_id));
        self.client.get(&endpoint).await
    }

    pub async fn building_units(&self, building_id: &str) -> ApiResult<Vec<Unit>> {
        let endpoint = format!("/api/units/building/{}", encode(building_id));
        self.client.get(&endpoint).await
    }

    pub async fn units_by_block(&self, project_id: &str, block_name: &str) -> ApiResult<Vec<Unit>> {
        let endpoint = format!(
            "/api/units/project/{}/block/{}",
            encode(project_id),
            encode(block_name),
        );
        self.client.get(&endpoint).await
    }

    pub async fn units_by_floor(&self, project_id: &str, floor: i32) -> ApiResult<Vec<Unit>> {
        let endpoint = format!("/api/units/project/{}/floor/{}", encode(project_id), floor);
        self.client.get(&endpoint).await
    }

    pub async fn units_by_status(&self, project_id: &str, status: UnitStatus) -> ApiResult<Vec<Unit>> {
        let endpoint = format!(
            "/api/units/project/{}/status/{}",
            encode(project_id),
            path_segment(&status)?,
        );
        self.client.get(&endpoint).await
    }

    pub async fn units_by_sale_status(
        &self,
        project_id: &str,
        sale_status: SaleStatus,
    ) -> ApiResult<Vec<Unit>> {
        let endpoint = format!(
            "/api/units/project/{}/sale-status/{}",
            project_id,
            path_segment(&sale_status)?
        );
        self.client.get(&endpoint).await
    }

    pub async fn units_by_type(&self, project_id: &str, kind: UnitType) -> ApiResult<Vec<Unit>> {
        let endpoint = format!(
            "/api/units/project/{}/type/{}",
            encode(project_id),
            path_segment(&kind)?,
        );
        self.client.get(&endpoint).await
    }

    pub async fn owner_units(&self, owner_id: &str) -> ApiResult<Vec<Unit>> {
        let endpoint = format!("/api/units/owner/{}", encode(owner_id));
        self.client.get(&endpoint).await
    }

    pub async fn available_units(&self, project_id: &str) -> ApiResult<Vec<Unit>> {
        let endpoint = format!("/api/units/project/{}/available", encode(project_id));
        self.client.get(&endpoint).await
    }

    pub async fn overdue_units(&self, project_id: &str) -> ApiResult<Vec<Unit>> {
        let endpoint = format!("/api/units/project/{}/overdue", encode(project_id));
        self.client.get(&endpoint).await
    }

    pub async fn search_units(&self, search: &UnitSearch) -> ApiResult<Vec<Unit>> {
        self.client.post("/api/units/search", search).await
    }

    pub async fn update_unit(&self, unit_id: &str, input: &UnitInput) -> ApiResult<Unit> {
        let endpoint = format!("/api/units/{}", encode(unit_id));
        self.client.put(&endpoint, input).await
    }

    pub async fn update_progress(&self, unit_id: &str, progress: Progress) -> ApiResult<Unit> {
        let endpoint = format!("/api/units/{}/progress", encode(unit_id));
        self.client.put(&endpoint, &ProgressUpdate { progress }).await
    }

    pub async fn reserve_unit(&self, unit_id: &str, reserved_by: &str) -> ApiResult<Unit> {
        let endpoint = format!("/api/units/{}/reserve", encode(unit_id));
        self.client.put(&endpoint, &ReserveRequest { reserved_by }).await
    }

    pub async fn sell_unit(&self, unit_id: &str, owner_id: &str, price: f64) -> ApiResult<Unit> {
        let endpoint = format!("/api/units/{}/sell", encode(unit_id));
        self.client.put(&endpoint, &SaleRequest { owner_id, price }).await
    }

    pub async fn cancel_reservation(&self, unit_id: &str) -> ApiResult<Unit> {
        let endpoint = format!("/api/units/{}/cancel-reservation", encode(unit_id));
        self.client.put_empty(&endpoint).await
    }

    pub async fn delete_unit(&self, unit_id: &str, hard_delete: bool) -> ApiResult<()> {
        let endpoint = format!("/api/units/{}", encode(unit_id));
        let params = Params::new().set("hardDelete", hard_delete);
        self.client
            .send(&endpoint, RequestOptions::delete().with_params(params))
            .await
    }

    pub async fn project_stats(&self, project_id: &str) -> ApiResult<ProjectStats> {
        let endpoint = format!("/api/units/project/{}/stats", encode(project_id));
        self.client.get(&endpoint).await
    }

    pub async fn create_work_item(&self, unit_id: &str, input: &WorkItemInput) -> ApiResult<WorkItem> {
        let endpoint = format!("/api/units/{}/work-items", encode(unit_id));
        self.client.post(&endpoint, input).await
    }

    pub async fn work_items(&self, unit_id: &str) -> ApiResult<Vec<WorkItem>> {
        let endpoint = format!("/api/units/{}/work-items", encode(unit_id));
        self.client.get(&endpoint).await
    }

    pub async fn update_work_item(
        &self,
        work_item_id: &str,
        input: &WorkItemInput,
    ) -> ApiResult<WorkItem> {
        let endpoint = format!("/api/units/work-items/{}", encode(work_item_id));
        self.client.put(&endpoint, input).await
    }

    pub async fn delete_work_item(&self, work_item_id: &str) -> ApiResult<()> {
        let endpoint = format!("/api/units/work-items/{}", encode(work_item_id));
        self.client.send(&endpoint, RequestOptions::delete()).await
    }
}

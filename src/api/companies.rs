use super::{
    ApiClient, ApiResult, FilePart, Page, PageParams, Params, RequestOptions, path_segment,
};
use serde::{Deserialize, Serialize};
use urlencoding::encode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyType {
    Construction,
    Developer,
    Contractor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyStatus {
    Active,
    Inactive,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub tax_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: CompanyType,
    pub status: CompanyStatus,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default)]
    pub active_project_count: u32,
    #[serde(default)]
    pub total_project_count: u32,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<CompanyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

pub struct CompaniesApi {
    client: ApiClient,
}

impl CompaniesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create_company(&self, input: &CompanyInput) -> ApiResult<Company> {
        self.client.post("/api/companies", input).await
    }

    pub async fn update_company(&self, company_id: &str, input: &CompanyInput) -> ApiResult<Company> {
        let endpoint = format!("/api/companies/{}", encode(company_id));
        self.client.put(&endpoint, input).await
    }

    pub async fn update_status(&self, company_id: &str, status: CompanyStatus) -> ApiResult<Company> {
        let endpoint = format!("/api/companies/{}/status", encode(company_id));
        let params = Params::new().set("status", path_segment(&status)?);
        self.client.patch_with(&endpoint, params).await
    }

    pub async fn get_company(&self, company_id: &str) -> ApiResult<Company> {
        let endpoint = format!("/api/companies/{}", encode(company_id));
        self.client.get(&endpoint).await
    }

    pub async fn company_by_tax_id(&self, tax_id: &str) -> ApiResult<Company> {
        let endpoint = format!("/api/companies/tax-id/{}", encode(tax_id));
        self.client.get(&endpoint).await
    }

    pub async fn list_companies(&self, page: &PageParams) -> ApiResult<Page<Company>> {
        self.client.get_with("/api/companies", page.to_params()?).await
    }

    pub async fn companies_by_status(
        &self,
        status: CompanyStatus,
        page: &PageParams,
    ) -> ApiResult<Page<Company>> {
        let endpoint = format!("/api/companies/status/{}", path_segment(&status)?);
        self.client.get_with(&endpoint, page.to_params()?).await
    }

    pub async fn companies_by_type(
        &self,
        kind: CompanyType,
        page: &PageParams,
    ) -> ApiResult<Page<Company>> {
        let endpoint = format!("/api/companies/type/{}", path_segment(&kind)?);
        self.client.get_with(&endpoint, page.to_params()?).await
    }

    pub async fn search_companies(&self, keyword: &str, page: &PageParams) -> ApiResult<Page<Company>> {
        let params = Params::new().set("keyword", keyword).merge(page.to_params()?);
        self.client.get_with("/api/companies/search", params).await
    }

    pub async fn active_companies(&self) -> ApiResult<Vec<Company>> {
        self.client.get("/api/companies/active").await
    }

    pub async fn upload_logo(&self, company_id: &str, file: FilePart) -> ApiResult<Company> {
        let endpoint = format!("/api/companies/{}/logo", encode(company_id));
        self.client
            .upload(&endpoint, file.into_form()?, Params::new())
            .await
    }

    pub async fn delete_company(&self, company_id: &str) -> ApiResult<()> {
        let endpoint = format!("/api/companies/{}", encode(company_id));
        self.client.send(&endpoint, RequestOptions::delete()).await
    }

    pub async fn increment_project_count(&self, company_id: &str, is_active: bool) -> ApiResult<()> {
        let endpoint = format!("/api/companies/{}/projects/increment", encode(company_id));
        let options = RequestOptions::patch().with_params(Params::new().set("isActive", is_active));
        self.client.send(&endpoint, options).await
    }

    pub async fn health_check(&self) -> ApiResult<HealthStatus> {
        self.client.get("/api/companies/health").await
    }
}

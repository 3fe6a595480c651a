use super::{ApiClient, ApiError, ApiResult, FilePart, Params, RequestOptions, path_segment};
use reqwest::multipart::Part;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use urlencoding::encode;

const DEFAULT_LINK_EXPIRY_MINUTES: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Project,
    Task,
    User,
    Company,
    Employee,
    Customer,
    Vendor,
    PurchaseOrder,
    Inventory,
    Asset,
    Maintenance,
    Unit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    PendingReview,
    Approved,
    Rejected,
    RevisionRequired,
    AutoApproved,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub file_name: String,
    pub original_file_name: Option<String>,
    pub file_size: Option<u64>,
    pub mime_type: Option<String>,
    pub file_extension: Option<String>,
    pub folder_id: Option<String>,
    pub document_type: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub uploaded_by: Option<String>,
    pub company_id: Option<String>,
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    pub version: Option<u32>,
    pub status: Option<String>,
    pub task_id: Option<String>,
    pub phase_id: Option<String>,
    pub approval_status: Option<ApprovalStatus>,
    pub approved_by: Option<String>,
    pub approved_at: Option<String>,
    pub completion_percentage: Option<u8>,
    pub download_url: Option<String>,
}

/// Metadata sent alongside an uploaded file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpload {
    pub company_id: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl DocumentUpload {
    pub fn new(company_id: impl Into<String>, entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            entity_type,
            entity_id: entity_id.into(),
            document_type: None,
            category: None,
            description: None,
            tags: BTreeSet::new(),
            is_public: None,
        }
    }
}

/// Editable metadata of a stored document. `None` fields are left as they are.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DownloadLink {
    download_url: String,
}

pub struct DocumentsApi {
    client: ApiClient,
}

impl DocumentsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_document(&self, document_id: &str) -> ApiResult<Document> {
        let endpoint = format!("/api/documents/{}", encode(document_id));
        self.client.get(&endpoint).await
    }

    pub async fn company_documents(&self, company_id: &str) -> ApiResult<Vec<Document>> {
        let endpoint = format!("/api/documents/company/{}", encode(company_id));
        self.client.get(&endpoint).await
    }

    pub async fn entity_documents(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> ApiResult<Vec<Document>> {
        let endpoint = format!(
            "/api/documents/entity/{}/{}",
            path_segment(&entity_type)?,
            entity_id
        );
        self.client.get(&endpoint).await
    }

    pub async fn search_documents(&self, search: &DocumentSearch) -> ApiResult<Vec<Document>> {
        self.client.post("/api/documents/search", search).await
    }

    /// Uploads `file` with its metadata as a JSON `request` part.
    pub async fn upload_document(&self, file: FilePart, upload: &DocumentUpload) -> ApiResult<Document> {
        let metadata = serde_json::to_string(upload)
            .map_err(|e| ApiError::Parse(format!("Failed to encode upload metadata: {}", e)))?;
        let request_part = Part::text(metadata)
            .mime_str("application/json")
            .map_err(|e| ApiError::Validation(format!("Failed to create multipart: {}", e)))?;
        let form = file.into_form()?.part("request", request_part);

        self.client
            .upload("/api/documents/upload", form, Params::new())
            .await
    }

    /// A time-limited link to the stored file, valid for an hour unless
    /// `expiry_minutes` says otherwise.
    pub async fn download_url(&self, document_id: &str, expiry_minutes: Option<u32>) -> ApiResult<String> {
        let endpoint = format!("/api/documents/{}/download-url", encode(document_id));
        let params = Params::new().set(
            "expiryMinutes",
            expiry_minutes.unwrap_or(DEFAULT_LINK_EXPIRY_MINUTES),
        );
        let link: DownloadLink = self.client.get_with(&endpoint, params).await?;
        Ok(link.download_url)
    }

    pub async fn update_document(
        &self,
        document_id: &str,
        update: &DocumentUpdate,
    ) -> ApiResult<Document> {
        let endpoint = format!("/api/documents/{}", encode(document_id));
        self.client.put(&endpoint, update).await
    }

    pub async fn archive_document(&self, document_id: &str) -> ApiResult<()> {
        let endpoint = format!("/api/documents/{}/archive", encode(document_id));
        self.client.send(&endpoint, RequestOptions::put()).await
    }

    pub async fn delete_document(&self, document_id: &str, hard_delete: bool) -> ApiResult<()> {
        let endpoint = format!("/api/documents/{}", encode(document_id));
        let params = Params::new().set("hardDelete", hard_delete);
        self.client
            .send(&endpoint, RequestOptions::delete().with_params(params))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockGateway, Stub};
    use serde_json::json;

    fn document_json() -> serde_json::Value {
        json!({
            "id": "d-1",
            "fileName": "d-1.pdf",
            "originalFileName": "permit.pdf",
            "fileSize": 20480,
            "mimeType": "application/pdf",
            "tags": ["permit", "legal"],
            "entityType": "PROJECT",
            "entityId": "p-1",
            "companyId": "c-1",
            "isPublic": false,
            "approvalStatus": "PENDING_REVIEW"
        })
    }

    #[actix_web::test]
    async fn entity_documents_use_wire_entity_type() {
        let gateway = MockGateway::start().await;
        gateway.stub(
            "GET",
            "/api/documents/entity/PURCHASE_ORDER/po-4",
            Stub::json(200, json!([])),
        );
        gateway.stub(
            "GET",
            "/api/documents/entity/PROJECT/p-1",
            Stub::json(200, json!([document_json()])),
        );
        let api = DocumentsApi::new(gateway.client());

        assert!(api.entity_documents(EntityType::PurchaseOrder, "po-4").await.unwrap().is_empty());
        let docs = api.entity_documents(EntityType::Project, "p-1").await.unwrap();

        assert_eq!(docs[0].approval_status, Some(ApprovalStatus::PendingReview));
        assert!(docs[0].tags.contains("permit"));
    }

    #[actix_web::test]
    async fn upload_sends_file_and_metadata_parts() {
        let gateway = MockGateway::start().await;
        gateway.stub("POST", "/api/documents/upload", Stub::json(201, document_json()));
        let api = DocumentsApi::new(gateway.client());
        api.client.set_token(Some("jwt-doc")).unwrap();

        let upload = DocumentUpload::new("c-1", EntityType::Project, "p-1");
        let file = FilePart::new("permit.pdf", b"%PDF-1.7".to_vec()).with_mime("application/pdf");
        let document = api.upload_document(file, &upload).await.unwrap();

        assert_eq!(document.id, "d-1");
        let request = gateway.last_request();
        assert_eq!(request.header("authorization"), Some("Bearer jwt-doc"));
        let body = String::from_utf8_lossy(&request.body);
        assert!(body.contains("name=\"file\"; filename=\"permit.pdf\""));
        assert!(body.contains("name=\"request\""));
        assert!(body.contains(r#"{"companyId":"c-1","entityType":"PROJECT","entityId":"p-1"}"#));
    }

    #[actix_web::test]
    async fn download_url_defaults_expiry() {
        let gateway = MockGateway::start().await;
        gateway.stub(
            "GET",
            "/api/documents/d-1/download-url",
            Stub::json(200, json!({"downloadUrl": "https://files.example.com/d-1?sig=abc"})),
        );
        let api = DocumentsApi::new(gateway.client());

        let url = api.download_url("d-1", None).await.unwrap();

        assert_eq!(url, "https://files.example.com/d-1?sig=abc");
        assert_eq!(gateway.last_request().query, "expiryMinutes=60");
    }

    #[actix_web::test]
    async fn update_sends_only_changed_metadata() {
        let gateway = MockGateway::start().await;
        gateway.stub("PUT", "/api/documents/d-1", Stub::json(200, document_json()));
        let api = DocumentsApi::new(gateway.client());

        let update = DocumentUpdate {
            description: Some("Signed permit".to_string()),
            tags: Some(BTreeSet::from(["permit".to_string()])),
            ..DocumentUpdate::default()
        };
        let document = api.update_document("d-1", &update).await.unwrap();

        assert_eq!(document.id, "d-1");
        assert_eq!(
            gateway.last_request().json(),
            json!({"description": "Signed permit", "tags": ["permit"]})
        );
    }

    #[actix_web::test]
    async fn archive_and_delete() {
        let gateway = MockGateway::start().await;
        gateway.stub("PUT", "/api/documents/d-1/archive", Stub::empty(200));
        gateway.stub("DELETE", "/api/documents/d-1", Stub::empty(204));
        let api = DocumentsApi::new(gateway.client());

        api.archive_document("d-1").await.unwrap();
        api.delete_document("d-1", true).await.unwrap();

        let requests = gateway.requests();
        assert_eq!(requests[0].method, "PUT");
        assert_eq!(requests[1].query, "hardDelete=true");
    }
}

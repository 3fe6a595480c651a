use super::{ApiConfig, ApiError, ApiResult, Params};
use crate::storage::{MemoryStore, SessionStore, TOKEN_KEY};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// A decoded 2xx body: JSON when the gateway said so, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn decode<T: DeserializeOwned>(self) -> ApiResult<T> {
        match self {
            ResponseBody::Json(value) => serde_json::from_value(value.clone()).map_err(|e| {
                ApiError::Parse(format!("Failed to parse response: {}. Response body: {}", e, value))
            }),
            ResponseBody::Text(text) => {
                // 204s and other empty bodies decode as `()` / `None`
                if text.is_empty() {
                    if let Ok(value) = serde_json::from_value(Value::Null) {
                        return Ok(value);
                    }
                }
                serde_json::from_value(Value::String(text.clone())).map_err(|e| {
                    ApiError::Parse(format!("Failed to parse response: {}. Response body: {}", e, text))
                })
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub params: Params,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            params: Params::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = self.params.merge(params);
        self
    }

    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Parse(format!("Failed to encode request body: {}", e)))?;
        self.body = Some(body);
        Ok(self)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

/// The `file` field of a multipart upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl FilePart {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub async fn read(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ApiError::Validation(format!("Failed to read file {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn into_form(self) -> ApiResult<Form> {
        let mut part = Part::bytes(self.bytes).file_name(self.file_name);
        if let Some(mime) = self.mime {
            part = part
                .mime_str(&mime)
                .map_err(|e| ApiError::Validation(format!("Failed to create multipart: {}", e)))?;
        }
        Ok(Form::new().part("file", part))
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
    store: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, store: Arc<dyn SessionStore>) -> Self {
        Self {
            client: Client::new(),
            config,
            store,
        }
    }

    /// A client whose token lives only as long as the process.
    pub fn with_config(config: ApiConfig) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    pub fn set_token(&self, token: Option<&str>) -> ApiResult<()> {
        match token {
            Some(token) => self.store.set(TOKEN_KEY, token),
            None => self.store.remove(TOKEN_KEY),
        }
    }

    pub fn build_url(&self, path: &str, params: &Params) -> ApiResult<Url> {
        let base = Url::parse(&self.config.base_url)?;
        let mut url = base.join(path)?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        Ok(url)
    }

    fn bearer(&self) -> ApiResult<Option<HeaderValue>> {
        let Some(token) = self.token() else {
            return Ok(None);
        };
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            ApiError::Validation("Stored token is not a valid header value".to_string())
        })?;
        value.set_sensitive(true);
        Ok(Some(value))
    }

    async fn handle_response(response: Response) -> ApiResult<ResponseBody> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message =
                error_message(&error_text).unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            warn!("Request failed with status {}: {}", status, message);
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.contains("application/json"));

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response body: {}", e)))?;

        if !is_json {
            return Ok(ResponseBody::Text(body));
        }
        if body.trim().is_empty() {
            return Ok(ResponseBody::Json(Value::Null));
        }
        serde_json::from_str(&body).map(ResponseBody::Json).map_err(|e| {
            ApiError::Parse(format!("Failed to parse response: {}. Response body: {}", e, body))
        })
    }

    pub async fn request_raw(&self, path: &str, options: RequestOptions) -> ApiResult<ResponseBody> {
        let RequestOptions {
            method,
            params,
            body,
            headers: extra_headers,
        } = options;

        let url = self.build_url(path, &params)?;
        let mut headers = HeaderMap::new();
        if let Some(bearer) = self.bearer()? {
            headers.insert(AUTHORIZATION, bearer);
        }

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            let bytes = serde_json::to_vec(&body)
                .map_err(|e| ApiError::Parse(format!("Failed to encode request body: {}", e)))?;
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            request = request.body(bytes);
        }
        headers.extend(extra_headers);

        debug!("{} {}", method, url);
        let response = request.headers(headers).send().await?;
        Self::handle_response(response).await
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        self.request_raw(path, options).await?.decode()
    }

    /// Like `request`, for calls whose response body is irrelevant.
    pub async fn send(&self, path: &str, options: RequestOptions) -> ApiResult<()> {
        self.request_raw(path, options).await.map(drop)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(path, RequestOptions::get()).await
    }

    pub async fn get_with<T: DeserializeOwned>(&self, path: &str, params: Params) -> ApiResult<T> {
        self.request(path, RequestOptions::get().with_params(params))
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(path, RequestOptions::post().with_json(body)?)
            .await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(path, RequestOptions::post()).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(path, RequestOptions::put().with_json(body)?)
            .await
    }

    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(path, RequestOptions::put()).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(path, RequestOptions::patch().with_json(body)?)
            .await
    }

    /// PATCH with query parameters and no body.
    pub async fn patch_with<T: DeserializeOwned>(&self, path: &str, params: Params) -> ApiResult<T> {
        self.request(path, RequestOptions::patch().with_params(params))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(path, RequestOptions::delete()).await
    }

    pub async fn delete_with<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Params,
    ) -> ApiResult<T> {
        self.request(path, RequestOptions::delete().with_params(params))
            .await
    }

    /// Multipart POST. No content-type is set here so the transport can
    /// write the boundary.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
        params: Params,
    ) -> ApiResult<T> {
        let url = self.build_url(path, &params)?;
        let mut request = self.client.post(url.clone()).multipart(form);
        if let Some(bearer) = self.bearer()? {
            request = request.header(AUTHORIZATION, bearer);
        }

        debug!("POST {} (multipart)", url);
        let response = request.send().await?;
        Self::handle_response(response).await?.decode()
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::with_config(ApiConfig::default())
    }
}

/// The gateway's `{"message": ...}` error payload, when there is one.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")?
        .as_str()
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

use super::{ApiClient, ApiResult, RequestOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(alias = "accessToken")]
    pub token: String,
    pub refresh_token: Option<String>,
    pub user_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TwoFactorRequest<'a> {
    code: &'a str,
    session_id: &'a str,
}

#[derive(Debug, Serialize)]
struct GoogleRequest<'a> {
    credential: &'a str,
}

pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.client.post("/api/auth/login", request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        self.client.post("/api/auth/register", request).await
    }

    /// Revokes `refresh_token` on the server when given. The local token is
    /// dropped whatever the server answers.
    pub async fn logout(&self, refresh_token: Option<&str>) -> ApiResult<()> {
        let options = match refresh_token {
            Some(refresh_token) => RequestOptions::post().with_json(&RefreshRequest { refresh_token })?,
            None => RequestOptions::post(),
        };
        let result = self.client.send("/api/auth/logout", options).await;
        self.client.set_token(None)?;
        debug!("Local token cleared");
        result
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> ApiResult<AuthResponse> {
        self.client
            .post("/api/auth/refresh", &RefreshRequest { refresh_token })
            .await
    }

    pub async fn verify_2fa(&self, code: &str, session_id: &str) -> ApiResult<AuthResponse> {
        self.client
            .post("/api/auth/verify-2fa", &TwoFactorRequest { code, session_id })
            .await
    }

    pub async fn google_login(&self, credential: &str) -> ApiResult<AuthResponse> {
        self.client
            .post("/api/auth/google", &GoogleRequest { credential })
            .await
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.token().is_some()
    }
}

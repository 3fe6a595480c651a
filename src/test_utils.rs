use crate::api::{ApiClient, ApiConfig};
use crate::storage::{MemoryStore, SessionStore};
use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One request as the mock gateway saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_values(name).into_iter().next()
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        url::form_urlencoded::parse(self.query.as_bytes())
            .into_owned()
            .collect()
    }

    pub fn query_param(&self, key: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Request body is not JSON")
    }
}

#[derive(Debug, Clone)]
pub struct Stub {
    status: u16,
    content_type: Option<String>,
    body: String,
}

impl Stub {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_string()),
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: Some("text/plain; charset=utf-8".to_string()),
            body: body.to_string(),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            body: String::new(),
        }
    }
}

#[derive(Default)]
struct GatewayState {
    stubs: Mutex<HashMap<(String, String), Stub>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// A local actix-web server standing in for the gateway. Unstubbed routes
/// answer 404 with a JSON message.
pub struct MockGateway {
    base_url: String,
    state: Arc<GatewayState>,
}

impl MockGateway {
    pub async fn start() -> Self {
        let state = Arc::new(GatewayState::default());
        let listener =
            std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind mock gateway");
        let port = listener
            .local_addr()
            .expect("Mock gateway has no local address")
            .port();

        let data = web::Data::from(state.clone());
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .default_service(web::to(handle_request))
        })
        .workers(1)
        .listen(listener)
        .expect("Failed to listen on mock gateway socket")
        .run();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn config(&self) -> ApiConfig {
        ApiConfig::new(self.base_url.clone())
    }

    pub fn client(&self) -> ApiClient {
        self.client_with_store(Arc::new(MemoryStore::new()))
    }

    pub fn client_with_store(&self, store: Arc<dyn SessionStore>) -> ApiClient {
        ApiClient::new(self.config(), store)
    }

    pub fn stub(&self, method: &str, path: &str, stub: Stub) {
        self.state
            .stubs
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), stub);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("Mock gateway received no requests")
    }
}

async fn handle_request(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<GatewayState>,
) -> HttpResponse {
    let recorded = RecordedRequest {
        method: req.method().to_string(),
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        headers: req
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect(),
        body: body.to_vec(),
    };

    let key = (recorded.method.clone(), recorded.path.clone());
    state.requests.lock().unwrap().push(recorded);

    let stub = state.stubs.lock().unwrap().get(&key).cloned();
    match stub {
        Some(stub) => {
            let status = StatusCode::from_u16(stub.status).expect("Invalid stub status");
            let mut response = HttpResponse::build(status);
            if let Some(content_type) = stub.content_type {
                response.insert_header((CONTENT_TYPE, content_type));
            }
            response.body(stub.body)
        }
        None => HttpResponse::NotFound().json(json!({
            "message": format!("No stub for {} {}", key.0, key.1)
        })),
    }
}

/// A base URL nothing is listening on.
pub fn unreachable_gateway() -> ApiConfig {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind probe socket");
    let port = listener.local_addr().expect("Probe socket has no address").port();
    drop(listener);
    ApiConfig::new(format!("http://127.0.0.1:{}", port))
}

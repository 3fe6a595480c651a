pub mod client;
pub mod params;
pub mod auth;
pub mod projects;
pub mod locations;
pub mod tasks;
pub mod units;
pub mod users;
pub mod companies;
pub mod notifications;
pub mod issues;
pub mod documents;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

const DEFAULT_GATEWAY: &str = "http://localhost:8081";

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// The gateway answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Rejected locally before any request was sent.
    #[error("{0}")]
    Validation(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Network(error.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(error: url::ParseError) -> Self {
        ApiError::InvalidUrl(error.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Reads `STRUX_API_GATEWAY`, falling back to the local gateway.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("STRUX_API_GATEWAY")
                .ok()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GATEWAY.to_string()),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Outgoing percentage, checked to lie in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    pub fn new(value: u8) -> ApiResult<Self> {
        if value > 100 {
            return Err(ApiError::Validation(format!(
                "Progress must be between 0 and 100, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Progress {
    type Error = ApiError;

    fn try_from(value: i64) -> ApiResult<Self> {
        u8::try_from(value)
            .map_err(|_| {
                ApiError::Validation(format!(
                    "Progress must be between 0 and 100, got {}",
                    value
                ))
            })
            .and_then(Progress::new)
    }
}

/// Renders a unit enum variant the way the gateway spells it in paths,
/// e.g. `TaskStatus::InProgress` becomes `IN_PROGRESS`.
pub fn path_segment<T: serde::Serialize>(value: &T) -> ApiResult<String> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(segment)) => Ok(segment),
        Ok(other) => Err(ApiError::Parse(format!(
            "Expected a string path segment, got {}",
            other
        ))),
        Err(e) => Err(ApiError::Parse(e.to_string())),
    }
}

/// Reads a gateway timestamp. Accepts RFC 3339, offset-less date-times
/// (taken as UTC) and bare dates (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

pub use client::{ApiClient, FilePart, RequestOptions, ResponseBody};
pub use params::{Page, PageParams, Params, SortDirection};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serial_test::serial;

    #[test]
    fn timestamps_in_every_gateway_shape() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2025-03-14T09:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-14T13:30:00+04:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-14T09:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-14T09:30:00.000"), Some(expected));
        assert_eq!(
            parse_timestamp("2025-03-14"),
            Some(Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("next tuesday"), None);
    }

    #[test]
    fn progress_accepts_bounds() {
        assert_eq!(Progress::new(0).unwrap().value(), 0);
        assert_eq!(Progress::new(100).unwrap().value(), 100);
    }

    #[test]
    fn progress_rejects_out_of_range() {
        assert!(matches!(Progress::new(101), Err(ApiError::Validation(_))));
        assert!(matches!(Progress::try_from(-1), Err(ApiError::Validation(_))));
        assert!(matches!(Progress::try_from(250), Err(ApiError::Validation(_))));
        assert_eq!(Progress::try_from(60).unwrap().value(), 60);
    }

    #[test]
    fn http_error_displays_message_only() {
        let err = ApiError::Http {
            status: 404,
            message: "Project not found".to_string(),
        };
        assert_eq!(err.to_string(), "Project not found");
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn path_segment_uses_wire_spelling() {
        use crate::api::tasks::TaskStatus;
        assert_eq!(path_segment(&TaskStatus::InProgress).unwrap(), "IN_PROGRESS");
        assert!(matches!(path_segment(&42), Err(ApiError::Parse(_))));
    }

    #[test]
    #[serial]
    fn config_reads_gateway_from_env() {
        unsafe { std::env::set_var("STRUX_API_GATEWAY", "https://gateway.example.com") };
        assert_eq!(ApiConfig::from_env().base_url, "https://gateway.example.com");
        unsafe { std::env::remove_var("STRUX_API_GATEWAY") };
    }

    #[test]
    #[serial]
    fn config_falls_back_to_local_gateway() {
        unsafe { std::env::remove_var("STRUX_API_GATEWAY") };
        assert_eq!(ApiConfig::from_env().base_url, "http://localhost:8081");
    }
}

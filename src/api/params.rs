use super::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameters in insertion order. Absent values are never stored,
/// and each key appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key.to_string(), value)),
        }
        self
    }

    pub fn set_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    pub fn merge(mut self, other: Params) -> Self {
        for (key, value) in other.pairs {
            self = self.set(&key, value);
        }
        self
    }

    /// Flattens a serializable struct into parameters, skipping `null` fields.
    pub fn from_serialize<T: Serialize>(value: &T) -> ApiResult<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| ApiError::Parse(format!("Failed to encode query parameters: {}", e)))?;

        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => Ok(map
                .into_iter()
                .fold(Self::new(), |params, (key, value)| {
                    params.set_opt(&key, stringify(value))
                })),
            other => Err(ApiError::Parse(format!(
                "Query parameters must be an object, got {}",
                other
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn stringify(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort_by: Option<String>,
    pub direction: Option<SortDirection>,
}

impl PageParams {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
            ..Self::default()
        }
    }

    pub fn sorted(mut self, sort_by: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_by = Some(sort_by.into());
        self.direction = Some(direction);
        self
    }

    pub fn to_params(&self) -> ApiResult<Params> {
        Params::from_serialize(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub number: u32,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            size: 0,
            number: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Filters {
        city: Option<String>,
        is_available: Option<bool>,
        min_rating: Option<f64>,
        specialty: Option<String>,
    }

    #[test]
    fn set_opt_omits_absent_values() {
        let params = Params::new()
            .set("page", 0)
            .set_opt("keyword", None::<String>)
            .set_opt("status", Some("ACTIVE"));

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("page"), Some("0"));
        assert_eq!(params.get("status"), Some("ACTIVE"));
        assert_eq!(params.get("keyword"), None);
    }

    #[test]
    fn set_keeps_each_key_once() {
        let params = Params::new().set("size", 10).set("size", 50);
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("size"), Some("50"));
    }

    #[test]
    fn from_serialize_drops_nulls_and_stringifies() {
        let params = Params::from_serialize(&Filters {
            city: Some("Ankara".to_string()),
            is_available: Some(true),
            min_rating: Some(4.5),
            specialty: None,
        })
        .unwrap();

        assert_eq!(params.len(), 3);
        assert_eq!(params.get("city"), Some("Ankara"));
        assert_eq!(params.get("isAvailable"), Some("true"));
        assert_eq!(params.get("minRating"), Some("4.5"));
        assert_eq!(params.get("specialty"), None);
    }

    #[test]
    fn from_serialize_rejects_non_objects() {
        assert!(matches!(
            Params::from_serialize(&vec![1, 2]),
            Err(ApiError::Parse(_))
        ));
    }

    #[test]
    fn page_params_use_gateway_names() {
        let params = PageParams::new(2, 25)
            .sorted("createdAt", SortDirection::Desc)
            .to_params()
            .unwrap();

        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.get("size"), Some("25"));
        assert_eq!(params.get("sortBy"), Some("createdAt"));
        assert_eq!(params.get("direction"), Some("DESC"));
        assert!(PageParams::default().to_params().unwrap().is_empty());
    }

    #[test]
    fn page_decodes_spring_envelope() {
        let page: Page<String> = serde_json::from_value(json!({
            "content": ["a", "b"],
            "totalElements": 12,
            "totalPages": 6,
            "size": 2,
            "number": 0
        }))
        .unwrap();

        assert_eq!(page.content, vec!["a", "b"]);
        assert_eq!(page.total_elements, 12);
        assert_eq!(page.total_pages, 6);
    }
}

use super::projects::ProjectStatus;
use super::{ApiClient, ApiResult, Params};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use urlencoding::encode;

const DEFAULT_RADIUS_KM: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSuggestion {
    pub place_id: String,
    pub description: Option<String>,
    pub main_text: Option<String>,
    pub secondary_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub project_id: String,
    pub project_name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub completion_percentage: Option<f64>,
    pub company_name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapBounds {
    pub south_west_lat: f64,
    pub south_west_lng: f64,
    pub north_east_lat: f64,
    pub north_east_lng: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMapFilter {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<ProjectStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub company_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_completion: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion: Option<f64>,
}

pub struct LocationsApi {
    client: ApiClient,
}

impl LocationsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn search_locations(&self, query: &str) -> ApiResult<Vec<LocationSuggestion>> {
        let params = Params::new().set("query", query);
        self.client.get_with("/api/locations/search", params).await
    }

    // Place details come straight from the maps provider; their shape is not ours.
    pub async fn location_details(&self, place_id: &str) -> ApiResult<Value> {
        let endpoint = format!("/api/locations/details/{}", encode(place_id));
        self.client.get(&endpoint).await
    }

    pub async fn project_location(&self, project_id: &str) -> ApiResult<Value> {
        let endpoint = format!("/api/locations/projects/{}", encode(project_id));
        self.client.get(&endpoint).await
    }

    pub async fn map_markers(&self, bounds: &MapBounds) -> ApiResult<Vec<MapMarker>> {
        self.client
            .get_with("/api/locations/markers", Params::from_serialize(bounds)?)
            .await
    }

    pub async fn project_map_details(&self, project_id: &str) -> ApiResult<Value> {
        let endpoint = format!("/api/locations/projects/{}/map-details", encode(project_id));
        self.client.get(&endpoint).await
    }

    /// Projects within `radius_km` (10 km when `None`).
    pub async fn nearby_projects(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
    ) -> ApiResult<Vec<MapMarker>> {
        let params = Params::new()
            .set("latitude", latitude)
            .set("longitude", longitude)
            .set("radiusKm", radius_km.unwrap_or(DEFAULT_RADIUS_KM));
        self.client.get_with("/api/locations/nearby", params).await
    }

    pub async fn filter_projects(&self, filter: &ProjectMapFilter) -> ApiResult<Vec<MapMarker>> {
        self.client.post("/api/locations/filter", filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockGateway, Stub};
    use serde_json::json;

    #[actix_web::test]
    async fn markers_send_bounds_as_query() {
        let gateway = MockGateway::start().await;
        gateway.stub(
            "GET",
            "/api/locations/markers",
            Stub::json(
                200,
                json!([{
                    "projectId": "p-1",
                    "projectName": "Tower A",
                    "latitude": 41.0,
                    "longitude": 29.0,
                    "type": "RESIDENTIAL",
                    "completionPercentage": 55
                }]),
            ),
        );
        let api = LocationsApi::new(gateway.client());

        let markers = api
            .map_markers(&MapBounds {
                south_west_lat: 40.5,
                south_west_lng: 28.5,
                north_east_lat: 41.5,
                north_east_lng: 29.5,
            })
            .await
            .unwrap();

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].kind.as_deref(), Some("RESIDENTIAL"));
        let request = gateway.last_request();
        assert_eq!(request.query_param("southWestLat").as_deref(), Some("40.5"));
        assert_eq!(request.query_param("northEastLng").as_deref(), Some("29.5"));
    }

    #[actix_web::test]
    async fn nearby_defaults_radius() {
        let gateway = MockGateway::start().await;
        gateway.stub("GET", "/api/locations/nearby", Stub::json(200, json!([])));
        let api = LocationsApi::new(gateway.client());

        api.nearby_projects(41.0, 29.0, None).await.unwrap();

        assert_eq!(
            gateway.last_request().query_param("radiusKm").as_deref(),
            Some("10")
        );
    }

    #[actix_web::test]
    async fn filter_posts_typed_body() {
        let gateway = MockGateway::start().await;
        gateway.stub("POST", "/api/locations/filter", Stub::json(200, json!([])));
        let api = LocationsApi::new(gateway.client());

        let filter = ProjectMapFilter {
            statuses: vec![ProjectStatus::InProgress],
            min_completion: Some(20.0),
            ..ProjectMapFilter::default()
        };
        api.filter_projects(&filter).await.unwrap();

        assert_eq!(
            gateway.last_request().json(),
            json!({"statuses": ["IN_PROGRESS"], "minCompletion": 20.0})
        );
    }
}

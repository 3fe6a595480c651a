use super::{ApiClient, ApiResult, RequestOptions};
use serde::{Deserialize, Serialize};
use urlencoding::encode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    Info,
    Warning,
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub user_id: String,
    pub email_enabled: bool,
    pub sms_enabled: bool,
    pub push_enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct UnreadCount {
    count: u64,
}

pub struct NotificationsApi {
    client: ApiClient,
}

impl NotificationsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn user_notifications(&self, user_id: &str) -> ApiResult<Vec<Notification>> {
        let endpoint = format!("/api/notifications/user/{}", encode(user_id));
        self.client.get(&endpoint).await
    }

    pub async fn unread_notifications(&self, user_id: &str) -> ApiResult<Vec<Notification>> {
        let endpoint = format!("/api/notifications/user/{}/unread", encode(user_id));
        self.client.get(&endpoint).await
    }

    pub async fn unread_count(&self, user_id: &str) -> ApiResult<u64> {
        let endpoint = format!("/api/notifications/user/{}/unread-count", encode(user_id));
        let unread: UnreadCount = self.client.get(&endpoint).await?;
        Ok(unread.count)
    }

    pub async fn mark_as_read(&self, notification_id: &str) -> ApiResult<()> {
        let endpoint = format!("/api/notifications/{}/read", encode(notification_id));
        self.client.send(&endpoint, RequestOptions::put()).await
    }

    pub async fn mark_all_as_read(&self, user_id: &str) -> ApiResult<()> {
        let endpoint = format!("/api/notifications/user/{}/read-all", encode(user_id));
        self.client.send(&endpoint, RequestOptions::put()).await
    }

    pub async fn delete_notification(&self, notification_id: &str) -> ApiResult<()> {
        let endpoint = format!("/api/notifications/{}", encode(notification_id));
        self.client.send(&endpoint, RequestOptions::delete()).await
    }

    pub async fn preferences(&self, user_id: &str) -> ApiResult<NotificationPreferences> {
        let endpoint = format!("/api/notifications/preferences/{}", encode(user_id));
        self.client.get(&endpoint).await
    }

    pub async fn update_preferences(
        &self,
        user_id: &str,
        update: &PreferencesUpdate,
    ) -> ApiResult<NotificationPreferences> {
        let endpoint = format!("/api/notifications/preferences/{}", encode(user_id));
        self.client.put(&endpoint, update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockGateway, Stub};
    use serde_json::json;

    #[actix_web::test]
    async fn unread_count_unwraps_payload() {
        let gateway = MockGateway::start().await;
        gateway.stub(
            "GET",
            "/api/notifications/user/u-1/unread-count",
            Stub::json(200, json!({"count": 5})),
        );
        let api = NotificationsApi::new(gateway.client());

        assert_eq!(api.unread_count("u-1").await.unwrap(), 5);
    }

    #[actix_web::test]
    async fn notifications_decode_type() {
        let gateway = MockGateway::start().await;
        gateway.stub(
            "GET",
            "/api/notifications/user/u-1/unread",
            Stub::json(
                200,
                json!([{
                    "id": "n-1",
                    "userId": "u-1",
                    "type": "WARNING",
                    "title": "Inspection due",
                    "message": "Block B inspection is due tomorrow",
                    "isRead": false
                }]),
            ),
        );
        let api = NotificationsApi::new(gateway.client());

        let unread = api.unread_notifications("u-1").await.unwrap();

        assert_eq!(unread[0].kind, NotificationType::Warning);
        assert!(!unread[0].is_read);
    }

    #[actix_web::test]
    async fn mark_all_read_is_bodiless_put() {
        let gateway = MockGateway::start().await;
        gateway.stub("PUT", "/api/notifications/user/u-1/read-all", Stub::empty(204));
        let api = NotificationsApi::new(gateway.client());

        api.mark_all_as_read("u-1").await.unwrap();

        let request = gateway.last_request();
        assert_eq!(request.method, "PUT");
        assert!(request.body.is_empty());
    }

    #[actix_web::test]
    async fn preferences_update_is_partial() {
        let gateway = MockGateway::start().await;
        gateway.stub(
            "PUT",
            "/api/notifications/preferences/u-1",
            Stub::json(
                200,
                json!({"userId": "u-1", "emailEnabled": true, "smsEnabled": false, "pushEnabled": true}),
            ),
        );
        let api = NotificationsApi::new(gateway.client());

        let update = PreferencesUpdate {
            sms_enabled: Some(false),
            ..PreferencesUpdate::default()
        };
        let prefs = api.update_preferences("u-1", &update).await.unwrap();

        assert!(prefs.push_enabled);
        assert_eq!(gateway.last_request().json(), json!({"smsEnabled": false}));
    }
}

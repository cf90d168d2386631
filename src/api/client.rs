// ABOUTME: HTTP client for the marketplace notification endpoints
// Sends cookie-authenticated JSON GET requests and decodes the envelopes

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::Client;
use std::future::Future;
use tracing::debug;

use crate::api::protocol::{NewNotificationsResponse, UnreadCountResponse};
use crate::config::AlertConfig;
use crate::error::AlertError;
use crate::models::Notification;

/// Read side of the notification API consumed by the poller.
pub trait NotificationApi: Send + Sync {
    /// Unread count for `user_id`; `Ok(None)` when the server reports no count.
    fn unread_count(&self, user_id: &str) -> impl Future<Output = Result<Option<u64>, AlertError>> + Send;

    /// Notifications not yet fetched, in server order.
    fn new_notifications(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<Notification>, AlertError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpNotificationApi {
    client: Client,
    config: AlertConfig,
}

impl HttpNotificationApi {
    pub fn new(config: &AlertConfig) -> Result<Self, AlertError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| AlertError::Config(format!("invalid session cookie: {e}")))?;
            headers.insert(COOKIE, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            config: config.clone(),
        })
    }

    async fn get_json<T>(&self, template: &str, user_id: &str) -> Result<T, AlertError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.config.endpoint_url(template, user_id)?;
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                AlertError::Timeout(url.to_string())
            } else {
                AlertError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AlertError::Status {
                status: status.as_u16(),
                endpoint: url.to_string(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

impl NotificationApi for HttpNotificationApi {
    async fn unread_count(&self, user_id: &str) -> Result<Option<u64>, AlertError> {
        let body: UnreadCountResponse = self
            .get_json(&self.config.unread_count_path, user_id)
            .await?;
        let count = body.into_count();
        debug!(user_id, ?count, "Fetched unread count");
        Ok(count)
    }

    async fn new_notifications(&self, user_id: &str) -> Result<Vec<Notification>, AlertError> {
        let body: NewNotificationsResponse = self
            .get_json(&self.config.new_notifications_path, user_id)
            .await?;
        let batch = body.into_batch();
        debug!(user_id, "Fetched {} new notifications", batch.len());
        Ok(batch)
    }
}

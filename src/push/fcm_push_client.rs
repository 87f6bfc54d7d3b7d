use crate::configuration::PushSettings;
use crate::push::{DeliveryError, Push};
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};

pub struct FcmPushClient {
    http_client: reqwest::Client,
    base_url: String,
    project_id: String,
}

#[derive(serde::Serialize)]
struct SendRequest<'a> {
    message: Message<'a>,
}

#[derive(serde::Serialize)]
struct Message<'a> {
    token: &'a str,
    notification: Notification<'a>,
}

#[derive(serde::Serialize)]
struct Notification<'a> {
    title: &'a str,
    body: &'a str,
}

impl FcmPushClient {
    pub fn new(settings: &PushSettings, project_id: String) -> FcmPushClient {
        FcmPushClient {
            http_client: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            project_id,
        }
    }
}

#[async_trait]
impl Push for FcmPushClient {
    #[tracing::instrument(
        name = "Submitting a push message",
        skip(self, recipient_token, access_token, title, body)
    )]
    async fn send_push(
        &self,
        recipient_token: &str,
        access_token: &Secret<String>,
        title: &str,
        body: &str,
    ) -> Result<String, DeliveryError> {
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.base_url, self.project_id
        );
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token.expose_secret())
            .json(&SendRequest {
                message: Message {
                    token: recipient_token,
                    notification: Notification { title, body },
                },
            })
            .send()
            .await
            .map_err(DeliveryError::Network)?;

        let status = response.status();
        let response_body = response.text().await.map_err(DeliveryError::Network)?;
        if !status.is_success() {
            return Err(DeliveryError::Refused {
                status: status.as_u16(),
                body: response_body,
            });
        }
        Ok(response_body)
    }
}

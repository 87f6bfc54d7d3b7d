mod fcm_push_client;

use async_trait::async_trait;
pub use fcm_push_client::FcmPushClient;
use secrecy::Secret;

#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    #[error("Failed to reach the push-delivery provider.")]
    Network(#[source] reqwest::Error),
    #[error("The push-delivery provider returned status {status}: {body}")]
    Refused { status: u16, body: String },
}

#[async_trait]
pub trait Push: Send + Sync {
    /// Submit a single push message, returning the provider's raw JSON
    /// response body on success.
    async fn send_push(
        &self,
        recipient_token: &str,
        access_token: &Secret<String>,
        title: &str,
        body: &str,
    ) -> Result<String, DeliveryError>;
}

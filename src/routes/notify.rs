use crate::domain::UserId;
use crate::oauth::{CredentialError, TokenProvider};
use crate::profile::ProfileStore;
use crate::push::{DeliveryError, Push};
use crate::routes::error_chain_fmt;
use rocket::http::{ContentType, Status};
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, Response, State};
use std::sync::Arc;
use uuid::Uuid;

/// Title carried by every relayed push message.
const PUSH_TITLE: &str = "Notification from Supabase";

#[derive(serde::Deserialize)]
pub struct WebhookPayload {
    #[serde(rename = "type")]
    pub operation: Operation,
    pub table: String,
    pub schema: String,
    pub record: NotificationRecord,
}

#[derive(serde::Deserialize)]
pub enum Operation {
    #[serde(rename = "INSERT")]
    Insert,
}

// Field names must match the columns of the notifications table that fires
// the webhook.
#[derive(serde::Deserialize)]
pub struct NotificationRecord {
    pub id: i64,
    pub user_id: String,
    pub body: String,
}

#[tracing::instrument(
    name = "Relaying a change event as a push message",
    skip(payload, profile_store, token_provider, push_client),
    fields(
        request_id = %Uuid::new_v4(),
        user_id = %payload.record.user_id,
        table = %payload.table
    )
)]
#[post("/notify", data = "<payload>")]
pub async fn notify(
    payload: Json<WebhookPayload>,
    profile_store: &State<Arc<dyn ProfileStore>>,
    token_provider: &State<Arc<dyn TokenProvider>>,
    push_client: &State<Arc<dyn Push>>,
) -> Result<(ContentType, String), NotifyError> {
    let payload = payload.into_inner();
    let user_id = UserId::parse(payload.record.user_id).map_err(NotifyError::InvalidUserId)?;

    let recipient_token = profile_store
        .push_token(&user_id)
        .await
        .map_err(NotifyError::LookupFailed)?
        .ok_or_else(|| NotifyError::UnknownRecipient(user_id.to_string()))?;

    let access_token = token_provider.access_token().await?;

    let provider_response = push_client
        .send_push(
            &recipient_token,
            &access_token,
            PUSH_TITLE,
            &payload.record.body,
        )
        .await?;

    Ok((ContentType::JSON, provider_response))
}

#[derive(thiserror::Error)]
pub enum NotifyError {
    #[error("{0}")]
    InvalidUserId(String),
    #[error("Failed to look up the recipient's push token.")]
    LookupFailed(#[source] anyhow::Error),
    #[error("No push token is registered for user {0}.")]
    UnknownRecipient(String),
    #[error(transparent)]
    CredentialExchange(#[from] CredentialError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl std::fmt::Debug for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for NotifyError {
    fn respond_to(self, _request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::warn!("NotifyError: {:?}", self);
        Response::build()
            .status(match self {
                NotifyError::InvalidUserId(_) => Status::BadRequest,
                NotifyError::LookupFailed(_)
                | NotifyError::UnknownRecipient(_)
                | NotifyError::CredentialExchange(_) => Status::InternalServerError,
                NotifyError::Delivery(_) => Status::BadGateway,
            })
            .ok()
    }
}

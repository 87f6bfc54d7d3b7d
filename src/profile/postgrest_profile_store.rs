use crate::configuration::ProfileStoreSettings;
use crate::domain::UserId;
use crate::profile::ProfileStore;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use secrecy::ExposeSecret;

/// Reads recipient push tokens from a PostgREST-style record store.
///
/// Lookups request the single-object representation
/// (`Accept: application/vnd.pgrst.object+json`), which the store only
/// honours when exactly one row matches the id filter.
pub struct PostgrestProfileStore {
    http_client: reqwest::Client,
    base_url: String,
    table: String,
    id_column: String,
    token_column: String,
}

impl PostgrestProfileStore {
    pub fn new(settings: &ProfileStoreSettings) -> Result<PostgrestProfileStore, anyhow::Error> {
        let mut api_key = HeaderValue::from_str(settings.service_role_key.expose_secret())
            .context("The service role key is not a valid header value.")?;
        api_key.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!(
            "Bearer {}",
            settings.service_role_key.expose_secret()
        ))
        .context("The service role key is not a valid header value.")?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.pgrst.object+json"),
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build the HTTP client for the record store.")?;

        Ok(PostgrestProfileStore {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            table: settings.table.clone(),
            id_column: settings.id_column.clone(),
            token_column: settings.token_column.clone(),
        })
    }
}

#[async_trait]
impl ProfileStore for PostgrestProfileStore {
    #[tracing::instrument(
        name = "Looking up the recipient's push token",
        skip(self),
        fields(user_id = %user_id)
    )]
    async fn push_token(&self, user_id: &UserId) -> Result<Option<String>, anyhow::Error> {
        let url = format!("{}/rest/v1/{}", self.base_url, self.table);
        let id_filter = format!("eq.{}", user_id.as_ref());
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("select", self.token_column.as_str()),
                (self.id_column.as_str(), id_filter.as_str()),
            ])
            .send()
            .await
            .context("Failed to reach the record store.")?;

        // The object representation is refused with a 406 unless exactly one
        // row matches the filter.
        if response.status() == StatusCode::NOT_ACCEPTABLE {
            return Ok(None);
        }

        let row: serde_json::Value = response
            .error_for_status()
            .context("The record store rejected the profile lookup.")?
            .json()
            .await
            .context("Failed to decode the profile row.")?;

        Ok(row
            .get(&self.token_column)
            .and_then(|token| token.as_str())
            .map(|token| token.to_string()))
    }
}

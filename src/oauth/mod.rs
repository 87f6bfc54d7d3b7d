mod jwt_token_provider;

use async_trait::async_trait;
pub use jwt_token_provider::JwtTokenProvider;
use secrecy::Secret;

#[derive(thiserror::Error, Debug)]
pub enum CredentialError {
    #[error("Failed to sign the bearer-grant assertion.")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("Failed to reach the identity provider.")]
    Network(#[source] reqwest::Error),
    #[error("The identity provider rejected the credential exchange with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Obtain a fresh short-lived access token scoped to push messaging.
    async fn access_token(&self) -> Result<Secret<String>, CredentialError>;
}

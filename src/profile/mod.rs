mod postgrest_profile_store;

use crate::domain::UserId;
use async_trait::async_trait;
pub use postgrest_profile_store::PostgrestProfileStore;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the push-delivery token registered for the given user.
    ///
    /// `Ok(None)` means the store holds no usable token: either no single
    /// profile row matched the id, or the token column is null.
    async fn push_token(&self, user_id: &UserId) -> Result<Option<String>, anyhow::Error>;
}

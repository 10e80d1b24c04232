use async_trait::async_trait;

use crate::{entities::identity::AuthContext, errors::AppError};

#[async_trait]
pub trait Authorizer: Send + Sync {
    /// `Ok(())` when the caller may create or modify annotations on images owned by `group`,
    /// `AppError::Forbidden` when not.
    async fn may_contribute_annotations(&self, auth: &AuthContext, group: &str) -> Result<(), AppError>;
}

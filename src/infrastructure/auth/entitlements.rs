use async_trait::async_trait;

use crate::{
    constants::ANNOTATION_CONTRIB_ENTITLEMENT,
    entities::identity::AuthContext,
    errors::AppError,
    repositories::authorizer::Authorizer,
};

/// Authorizes from the entitlements and groups asserted by the identity proxy.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntitlementAuthorizer;

impl EntitlementAuthorizer {
    pub fn new() -> Self {
        EntitlementAuthorizer
    }
}

#[async_trait]
impl Authorizer for EntitlementAuthorizer {
    async fn may_contribute_annotations(&self, auth: &AuthContext, group: &str) -> Result<(), AppError> {
        if auth.is_admin {
            return Ok(());
        }

        if !auth.has_entitlement(ANNOTATION_CONTRIB_ENTITLEMENT) {
            return Err(AppError::Forbidden(format!(
                "{} lacks the {} entitlement",
                auth.email, ANNOTATION_CONTRIB_ENTITLEMENT
            )));
        }

        if !auth.is_member_of(group) {
            return Err(AppError::Forbidden(format!("{} is not a member of group {}", auth.email, group)));
        }

        Ok(())
    }
}

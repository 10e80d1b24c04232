use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::{
    constants::{ADMIN_ENTITLEMENT, HEADER_LIST_SEPARATOR},
    errors::AppError,
};

/// Identity and capabilities of the caller, passed explicitly to every entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub email: String,
    pub is_admin: bool,
    pub groups: Vec<String>,
    pub entitlements: Vec<String>,
}

impl AuthContext {
    pub fn new(email: impl Into<String>) -> Self {
        AuthContext {
            email: email.into(),
            ..Default::default()
        }
    }

    /// Builds a context from `|`-separated group and entitlement lists.
    pub fn from_header_values(email: &str, groups: &str, entitlements: &str) -> Self {
        let entitlements = split_list(entitlements);
        AuthContext {
            email: email.trim().to_string(),
            is_admin: entitlements.iter().any(|e| e == ADMIN_ENTITLEMENT),
            groups: split_list(groups),
            entitlements,
        }
    }

    pub fn with_groups<I, T>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_entitlements<I, T>(mut self, entitlements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.entitlements = entitlements.into_iter().map(Into::into).collect();
        self
    }

    pub fn as_admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    pub fn has_entitlement(&self, entitlement: &str) -> bool {
        self.entitlements.iter().any(|e| e == entitlement)
    }

    pub fn is_member_of(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(HEADER_LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Per-call context: who is calling, and until when the call may run.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub auth: AuthContext,
    pub deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new(auth: AuthContext) -> Self {
        RequestContext { auth, deadline: None }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Runs `fut` under the deadline, if any. Expiry drops the future, rolling back
    /// any transaction it held.
    pub async fn bounded<F, T>(&self, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, fut).await?,
            None => fut.await,
        }
    }
}

use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{
    constants::{EMAIL_HEADER, ENTITLEMENTS_HEADER, GROUPS_HEADER},
    entities::identity::AuthContext,
    errors::AppError,
};

/// Caller identity as asserted by the authenticating proxy in front of the service.
/// Rejects the request with 403 when no email header is present.
/// Usage: Add `identity: Identity` as a parameter to your handler function.
#[derive(Debug)]
pub struct Identity(pub AuthContext);

fn header<'a>(req: &'a HttpRequest, name: &str) -> &'a str {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let email = header(req, EMAIL_HEADER).trim();
        if email.is_empty() {
            return ready(Err(AppError::Forbidden(format!("missing {} header", EMAIL_HEADER))));
        }

        ready(Ok(Identity(AuthContext::from_header_values(
            email,
            header(req, GROUPS_HEADER),
            header(req, ENTITLEMENTS_HEADER),
        ))))
    }
}

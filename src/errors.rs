use std::borrow::Cow;
use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use validator::ValidationErrors;

/// Error kinds surfaced by the annotation engine.
///
/// Callers branch on the variant; the message carries the operation context
/// accumulated through [`AppError::context`].
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    Forbidden(String),
    ForbiddenLabel(String),
    Conflict(String),
    Dependency(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "not found: {}", msg),
            AppError::Forbidden(msg) => write!(f, "forbidden: {}", msg),
            AppError::ForbiddenLabel(msg) => write!(f, "forbidden label: {}", msg),
            AppError::Conflict(msg) => write!(f, "conflict: {}", msg),
            AppError::Dependency(msg) => write!(f, "dependency error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Prefixes the message with `ctx` while keeping the error kind.
    pub fn context(self, ctx: impl fmt::Display) -> Self {
        let wrap = |msg: String| format!("{ctx}: {msg}");
        match self {
            AppError::Validation(msg) => AppError::Validation(wrap(msg)),
            AppError::NotFound(msg) => AppError::NotFound(wrap(msg)),
            AppError::Forbidden(msg) => AppError::Forbidden(wrap(msg)),
            AppError::ForbiddenLabel(msg) => AppError::ForbiddenLabel(wrap(msg)),
            AppError::Conflict(msg) => AppError::Conflict(wrap(msg)),
            AppError::Dependency(msg) => AppError::Dependency(wrap(msg)),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Stable machine-readable code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::Forbidden(_) => "forbidden",
            AppError::ForbiddenLabel(_) => "forbidden_label",
            AppError::Conflict(_) => "conflict",
            AppError::Dependency(_) => "dependency_error",
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = serde_json::json!({
            "error": self.code(),
            "message": self.to_string()
        });
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::ForbiddenLabel(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Dependency(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "invalid value".to_string());
                    format!("{}: {}", field, message)
                })
            })
            .collect::<Vec<_>>();
        messages.sort();

        AppError::Validation(messages.join(", "))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".into()),
            sqlx::Error::Database(e) if e.code() == Some(Cow::Borrowed("23505")) => {
                AppError::Conflict("unique constraint violated".into())
            }
            sqlx::Error::Database(e) if e.code() == Some(Cow::Borrowed("23503")) => {
                AppError::Conflict("foreign key violation".into())
            }
            _ => AppError::Dependency(format!("database error: {}", err))
        }
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::Validation(format!("invalid id: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Dependency(format!("configuration error: {}", err))
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::Dependency("operation deadline exceeded".into())
    }
}

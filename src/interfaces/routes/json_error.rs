use actix_web::web;

use crate::errors::AppError;

/// Malformed bodies and query strings are answered like any other validation failure.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("JSON payload error: {}", err)).into()
    }));
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("query string error: {}", err)).into()
    }));
}

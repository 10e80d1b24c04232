use actix_web::web;

use crate::{
    handlers::system,
    repositories::{authorizer::Authorizer, store::Store},
};

mod annotator;
mod json_error;

pub fn configure_routes<S, A>(cfg: &mut web::ServiceConfig)
where
    S: Store + 'static,
    A: Authorizer + 'static,
{
    cfg.route("/health", web::get().to(system::health_check::<S, A>));

    cfg.service(
        web::scope("/api/v1")
            .configure(annotator::config_routes::<S, A>)
    );

    cfg.configure(json_error::config_routes);
}

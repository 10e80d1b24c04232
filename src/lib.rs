use std::time::Duration;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{colorizer, entities, rescaler, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{auth, db, utils};

use auth::entitlements::EntitlementAuthorizer;
use entities::identity::{AuthContext, RequestContext};
use repositories::{authorizer::Authorizer, sqlx_repo::SqlxStore, store::Store};
use rescaler::Rescaler;
use use_cases::annotator::AnnotatorHandler;

pub struct AppState<S = SqlxStore, A = EntitlementAuthorizer>
where
    S: Store,
    A: Authorizer,
{
    pub annotator: AnnotatorHandler<S, A>,
    /// Default deadline applied to every request.
    pub operation_timeout: Duration,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let store = SqlxStore::new(pool);
        let annotator = AnnotatorHandler::new(
            store,
            EntitlementAuthorizer::new(),
            Rescaler::new(config.target_image_width),
        );

        AppState {
            annotator,
            operation_timeout: config.operation_timeout(),
        }
    }
}

impl<S, A> AppState<S, A>
where
    S: Store,
    A: Authorizer,
{
    pub fn with_annotator(annotator: AnnotatorHandler<S, A>, operation_timeout: Duration) -> Self {
        AppState {
            annotator,
            operation_timeout,
        }
    }

    pub fn request_context(&self, auth: AuthContext) -> RequestContext {
        RequestContext::new(auth).with_timeout(self.operation_timeout)
    }
}

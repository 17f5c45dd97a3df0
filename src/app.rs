use std::sync::Arc;

use actix_web::{
    App, Error,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web,
};

use crate::auth::credentials::DemoCredentials;
use crate::auth::rate_limit::RateLimiter;
use crate::auth::token::TokenService;
use crate::config::AppConfig;
use crate::handlers;
use crate::models::store::UsulanStore;

/// Shared state handed to every worker. Cloning shares the underlying data.
#[derive(Clone)]
pub struct AppState {
    pub config: web::Data<AppConfig>,
    pub tokens: web::Data<TokenService>,
    pub store: web::Data<dyn UsulanStore>,
    pub credentials: web::Data<DemoCredentials>,
    pub limiter: web::Data<RateLimiter>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn UsulanStore>,
        credentials: DemoCredentials,
        limiter: RateLimiter,
    ) -> Self {
        let tokens = TokenService::new(&config.jwt_secret);
        AppState {
            config: web::Data::new(config),
            tokens: web::Data::new(tokens),
            store: web::Data::from(store),
            credentials: web::Data::new(credentials),
            limiter: web::Data::new(limiter),
        }
    }
}

/// The full application: state, extractor configs, routes and 404 fallback.
pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state.config)
        .app_data(state.tokens)
        .app_data(state.store)
        .app_data(state.credentials)
        .app_data(state.limiter)
        .app_data(handlers::json_config())
        .app_data(handlers::query_config())
        .configure(handlers::configure)
        .default_service(web::to(handlers::not_found))
}

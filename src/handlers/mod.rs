pub mod auth_handlers;
pub mod health_handlers;
pub mod master_handlers;
pub mod usulan_handlers;

use actix_web::{HttpResponse, middleware::from_fn, web};

use crate::auth::middleware::require_bearer;
use crate::errors::AppError;
use crate::responses::ApiResponse;

/// JSON body extractor config: malformed bodies get the standard envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Body request tidak valid: {err}")).into()
    })
}

/// Query-string extractor config, same treatment as bodies.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Parameter tidak valid: {err}")).into()
    })
}

/// Fallback for unknown routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error("Endpoint tidak ditemukan"))
}

/// Configure all routes. Only `/health` and `/api/auth/token` are public.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_handlers::health));
    cfg.service(
        web::scope("/api")
            .service(
                web::resource("/auth/token")
                    .route(web::get().to(auth_handlers::token_docs))
                    .route(web::post().to(auth_handlers::issue_token)),
            )
            .service(
                web::scope("")
                    .wrap(from_fn(require_bearer))
                    .route("/master", web::get().to(master_handlers::index))
                    .route("/usulan", web::get().to(usulan_handlers::list))
                    .route("/usulan", web::post().to(usulan_handlers::create))
                    .route("/usulan/{id}", web::get().to(usulan_handlers::read))
                    .route("/usulan/{id}", web::put().to(usulan_handlers::update))
                    .route("/usulan/{id}", web::delete().to(usulan_handlers::delete)),
            ),
    );
}

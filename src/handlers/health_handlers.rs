use actix_web::{HttpResponse, web};

use crate::models::store::{StoreError, UsulanStore};
use crate::responses::ApiResponse;

/// GET /health - Reports whether the record store can be reached.
pub async fn health(store: web::Data<dyn UsulanStore>) -> HttpResponse {
    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::ok(
            "Service berjalan",
            serde_json::json!({ "database": "connected" }),
        )),
        Err(StoreError::Unavailable) => HttpResponse::ServiceUnavailable().json(ApiResponse {
            success: false,
            message: StoreError::Unavailable.to_string(),
            data: Some(serde_json::json!({ "database": "unavailable" })),
        }),
        Err(e) => {
            log::error!("Health check failed: {e}");
            HttpResponse::ServiceUnavailable().json(ApiResponse {
                success: false,
                message: e.to_string(),
                data: Some(serde_json::json!({ "database": "error" })),
            })
        }
    }
}

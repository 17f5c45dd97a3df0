use actix_web::{HttpResponse, web};

use crate::errors::AppError;
use crate::models::master::MasterData;
use crate::models::store::UsulanStore;
use crate::responses::ApiResponse;

/// GET /api/master - SKPD, periods and statuses for the proposal form.
pub async fn index(store: web::Data<dyn UsulanStore>) -> Result<HttpResponse, AppError> {
    let (skpd, periode, status_usulan) = tokio::try_join!(
        store.list_skpd(),
        store.list_periode(),
        store.list_status(),
    )
    .map_err(AppError::store("Gagal mengambil master data"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Master data berhasil diambil",
        MasterData { skpd, periode, status_usulan },
    )))
}

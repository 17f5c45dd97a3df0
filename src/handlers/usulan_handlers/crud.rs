use actix_web::{HttpResponse, web};

use super::validate;
use super::{MSG_INVALID_ID, MSG_NOT_FOUND};
use crate::auth::token::IdentityClaim;
use crate::errors::AppError;
use crate::models::store::UsulanStore;
use crate::models::usulan::UsulanChanges;
use crate::responses::ApiResponse;

const CTX_READ: &str = "Gagal mengambil detail usulan";
const CTX_CREATE: &str = "Gagal menyimpan usulan";
const CTX_UPDATE: &str = "Gagal memperbarui usulan";
const CTX_DELETE: &str = "Gagal menghapus usulan";

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation(MSG_INVALID_ID.to_string()))
}

fn not_found() -> AppError {
    AppError::NotFound(MSG_NOT_FOUND.to_string())
}

/// GET /api/usulan/{id}
pub async fn read(
    store: web::Data<dyn UsulanStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;

    let usulan = store
        .find_by_id(id)
        .await
        .map_err(AppError::store(CTX_READ))?
        .ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Detail usulan berhasil diambil", usulan)))
}

/// POST /api/usulan - Create a proposal with at least one image.
pub async fn create(
    store: web::Data<dyn UsulanStore>,
    user: web::ReqData<IdentityClaim>,
    body: web::Json<UsulanChanges>,
) -> Result<HttpResponse, AppError> {
    let new = validate::validate_create(&body).map_err(AppError::Validation)?;

    let created = store
        .create(&new)
        .await
        .map_err(AppError::store(CTX_CREATE))?;

    log::info!(
        "usulan {} created by {} with {} gambar",
        created.id,
        user.email,
        created.gambar_usulan.len()
    );

    Ok(HttpResponse::Created().json(ApiResponse::ok("Usulan berhasil disimpan", created)))
}

/// PUT /api/usulan/{id} - Partial update; a present `gambar` replaces all images.
pub async fn update(
    store: web::Data<dyn UsulanStore>,
    user: web::ReqData<IdentityClaim>,
    path: web::Path<String>,
    body: web::Json<UsulanChanges>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let changes = validate::validate_update(&body).map_err(AppError::Validation)?;

    // The store treats a missing row as a silent no-op, so check first.
    store
        .find_by_id(id)
        .await
        .map_err(AppError::store(CTX_UPDATE))?
        .ok_or_else(not_found)?;

    let updated = store
        .update(id, &changes)
        .await
        .map_err(AppError::store(CTX_UPDATE))?
        .ok_or_else(not_found)?;

    log::info!("usulan {id} updated by {}", user.email);

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Usulan berhasil diperbarui", updated)))
}

/// DELETE /api/usulan/{id} - Soft delete.
pub async fn delete(
    store: web::Data<dyn UsulanStore>,
    user: web::ReqData<IdentityClaim>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;

    store
        .find_by_id(id)
        .await
        .map_err(AppError::store(CTX_DELETE))?
        .ok_or_else(not_found)?;

    let deleted = store
        .soft_delete(id)
        .await
        .map_err(AppError::store(CTX_DELETE))?;
    if !deleted {
        return Err(not_found());
    }

    log::info!("usulan {id} deleted by {}", user.email);

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Usulan berhasil dihapus",
        serde_json::json!({ "id": id }),
    )))
}

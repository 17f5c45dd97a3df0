use std::collections::HashMap;
use std::str::FromStr;

use actix_web::{HttpResponse, web};

use crate::errors::AppError;
use crate::models::pagination;
use crate::models::store::UsulanStore;
use crate::models::usulan::UsulanQuery;
use crate::responses::ApiResponse;

/// Parse an optional numeric query parameter. Absent or empty means "not given".
fn parse_param<T: FromStr>(query: &HashMap<String, String>, name: &str) -> Result<Option<T>, AppError> {
    match query.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Parameter {name} harus berupa angka"))),
    }
}

/// Build listing filters from `?tahun=&status_id=&skpd_id=&search=&page=&limit=`.
pub fn parse_list_query(query: &HashMap<String, String>) -> Result<UsulanQuery, AppError> {
    let page = parse_param::<i64>(query, "page")?.unwrap_or(pagination::DEFAULT_PAGE);
    let limit = parse_param::<i64>(query, "limit")?.unwrap_or(pagination::DEFAULT_LIMIT);
    let (page, limit) = pagination::normalize(page, limit);

    Ok(UsulanQuery {
        tahun: parse_param::<i32>(query, "tahun")?,
        status_id: parse_param::<i64>(query, "status_id")?,
        skpd_id: parse_param::<i64>(query, "skpd_id")?,
        search: query
            .get("search")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        page,
        limit,
    })
}

/// GET /api/usulan - Visible proposals, newest first, filtered and paginated.
pub async fn list(
    store: web::Data<dyn UsulanStore>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let filters = parse_list_query(&query)?;

    let page = store
        .list(&filters)
        .await
        .map_err(AppError::store("Gagal mengambil data usulan"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Data usulan berhasil diambil", page)))
}

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use crate::models::store::StoreError;
use crate::responses::ApiResponse;

pub const MSG_TOKEN_MISSING: &str =
    "Token authorization diperlukan. Sertakan header: Authorization: Bearer <token>";
pub const MSG_TOKEN_INVALID: &str = "Token tidak valid atau sudah expired";
pub const MSG_AUTH_INTERNAL: &str = "Terjadi kesalahan dalam proses authentication";
pub const MSG_TOO_MANY_ATTEMPTS: &str =
    "Terlalu banyak percobaan login. Silakan coba lagi nanti.";

/// Every failure a request can end in. Rendered as `{success: false, message}`.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    Unauthorized(String),
    AuthInternal,
    NotFound(String),
    /// Record store failure; `context` is the localized "what we were doing" prefix.
    Store { context: &'static str, source: StoreError },
    TooManyRequests,
    Internal(String),
}

impl AppError {
    /// Adapter for `map_err`: `store.list(&q).await.map_err(AppError::store("Gagal ..."))`.
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |source| AppError::Store { context, source }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "{msg}"),
            AppError::Unauthorized(msg) => write!(f, "{msg}"),
            AppError::AuthInternal => write!(f, "{MSG_AUTH_INTERNAL}"),
            AppError::NotFound(msg) => write!(f, "{msg}"),
            AppError::Store { context, source } => write!(f, "{context}: {source}"),
            AppError::TooManyRequests => write!(f, "{MSG_TOO_MANY_ATTEMPTS}"),
            AppError::Internal(msg) => write!(f, "{msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            AppError::Store { source: StoreError::Unavailable, .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Store { .. } | AppError::AuthInternal | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{self}");
        }
        HttpResponse::build(status).json(ApiResponse::error(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_carry_context_prefix() {
        let err = AppError::store("Gagal mengambil data usulan")(StoreError::Db(
            sqlx::Error::RowNotFound,
        ));
        assert!(err.to_string().starts_with("Gagal mengambil data usulan: Database error:"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unavailable_backend_is_service_unavailable() {
        let err = AppError::store("Gagal mengambil master data")(StoreError::Unavailable);
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn status_codes_per_kind() {
        assert_eq!(AppError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::AuthInternal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::TooManyRequests.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }
}

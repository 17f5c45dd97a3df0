use std::net::{IpAddr, Ipv4Addr};

use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::auth::credentials::DemoCredentials;
use crate::auth::rate_limit::RateLimiter;
use crate::auth::token::{IdentityClaim, TOKEN_TTL_LABEL, TokenService};
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::responses::ApiResponse;

#[derive(Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: IdentityClaim,
    pub expires_in: &'static str,
}

/// POST /api/auth/token - Exchange the demo credentials for a bearer token.
pub async fn issue_token(
    req: HttpRequest,
    credentials: web::Data<DemoCredentials>,
    tokens: web::Data<TokenService>,
    limiter: web::Data<RateLimiter>,
    body: web::Json<TokenRequest>,
) -> Result<HttpResponse, AppError> {
    let email = body.email.as_deref().unwrap_or("").trim();
    let password = body.password.as_deref().unwrap_or("");
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation("Email dan password diperlukan".to_string()));
    }

    // Rate-limit check BEFORE the (deliberately slow) password verification
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if limiter.is_blocked(ip) {
        log::warn!("Token request from {ip} blocked by rate limiter");
        return Err(AppError::TooManyRequests);
    }

    let Some(user) = credentials.check(email, password) else {
        limiter.record_failure(ip);
        return Err(AppError::Unauthorized("Email atau password tidak valid".to_string()));
    };
    limiter.clear(ip);

    let token = tokens.issue(&user).map_err(|e| {
        log::error!("Token generation error: {e}");
        AppError::Internal("Terjadi kesalahan dalam membuat token".to_string())
    })?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Token berhasil dibuat",
        TokenResponse {
            token,
            user,
            expires_in: TOKEN_TTL_LABEL,
        },
    )))
}

/// GET /api/auth/token - Usage notes for the token endpoint.
pub async fn token_docs(config: web::Data<AppConfig>) -> HttpResponse {
    let docs = serde_json::json!({
        "endpoint": format!("{}/api/auth/token", config.public_base_url),
        "method": "POST",
        "description": "Generate JWT token untuk API authorization",
        "body": {
            "email": "string (required)",
            "password": "string (required)"
        },
        "demo_credentials": {
            "email": config.demo_email,
            "password": config.demo_password
        },
        "response": {
            "success": "boolean",
            "message": "string",
            "data": {
                "token": "JWT token string",
                "user": "user object",
                "expires_in": TOKEN_TTL_LABEL
            }
        },
        "usage": "Gunakan token dalam header: Authorization: Bearer <token>"
    });

    HttpResponse::Ok().json(ApiResponse::ok(
        "Endpoint untuk generate authentication token",
        docs,
    ))
}

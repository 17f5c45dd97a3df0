use actix_web::{
    Error, HttpMessage, HttpRequest, ResponseError, web,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::AUTHORIZATION,
    middleware::Next,
};

use crate::auth::token::{IdentityClaim, TokenService};
use crate::errors::{AppError, MSG_TOKEN_INVALID, MSG_TOKEN_MISSING};

/// Pull the token out of `Bearer <token>`: exactly two space-separated parts,
/// case-sensitive scheme.
pub fn extract_bearer(authorization: Option<&str>) -> Option<&str> {
    let header = authorization?;
    let mut parts = header.split(' ');
    let (scheme, token) = (parts.next()?, parts.next()?);
    if parts.next().is_some() || scheme != "Bearer" || token.is_empty() {
        return None;
    }
    Some(token)
}

/// Resolve the caller's identity from the `Authorization` header.
///
/// Authorization is binary: any valid token grants access to every protected
/// route. The role travels with the claim but is not checked here.
pub fn authenticate(req: &HttpRequest) -> Result<IdentityClaim, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = extract_bearer(header)
        .ok_or_else(|| AppError::Unauthorized(MSG_TOKEN_MISSING.to_string()))?;

    let tokens = req.app_data::<web::Data<TokenService>>().ok_or_else(|| {
        log::error!("TokenService missing from app data");
        AppError::AuthInternal
    })?;

    tokens
        .verify(token)
        .ok_or_else(|| AppError::Unauthorized(MSG_TOKEN_INVALID.to_string()))
}

/// Middleware for the protected API scope. Rejects with the JSON envelope,
/// otherwise stores the claim in request extensions (`web::ReqData<IdentityClaim>`).
pub async fn require_bearer(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    match authenticate(req.request()) {
        Ok(claim) => {
            req.extensions_mut().insert(claim);
            next.call(req).await.map(|res| res.map_into_left_body())
        }
        Err(e) => {
            let response = e.error_response();
            Ok(req.into_response(response).map_into_right_body())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn bearer_with_token_is_accepted() {
        assert_eq!(extract_bearer(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn malformed_headers_are_rejected() {
        assert_eq!(extract_bearer(None), None);
        assert_eq!(extract_bearer(Some("")), None);
        assert_eq!(extract_bearer(Some("Bearer")), None);
        assert_eq!(extract_bearer(Some("Bearerabc")), None);
        assert_eq!(extract_bearer(Some("bearer abc")), None);
        assert_eq!(extract_bearer(Some("Basic abc")), None);
        assert_eq!(extract_bearer(Some("Bearer abc def")), None);
        assert_eq!(extract_bearer(Some("Bearer  abc")), None);
        assert_eq!(extract_bearer(Some("Bearer ")), None);
    }

    #[test]
    fn missing_header_fails_before_token_service_lookup() {
        // No TokenService registered: a malformed header must still yield 401, not 500.
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Token abc"))
            .to_http_request();
        match authenticate(&req) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, MSG_TOKEN_MISSING),
            other => panic!("expected 401, got {other:?}"),
        }
    }

    #[test]
    fn missing_token_service_is_internal_error() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer abc"))
            .to_http_request();
        assert!(matches!(authenticate(&req), Err(AppError::AuthInternal)));
    }

    #[test]
    fn invalid_token_has_distinct_message() {
        let req = TestRequest::default()
            .app_data(web::Data::new(TokenService::new("k")))
            .insert_header((AUTHORIZATION, "Bearer abc"))
            .to_http_request();
        match authenticate(&req) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, MSG_TOKEN_INVALID),
            other => panic!("expected 401, got {other:?}"),
        }
    }

    #[test]
    fn valid_token_yields_claim() {
        let tokens = TokenService::new("k");
        let claim = IdentityClaim {
            user_id: "7".into(),
            email: "ops@example.id".into(),
            role: None,
        };
        let token = tokens.issue(&claim).expect("issue");
        let req = TestRequest::default()
            .app_data(web::Data::new(tokens))
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_http_request();
        assert_eq!(authenticate(&req).expect("auth"), claim);
    }
}

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const TOKEN_ISSUER: &str = "usulan-asmas-app";
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;
pub const TOKEN_TTL_LABEL: &str = "24h";

/// Identity carried inside a signed token. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Wire form of the token payload: the identity plus registered claims.
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    #[serde(rename = "userId")]
    user_id: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    iss: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256 tokens with a fixed issuer and 24-hour lifetime.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        TokenService {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, claim: &IdentityClaim) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(claim, chrono::Utc::now().timestamp())
    }

    /// Issue a token as if signed at `issued_at` (unix seconds).
    pub fn issue_at(
        &self,
        claim: &IdentityClaim,
        issued_at: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = TokenClaims {
            user_id: claim.user_id.clone(),
            email: claim.email.clone(),
            role: claim.role.clone(),
            iss: TOKEN_ISSUER.to_string(),
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECS,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Returns the claim only for a well-formed, correctly signed, unexpired token.
    /// Failures are logged and collapse to `None`.
    pub fn verify(&self, token: &str) -> Option<IdentityClaim> {
        match decode::<TokenClaims>(token, &self.decoding, &self.validation) {
            Ok(data) => Some(IdentityClaim {
                user_id: data.claims.user_id,
                email: data.claims.email,
                role: data.claims.role,
            }),
            Err(e) => {
                log::warn!("Token verification failed: {e}");
                None
            }
        }
    }
}

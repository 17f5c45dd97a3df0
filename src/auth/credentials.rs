use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::auth::token::IdentityClaim;

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| e.to_string())?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| e.to_string())?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// The single demo account allowed to request tokens. Only the argon2 hash of
/// the password is kept after start-up.
#[derive(Debug, Clone)]
pub struct DemoCredentials {
    email: String,
    password_hash: String,
    user_id: String,
    role: String,
}

impl DemoCredentials {
    pub fn new(email: &str, password: &str, user_id: &str, role: &str) -> Result<Self, String> {
        Ok(DemoCredentials {
            email: email.to_string(),
            password_hash: hash_password(password)?,
            user_id: user_id.to_string(),
            role: role.to_string(),
        })
    }

    /// Claim for the demo account if `email`/`password` match it.
    pub fn check(&self, email: &str, password: &str) -> Option<IdentityClaim> {
        if email != self.email {
            return None;
        }
        match verify_password(password, &self.password_hash) {
            Ok(true) => Some(self.claim()),
            Ok(false) => None,
            Err(e) => {
                log::error!("Stored demo password hash is unusable: {e}");
                None
            }
        }
    }

    pub fn claim(&self) -> IdentityClaim {
        IdentityClaim {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            role: Some(self.role.clone()),
        }
    }
}

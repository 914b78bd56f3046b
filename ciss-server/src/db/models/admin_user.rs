//! Admin user model
//!
//! Registry operators who can log into the management console. Passwords are
//! stored as Argon2id hashes.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers::{bool_true, option_record_id};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(skip_serializing_if = "Option::is_none", with = "option_record_id")]
    #[serde(default)]
    pub id: Option<RecordId>,

    pub username: String,

    /// Argon2id password hash; never serialized to clients
    #[serde(skip_serializing)]
    #[serde(default)]
    pub hash_pass: String,

    /// Role name, "admin" or "viewer"
    pub role: String,

    #[serde(deserialize_with = "bool_true", default = "default_true")]
    pub is_active: bool,

    pub created_at: String,
}

fn default_true() -> bool {
    true
}

impl AdminUser {
    /// Hash a plaintext password with Argon2id
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Verify a plaintext password against the stored hash
    pub fn verify_password(&self, password: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash_pass) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = AdminUser::hash_password("s3cret-pass").unwrap();
        let user = AdminUser {
            id: None,
            username: "admin".to_string(),
            hash_pass: hash,
            role: "admin".to_string(),
            is_active: true,
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };
        assert!(user.verify_password("s3cret-pass"));
        assert!(!user.verify_password("wrong"));
    }

    #[test]
    fn test_hash_pass_not_serialized() {
        let user = AdminUser {
            id: None,
            username: "admin".to_string(),
            hash_pass: "secret-hash".to_string(),
            role: "admin".to_string(),
            is_active: true,
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}

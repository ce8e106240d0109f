use actix_web::web;
use bcrypt::{hash, verify};

use crate::error::AppError;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}

pub fn is_strong_enough(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// bcrypt hashing at a configured cost, run on the blocking thread pool so
/// request workers keep serving while a hash is computed.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: String) -> Result<String, AppError> {
        let cost = self.cost;
        web::block(move || hash_password(&password, cost)).await?
    }

    pub async fn verify(&self, password: String, hashed_password: String) -> Result<bool, AppError> {
        web::block(move || verify_password(&password, &hashed_password)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_password_hashing_and_verification() {
        let password = "test_password123";
        let hashed = hash_password(password, TEST_COST).unwrap();

        assert_ne!(hashed, password);
        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password", TEST_COST).unwrap();
        let b = hash_password("same-password", TEST_COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        match verify_password("test_password123", "invalidhashformat") {
            Err(AppError::InternalServerError(msg)) => {
                assert!(msg.contains("Failed to verify password"));
            }
            Ok(false) => {}
            Ok(true) => panic!("Password verification should fail for invalid hash format"),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }

    #[test]
    fn test_minimum_length_counts_characters() {
        assert!(!is_strong_enough("short"));
        assert!(is_strong_enough("sixsix"));
        assert!(is_strong_enough("éééééé"));
    }

    #[actix_rt::test]
    async fn test_hasher_runs_off_thread() {
        let hasher = PasswordHasher::new(TEST_COST);
        let hashed = hasher.hash("longenough".to_string()).await.unwrap();
        assert!(hasher.verify("longenough".to_string(), hashed.clone()).await.unwrap());
        assert!(!hasher.verify("other".to_string(), hashed).await.unwrap());
    }
}

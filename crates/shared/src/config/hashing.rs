use async_trait::async_trait;
use bcrypt::{BcryptError, hash, verify};

use crate::{abstract_trait::HashingTrait, utils::AppError};

#[derive(Clone)]
pub struct Hashing {
    cost: u32,
}

impl Hashing {
    pub fn new() -> Self {
        Hashing {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn with_cost(cost: u32) -> Self {
        Hashing { cost }
    }
}

impl Default for Hashing {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HashingTrait for Hashing {
    async fn hash_password(&self, password: &str) -> Result<String, BcryptError> {
        hash(password, self.cost)
    }

    async fn compare_password(
        &self,
        hashed_password: &str,
        password: &str,
    ) -> Result<(), AppError> {
        match verify(password, hashed_password) {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::InvalidCredentials),
            Err(e) => Err(AppError::BcryptError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashes_and_verifies_passwords() {
        let hashing = Hashing::with_cost(4);
        let hashed = hashing.hash_password("rahasia123").await.unwrap();

        assert!(hashing.compare_password(&hashed, "rahasia123").await.is_ok());
        assert!(matches!(
            hashing.compare_password(&hashed, "salah").await,
            Err(AppError::InvalidCredentials)
        ));
    }
}

use async_trait::async_trait;
use std::sync::Arc;

use crate::{domain::request::GoogleProfile, utils::AppError};

pub type DynOAuthProvider = Arc<dyn OAuthProviderTrait + Send + Sync>;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait OAuthProviderTrait {
    fn authorize_url(&self, state: &str) -> Result<String, AppError>;
    async fn exchange_code(&self, code: &str) -> Result<GoogleProfile, AppError>;
}

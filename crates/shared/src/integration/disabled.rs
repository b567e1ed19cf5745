use async_trait::async_trait;

use crate::{
    abstract_trait::{
        ChatProviderTrait, ChatStream, MediaStorageTrait, OAuthProviderTrait, PaymentGatewayTrait,
        SnapToken, SnapTransaction,
    },
    domain::request::{ChatMessage, GoogleProfile, MidtransNotification},
    utils::AppError,
};

/// Placeholder for an integration whose credentials are not configured.
#[derive(Debug, Clone)]
pub struct Disabled {
    name: &'static str,
}

impl Disabled {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }

    fn unavailable(&self) -> AppError {
        AppError::ServiceUnavailable(format!("{} is not configured", self.name))
    }
}

#[async_trait]
impl ChatProviderTrait for Disabled {
    async fn stream_chat(&self, _messages: Vec<ChatMessage>) -> Result<ChatStream, AppError> {
        Err(self.unavailable())
    }
}

#[async_trait]
impl PaymentGatewayTrait for Disabled {
    async fn create_transaction(&self, _input: &SnapTransaction) -> Result<SnapToken, AppError> {
        Err(self.unavailable())
    }

    fn verify_signature(&self, _notification: &MidtransNotification) -> bool {
        false
    }
}

#[async_trait]
impl MediaStorageTrait for Disabled {
    async fn upload_image(
        &self,
        _bytes: Vec<u8>,
        _file_name: &str,
        _folder: &str,
    ) -> Result<String, AppError> {
        Err(self.unavailable())
    }
}

#[async_trait]
impl OAuthProviderTrait for Disabled {
    fn authorize_url(&self, _state: &str) -> Result<String, AppError> {
        Err(self.unavailable())
    }

    async fn exchange_code(&self, _code: &str) -> Result<GoogleProfile, AppError> {
        Err(self.unavailable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn reports_service_unavailable() {
        let storage = Disabled::new("Cloudinary");
        let err = storage
            .upload_image(vec![1], "a.png", "folder")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.to_string().contains("Cloudinary"));
    }
}

use async_trait::async_trait;
use std::sync::Arc;

use crate::utils::AppError;

pub type DynMailer = Arc<dyn MailerTrait + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait MailerTrait {
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError>;
}

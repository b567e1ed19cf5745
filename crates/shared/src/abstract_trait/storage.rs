use async_trait::async_trait;
use std::sync::Arc;

use crate::utils::AppError;

pub type DynMediaStorage = Arc<dyn MediaStorageTrait + Send + Sync>;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait MediaStorageTrait {
    /// Uploads an image and returns its public HTTPS URL.
    async fn upload_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        folder: &str,
    ) -> Result<String, AppError>;
}

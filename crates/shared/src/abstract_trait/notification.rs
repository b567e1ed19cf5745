use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    domain::{
        request::FindAllNotificationRequest,
        response::{
            ApiResponse, ApiResponsePagination, ErrorResponse, MessageResponse,
            notification::{NotificationResponse, ReadAllResponse, UnreadCountResponse},
        },
    },
    model::notification::{Notification, NotificationKind},
    utils::AppError,
};

pub type DynNotificationRepository = Arc<dyn NotificationRepositoryTrait + Send + Sync>;
pub type DynNotificationService = Arc<dyn NotificationServiceTrait + Send + Sync>;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait NotificationRepositoryTrait {
    async fn create(
        &self,
        user_id: i32,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) -> Result<Notification, AppError>;
    async fn find_all(
        &self,
        user_id: i32,
        unread_only: bool,
        page: i32,
        page_size: i32,
    ) -> Result<(Vec<Notification>, i64), AppError>;
    async fn count_unread(&self, user_id: i32) -> Result<i64, AppError>;
    async fn mark_read(&self, user_id: i32, id: i32) -> Result<Option<Notification>, AppError>;
    async fn mark_all_read(&self, user_id: i32) -> Result<u64, AppError>;
    async fn delete(&self, user_id: i32, id: i32) -> Result<bool, AppError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait NotificationServiceTrait {
    /// Records a notification for `user_id`. Failures are logged and
    /// swallowed so callers never fail because of a side effect.
    async fn notify(&self, user_id: i32, kind: NotificationKind, title: &str, message: &str);
    async fn get_notifications(
        &self,
        user_id: i32,
        req: &FindAllNotificationRequest,
    ) -> Result<ApiResponsePagination<Vec<NotificationResponse>>, ErrorResponse>;
    async fn unread_count(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<UnreadCountResponse>, ErrorResponse>;
    async fn mark_read(
        &self,
        user_id: i32,
        id: i32,
    ) -> Result<ApiResponse<NotificationResponse>, ErrorResponse>;
    async fn mark_all_read(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<ReadAllResponse>, ErrorResponse>;
    async fn delete_notification(
        &self,
        user_id: i32,
        id: i32,
    ) -> Result<MessageResponse, ErrorResponse>;
}

use crate::{
    abstract_trait::{DynNotificationRepository, NotificationServiceTrait},
    domain::{
        request::{FindAllNotificationRequest, normalize_page},
        response::{
            ApiResponse, ApiResponsePagination, ErrorResponse, MessageResponse,
            notification::{NotificationResponse, ReadAllResponse, UnreadCountResponse},
            pagination::Pagination,
        },
    },
    model::notification::NotificationKind,
    utils::{AppError, Method, Metrics, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct NotificationService {
    repository: DynNotificationRepository,
    tracer: ServiceTracer,
}

impl NotificationService {
    pub fn new(repository: DynNotificationRepository, metrics: Arc<Metrics>) -> Self {
        Self {
            repository,
            tracer: ServiceTracer::new("notification-service", metrics),
        }
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    async fn notify(&self, user_id: i32, kind: NotificationKind, title: &str, message: &str) {
        match self.repository.create(user_id, kind, title, message).await {
            Ok(notification) => info!(
                "Created {} notification {} for user {user_id}",
                kind.as_str(),
                notification.notification_id
            ),
            Err(err) => error!(
                "Failed to create {} notification for user {user_id}: {err}",
                kind.as_str()
            ),
        }
    }

    async fn get_notifications(
        &self,
        user_id: i32,
        req: &FindAllNotificationRequest,
    ) -> Result<ApiResponsePagination<Vec<NotificationResponse>>, ErrorResponse> {
        let (page, page_size) = normalize_page(req.page, req.page_size);

        let tracing_ctx = self.tracer.start_tracing(
            "GetNotifications",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("unread_only", req.unread_only),
            ],
        );

        let result = self
            .repository
            .find_all(user_id, req.unread_only, page, page_size)
            .await;
        let (notifications, total) = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Notifications retrieved successfully",
        )?;

        Ok(ApiResponsePagination::success(
            "Notifications retrieved successfully",
            notifications
                .into_iter()
                .map(NotificationResponse::from)
                .collect(),
            Pagination::new(page, page_size, total),
        ))
    }

    async fn unread_count(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<UnreadCountResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "UnreadCount",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        let result = self.repository.count_unread(user_id).await;
        let unread = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Unread count retrieved successfully",
        )?;

        Ok(ApiResponse::success(
            "Unread count retrieved successfully",
            UnreadCountResponse { unread },
        ))
    }

    async fn mark_read(
        &self,
        user_id: i32,
        id: i32,
    ) -> Result<ApiResponse<NotificationResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "MarkNotificationRead",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("notification_id", id.to_string()),
            ],
        );

        let result = match self.repository.mark_read(user_id, id).await {
            Ok(Some(notification)) => Ok(notification),
            Ok(None) => Err(AppError::NotFound(format!("Notification {id} not found"))),
            Err(err) => Err(err),
        };

        let notification = self.tracer.finish(
            &tracing_ctx,
            Method::Patch,
            result,
            "Notification marked as read",
        )?;

        Ok(ApiResponse::success(
            "Notification marked as read",
            NotificationResponse::from(notification),
        ))
    }

    async fn mark_all_read(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<ReadAllResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "MarkAllNotificationsRead",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        let result = self.repository.mark_all_read(user_id).await;
        let updated = self.tracer.finish(
            &tracing_ctx,
            Method::Patch,
            result,
            "All notifications marked as read",
        )?;

        Ok(ApiResponse::success(
            "All notifications marked as read",
            ReadAllResponse { updated },
        ))
    }

    async fn delete_notification(
        &self,
        user_id: i32,
        id: i32,
    ) -> Result<MessageResponse, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "DeleteNotification",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("notification_id", id.to_string()),
            ],
        );

        let result = match self.repository.delete(user_id, id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::NotFound(format!("Notification {id} not found"))),
            Err(err) => Err(err),
        };

        self.tracer.finish(
            &tracing_ctx,
            Method::Delete,
            result,
            "Notification deleted successfully",
        )?;

        Ok(MessageResponse::success("Notification deleted successfully"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstract_trait::MockNotificationRepositoryTrait;
    use axum::http::StatusCode;

    fn service(repo: MockNotificationRepositoryTrait) -> NotificationService {
        NotificationService::new(Arc::new(repo), Arc::new(Metrics::new()))
    }

    #[tokio::test]
    async fn notify_swallows_repository_errors() {
        let mut repo = MockNotificationRepositoryTrait::new();
        repo.expect_create()
            .times(1)
            .returning(|_, _, _, _| Err(AppError::InternalError("db down".into())));

        service(repo)
            .notify(1, NotificationKind::System, "Hello", "World")
            .await;
    }

    #[tokio::test]
    async fn marking_foreign_notification_is_not_found() {
        let mut repo = MockNotificationRepositoryTrait::new();
        repo.expect_mark_read().returning(|_, _| Ok(None));

        let err = service(repo).mark_read(1, 99).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn read_all_reports_updated_rows() {
        let mut repo = MockNotificationRepositoryTrait::new();
        repo.expect_mark_all_read().returning(|_| Ok(4));

        let response = service(repo).mark_all_read(1).await.unwrap();
        assert_eq!(response.data.updated, 4);
    }

    #[tokio::test]
    async fn page_size_is_clamped_before_querying() {
        let mut repo = MockNotificationRepositoryTrait::new();
        repo.expect_find_all()
            .withf(|_, unread_only, page, page_size| *unread_only && *page == 1 && *page_size == 100)
            .returning(|_, _, _, _| Ok((vec![], 0)));

        let req = FindAllNotificationRequest {
            unread_only: true,
            page: 0,
            page_size: 500,
        };

        let response = service(repo).get_notifications(1, &req).await.unwrap();
        assert_eq!(response.pagination.total_items, 0);
    }
}

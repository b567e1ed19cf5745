use crate::{
    abstract_trait::{
        AvatarUpload, DynHashing, DynMediaStorage, DynUserRepository, UserServiceTrait,
    },
    domain::{
        request::{ChangePasswordRequest, UpdateProfileRequest},
        response::{
            ApiResponse, ErrorResponse, MessageResponse,
            user::{AvatarResponse, UserResponse},
        },
    },
    model::user::User,
    utils::{AppError, Method, Metrics, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use std::sync::Arc;
use tracing::{error, info};

pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;
const AVATAR_FOLDER: &str = "home-sweet-loan/avatars";

#[derive(Clone)]
pub struct UserService {
    repository: DynUserRepository,
    hashing: DynHashing,
    storage: DynMediaStorage,
    tracer: ServiceTracer,
}

impl UserService {
    pub fn new(
        repository: DynUserRepository,
        hashing: DynHashing,
        storage: DynMediaStorage,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            repository,
            hashing,
            storage,
            tracer: ServiceTracer::new("user-service", metrics),
        }
    }

    async fn find_user(&self, user_id: i32) -> Result<User, AppError> {
        self.repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn change(&self, user_id: i32, input: &ChangePasswordRequest) -> Result<(), AppError> {
        let user = self.find_user(user_id).await?;

        if let Some(stored) = user.password.as_deref() {
            let current = input
                .current_password
                .as_deref()
                .filter(|p| !p.is_empty())
                .ok_or_else(|| AppError::BadRequest("Current password is required".to_string()))?;

            match self.hashing.compare_password(stored, current).await {
                Ok(()) => {}
                Err(AppError::InvalidCredentials) => {
                    return Err(AppError::BadRequest(
                        "Current password is incorrect".to_string(),
                    ));
                }
                Err(err) => return Err(err),
            }
        }

        let hashed = self.hashing.hash_password(&input.new_password).await?;
        self.repository.update_password(user_id, &hashed).await
    }

    async fn store_avatar(&self, user_id: i32, upload: AvatarUpload) -> Result<String, AppError> {
        if !upload.content_type.starts_with("image/") {
            return Err(AppError::BadRequest("Avatar must be an image".to_string()));
        }

        if upload.bytes.is_empty() {
            return Err(AppError::BadRequest("Avatar file is empty".to_string()));
        }

        if upload.bytes.len() > MAX_AVATAR_BYTES {
            return Err(AppError::BadRequest(
                "Avatar must be at most 5 MiB".to_string(),
            ));
        }

        let url = self
            .storage
            .upload_image(upload.bytes, &upload.file_name, AVATAR_FOLDER)
            .await?;

        let user = self.repository.update_avatar(user_id, &url).await?;

        Ok(user.avatar_url.unwrap_or(url))
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn get_profile(&self, user_id: i32) -> Result<ApiResponse<UserResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "GetProfile",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        let result = self.find_user(user_id).await;
        let user = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Profile retrieved successfully",
        )?;

        Ok(ApiResponse::success(
            "Profile retrieved successfully",
            UserResponse::from(user),
        ))
    }

    async fn update_profile(
        &self,
        user_id: i32,
        input: &UpdateProfileRequest,
    ) -> Result<ApiResponse<UserResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "UpdateProfile",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        let result = self.repository.update_profile(user_id, input).await;
        let user = self.tracer.finish(
            &tracing_ctx,
            Method::Patch,
            result,
            "Profile updated successfully",
        )?;

        Ok(ApiResponse::success(
            "Profile updated successfully",
            UserResponse::from(user),
        ))
    }

    async fn change_password(
        &self,
        user_id: i32,
        input: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "ChangePassword",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        let result = self.change(user_id, input).await;
        self.tracer.finish(
            &tracing_ctx,
            Method::Patch,
            result,
            "Password changed successfully",
        )?;

        Ok(MessageResponse::success("Password changed successfully"))
    }

    async fn upload_avatar(
        &self,
        user_id: i32,
        upload: AvatarUpload,
    ) -> Result<ApiResponse<AvatarResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "UploadAvatar",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("size", upload.bytes.len() as i64),
            ],
        );

        let result = self.store_avatar(user_id, upload).await;
        let avatar_url = self.tracer.finish(
            &tracing_ctx,
            Method::Post,
            result,
            "Avatar uploaded successfully",
        )?;

        Ok(ApiResponse::success(
            "Avatar uploaded successfully",
            AvatarResponse { avatar_url },
        ))
    }

    async fn delete_account(&self, user_id: i32) -> Result<MessageResponse, ErrorResponse> {
        let method = Method::Delete;
        let tracing_ctx = self.tracer.start_tracing(
            "DeleteAccount",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        match self.repository.delete_user(user_id).await {
            Ok(()) => {
                info!("Deleted account {user_id}");
                self.tracer.complete_tracing_success(
                    &tracing_ctx,
                    method,
                    "Account deleted successfully",
                );
                Ok(MessageResponse::success("Account deleted successfully"))
            }
            Err(err) => {
                error!("Failed to delete account {user_id}: {err}");
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, &err.to_string());
                Err(ErrorResponse::from(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstract_trait::{
        MockHashingTrait, MockMediaStorageTrait, MockUserRepositoryTrait,
    };
    use axum::http::StatusCode;

    fn user(password: Option<&str>) -> User {
        User {
            user_id: 1,
            name: "Budi".into(),
            email: "budi@example.com".into(),
            password: password.map(str::to_string),
            google_id: None,
            avatar_url: None,
            phone: None,
            refresh_token_hash: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn change_request(current: Option<&str>) -> ChangePasswordRequest {
        ChangePasswordRequest {
            current_password: current.map(str::to_string),
            new_password: "newsecret123".into(),
            confirm_password: "newsecret123".into(),
        }
    }

    fn service(
        repo: MockUserRepositoryTrait,
        hashing: MockHashingTrait,
        storage: MockMediaStorageTrait,
    ) -> UserService {
        UserService::new(
            Arc::new(repo),
            Arc::new(hashing),
            Arc::new(storage),
            Arc::new(Metrics::new()),
        )
    }

    #[tokio::test]
    async fn wrong_current_password_is_bad_request() {
        let mut repo = MockUserRepositoryTrait::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(user(Some("$2b$hash")))));
        repo.expect_update_password().never();

        let mut hashing = MockHashingTrait::new();
        hashing
            .expect_compare_password()
            .returning(|_, _| Err(AppError::InvalidCredentials));

        let err = service(repo, hashing, MockMediaStorageTrait::new())
            .change_password(1, &change_request(Some("wrong")))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Current password is incorrect");
    }

    #[tokio::test]
    async fn oauth_only_account_sets_password_without_current() {
        let mut repo = MockUserRepositoryTrait::new();
        repo.expect_find_by_id().returning(|_| Ok(Some(user(None))));
        repo.expect_update_password()
            .withf(|_, hash| hash == "hashed")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut hashing = MockHashingTrait::new();
        hashing.expect_compare_password().never();
        hashing
            .expect_hash_password()
            .returning(|_| Ok("hashed".to_string()));

        let result = service(repo, hashing, MockMediaStorageTrait::new())
            .change_password(1, &change_request(None))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn non_image_avatar_is_rejected() {
        let mut storage = MockMediaStorageTrait::new();
        storage.expect_upload_image().never();

        let upload = AvatarUpload {
            file_name: "notes.pdf".into(),
            content_type: "application/pdf".into(),
            bytes: vec![1, 2, 3],
        };

        let err = service(
            MockUserRepositoryTrait::new(),
            MockHashingTrait::new(),
            storage,
        )
        .upload_avatar(1, upload)
        .await
        .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn avatar_url_is_stored_on_the_user() {
        let mut storage = MockMediaStorageTrait::new();
        storage
            .expect_upload_image()
            .withf(|_, _, folder| folder == "home-sweet-loan/avatars")
            .returning(|_, _, _| Ok("https://res.cloudinary.com/demo/avatar.png".to_string()));

        let mut repo = MockUserRepositoryTrait::new();
        repo.expect_update_avatar().returning(|_, url| {
            Ok(User {
                avatar_url: Some(url.to_string()),
                ..user(None)
            })
        });

        let upload = AvatarUpload {
            file_name: "me.png".into(),
            content_type: "image/png".into(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        };

        let response = service(repo, MockHashingTrait::new(), storage)
            .upload_avatar(1, upload)
            .await
            .unwrap();

        assert_eq!(
            response.data.avatar_url,
            "https://res.cloudinary.com/demo/avatar.png"
        );
    }
}

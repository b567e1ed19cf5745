use crate::{
    abstract_trait::{
        AuthServiceTrait, DynHashing, DynJwtService, DynMailer, DynOAuthProvider,
        DynPasswordResetRepository, DynSettingsRepository, DynUserRepository,
    },
    config::TokenKind,
    domain::{
        request::{
            CreateUserRequest, ForgotPasswordRequest, GoogleProfile, LoginRequest,
            RegisterRequest, ResetPasswordRequest,
        },
        response::{
            ApiResponse, ErrorResponse, MessageResponse,
            user::{SessionResponse, UserResponse},
        },
    },
    integration::templates,
    model::user::User,
    utils::{AppError, Method, Metrics, ServiceTracer, random_token, sha256_hex},
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use opentelemetry::KeyValue;
use std::sync::Arc;
use tracing::{error, info, warn};

const RESET_TOKEN_TTL_MINUTES: i64 = 60;

#[derive(Clone)]
pub struct AuthService {
    users: DynUserRepository,
    resets: DynPasswordResetRepository,
    settings: DynSettingsRepository,
    hashing: DynHashing,
    jwt_config: DynJwtService,
    oauth: DynOAuthProvider,
    mailer: DynMailer,
    frontend_url: String,
    tracer: ServiceTracer,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("users", &"DynUserRepository")
            .field("hashing", &"Hashing")
            .field("jwt_config", &"JwtConfig")
            .field("frontend_url", &self.frontend_url)
            .finish()
    }
}

impl AuthService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: DynUserRepository,
        resets: DynPasswordResetRepository,
        settings: DynSettingsRepository,
        hashing: DynHashing,
        jwt_config: DynJwtService,
        oauth: DynOAuthProvider,
        mailer: DynMailer,
        frontend_url: String,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            users,
            resets,
            settings,
            hashing,
            jwt_config,
            oauth,
            mailer,
            frontend_url,
            tracer: ServiceTracer::new("auth-service", metrics),
        }
    }

    /// Issues a fresh token pair and remembers the refresh token's hash,
    /// which invalidates any previously issued refresh token.
    async fn issue_session(&self, user: User) -> Result<SessionResponse, AppError> {
        let access = self.jwt_config.generate_token(user.user_id, TokenKind::Access)?;
        let refresh = self
            .jwt_config
            .generate_token(user.user_id, TokenKind::Refresh)?;

        self.users
            .set_refresh_token_hash(user.user_id, Some(sha256_hex(&refresh.token)))
            .await?;

        Ok(SessionResponse {
            user: UserResponse::from(user),
            access_token: access.token,
            refresh_token: refresh.token,
            access_token_expires_at: access.expires_at,
            refresh_token_expires_at: refresh.expires_at,
        })
    }

    async fn register(&self, input: &RegisterRequest) -> Result<User, AppError> {
        let email = input.email.trim().to_lowercase();

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let hashed = self.hashing.hash_password(&input.password).await?;

        let user = self
            .users
            .create_user(&CreateUserRequest {
                name: input.name.trim().to_string(),
                email,
                password: Some(hashed),
                ..Default::default()
            })
            .await
            .map_err(|err| match err {
                AppError::Conflict(_) => AppError::EmailAlreadyExists,
                other => other,
            })?;

        self.settings.find_or_create(user.user_id).await?;

        if let Err(err) = self
            .mailer
            .send(&templates::welcome(&user.email, &user.name))
            .await
        {
            warn!("Welcome email to {} failed: {err}", user.email);
        }

        Ok(user)
    }

    async fn login(&self, input: &LoginRequest) -> Result<SessionResponse, AppError> {
        let user = self
            .users
            .find_by_email(&input.email.trim().to_lowercase())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let Some(stored) = user.password.as_deref() else {
            return Err(AppError::InvalidCredentials);
        };

        self.hashing.compare_password(stored, &input.password).await?;

        self.issue_session(user).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<SessionResponse, AppError> {
        let user_id = self
            .jwt_config
            .verify_token(refresh_token, TokenKind::Refresh)
            .map_err(|_| AppError::Unauthorized("Invalid or expired refresh token".to_string()))?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired refresh token".to_string()))?;

        if user.refresh_token_hash.as_deref() != Some(sha256_hex(refresh_token).as_str()) {
            warn!("Refresh token for user {user_id} does not match the stored one");
            return Err(AppError::Unauthorized(
                "Invalid or expired refresh token".to_string(),
            ));
        }

        self.issue_session(user).await
    }

    async fn sign_in_with_google(&self, profile: GoogleProfile) -> Result<User, AppError> {
        if let Some(user) = self.users.find_by_google_id(&profile.google_id).await? {
            return Ok(user);
        }

        let email = profile.email.trim().to_lowercase();

        if let Some(user) = self.users.find_by_email(&email).await? {
            info!("Linking Google account to existing user {}", user.user_id);

            let avatar = match user.avatar_url {
                Some(_) => None,
                None => profile.picture,
            };

            return self
                .users
                .link_google(user.user_id, &profile.google_id, avatar)
                .await;
        }

        let user = self
            .users
            .create_user(&CreateUserRequest {
                name: profile.name,
                email,
                password: None,
                google_id: Some(profile.google_id),
                avatar_url: profile.picture,
            })
            .await?;

        self.settings.find_or_create(user.user_id).await?;

        info!("Created user {} from Google sign-in", user.user_id);

        Ok(user)
    }

    async fn start_reset(&self, input: &ForgotPasswordRequest) -> Result<(), AppError> {
        let email = input.email.trim().to_lowercase();

        let Some(user) = self.users.find_by_email(&email).await? else {
            info!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = random_token();
        let expires_at = Utc::now().naive_utc() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

        self.resets
            .create(user.user_id, &sha256_hex(&token), expires_at)
            .await?;

        let link = format!(
            "{}/reset-password?token={token}",
            self.frontend_url.trim_end_matches('/')
        );

        if let Err(err) = self
            .mailer
            .send(&templates::password_reset(&user.email, &user.name, &link))
            .await
        {
            error!("Password reset email to user {} failed: {err}", user.user_id);
        }

        Ok(())
    }

    async fn finish_reset(&self, input: &ResetPasswordRequest) -> Result<(), AppError> {
        let reset = self
            .resets
            .find_by_token_hash(&sha256_hex(input.token.trim()))
            .await?
            .filter(|reset| reset.is_usable(Utc::now().naive_utc()))
            .ok_or_else(|| AppError::BadRequest("Invalid or expired reset token".to_string()))?;

        let hashed = self.hashing.hash_password(&input.password).await?;

        if !self.resets.claim(reset.reset_id).await? {
            return Err(AppError::BadRequest(
                "Invalid or expired reset token".to_string(),
            ));
        }

        self.users.update_password(reset.user_id, &hashed).await?;
        self.users.set_refresh_token_hash(reset.user_id, None).await?;

        info!("Password reset completed for user {}", reset.user_id);

        Ok(())
    }
}

#[async_trait]
impl AuthServiceTrait for AuthService {
    async fn register_user(
        &self,
        input: &RegisterRequest,
    ) -> Result<ApiResponse<UserResponse>, ErrorResponse> {
        let method = Method::Post;
        let tracing_ctx = self.tracer.start_tracing(
            "RegisterUser",
            vec![KeyValue::new("operation", "register")],
        );

        info!("Registering user with email: {}", input.email);

        match self.register(input).await {
            Ok(user) => {
                info!("User registered successfully: {}", user.user_id);
                self.tracer.complete_tracing_success(
                    &tracing_ctx,
                    method,
                    "User registered successfully",
                );
                Ok(ApiResponse::success(
                    "User registered successfully",
                    UserResponse::from(user),
                ))
            }
            Err(err) => {
                error!("Failed to register user {}: {err}", input.email);
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, &err.to_string());
                Err(ErrorResponse::from(err))
            }
        }
    }

    async fn login_user(
        &self,
        input: &LoginRequest,
    ) -> Result<ApiResponse<SessionResponse>, ErrorResponse> {
        let method = Method::Post;
        let tracing_ctx = self
            .tracer
            .start_tracing("LoginUser", vec![KeyValue::new("operation", "login")]);

        match self.login(input).await {
            Ok(session) => {
                info!("User logged in successfully: {}", session.user.id);
                self.tracer
                    .complete_tracing_success(&tracing_ctx, method, "Login successful");
                Ok(ApiResponse::success("Login successful", session))
            }
            Err(err) => {
                error!("Login failed for {}: {err}", input.email);
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, &err.to_string());

                let err = match err {
                    AppError::NotFound(_) => AppError::InvalidCredentials,
                    other => other,
                };
                Err(ErrorResponse::from(err))
            }
        }
    }

    async fn refresh_session(
        &self,
        refresh_token: &str,
    ) -> Result<ApiResponse<SessionResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "RefreshSession",
            vec![KeyValue::new("operation", "refresh")],
        );

        let result = self.refresh(refresh_token).await;
        let session = self.tracer.finish(
            &tracing_ctx,
            Method::Post,
            result,
            "Session refreshed successfully",
        )?;

        Ok(ApiResponse::success("Session refreshed successfully", session))
    }

    async fn logout(&self, user_id: i32) -> Result<MessageResponse, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "Logout",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        let result = self.users.set_refresh_token_hash(user_id, None).await;
        self.tracer
            .finish(&tracing_ctx, Method::Post, result, "Logged out successfully")?;

        Ok(MessageResponse::success("Logged out successfully"))
    }

    async fn get_me(&self, user_id: i32) -> Result<ApiResponse<UserResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "GetMe",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        let result = match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(AppError::NotFound("User not found".to_string())),
            Err(err) => Err(err),
        };

        let user = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "User retrieved successfully",
        )?;

        Ok(ApiResponse::success(
            "User retrieved successfully",
            UserResponse::from(user),
        ))
    }

    fn google_authorize_url(&self, state: &str) -> Result<String, ErrorResponse> {
        self.oauth
            .authorize_url(state)
            .map_err(ErrorResponse::from)
    }

    async fn google_callback(
        &self,
        code: &str,
    ) -> Result<ApiResponse<SessionResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "GoogleCallback",
            vec![KeyValue::new("operation", "google_oauth")],
        );

        let result: Result<SessionResponse, AppError> = async {
            let profile = self.oauth.exchange_code(code).await?;
            let user = self.sign_in_with_google(profile).await?;
            self.issue_session(user).await
        }
        .await;

        let session = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Google sign-in successful",
        )?;

        Ok(ApiResponse::success("Google sign-in successful", session))
    }

    async fn forgot_password(
        &self,
        input: &ForgotPasswordRequest,
    ) -> Result<MessageResponse, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "ForgotPassword",
            vec![KeyValue::new("operation", "forgot_password")],
        );

        let result = self.start_reset(input).await;
        self.tracer.finish(
            &tracing_ctx,
            Method::Post,
            result,
            "Password reset requested",
        )?;

        Ok(MessageResponse::success(
            "If the email is registered, a reset link has been sent",
        ))
    }

    async fn reset_password(
        &self,
        input: &ResetPasswordRequest,
    ) -> Result<MessageResponse, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "ResetPassword",
            vec![KeyValue::new("operation", "reset_password")],
        );

        let result = self.finish_reset(input).await;
        self.tracer.finish(
            &tracing_ctx,
            Method::Post,
            result,
            "Password reset successfully",
        )?;

        Ok(MessageResponse::success("Password reset successfully"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::{
            MockHashingTrait, MockJwtServiceTrait, MockMailerTrait, MockOAuthProviderTrait,
            MockPasswordResetRepositoryTrait, MockSettingsRepositoryTrait,
            MockUserRepositoryTrait,
        },
        config::IssuedToken,
        model::{password_reset::PasswordReset, settings::UserSettings},
    };
    use axum::http::StatusCode;

    fn user(password: Option<&str>) -> User {
        User {
            user_id: 1,
            name: "Sari".into(),
            email: "sari@example.com".into(),
            password: password.map(str::to_string),
            google_id: None,
            avatar_url: None,
            phone: None,
            refresh_token_hash: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn default_settings(user_id: i32) -> UserSettings {
        UserSettings {
            settings_id: 1,
            user_id,
            currency: "IDR".into(),
            language: "id".into(),
            theme: "system".into(),
            email_notifications: true,
            budget_alerts: true,
            alert_threshold: 80,
            created_at: None,
            updated_at: None,
        }
    }

    struct Mocks {
        users: MockUserRepositoryTrait,
        resets: MockPasswordResetRepositoryTrait,
        settings: MockSettingsRepositoryTrait,
        hashing: MockHashingTrait,
        jwt: MockJwtServiceTrait,
        oauth: MockOAuthProviderTrait,
        mailer: MockMailerTrait,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                users: MockUserRepositoryTrait::new(),
                resets: MockPasswordResetRepositoryTrait::new(),
                settings: MockSettingsRepositoryTrait::new(),
                hashing: MockHashingTrait::new(),
                jwt: MockJwtServiceTrait::new(),
                oauth: MockOAuthProviderTrait::new(),
                mailer: MockMailerTrait::new(),
            }
        }

        fn with_tokens(mut self) -> Self {
            self.jwt.expect_generate_token().returning(|user_id, kind| {
                Ok(IssuedToken {
                    token: format!("{kind:?}-{user_id}"),
                    expires_at: Utc::now() + Duration::minutes(15),
                })
            });
            self
        }

        fn into_service(self) -> AuthService {
            AuthService::new(
                Arc::new(self.users),
                Arc::new(self.resets),
                Arc::new(self.settings),
                Arc::new(self.hashing),
                Arc::new(self.jwt),
                Arc::new(self.oauth),
                Arc::new(self.mailer),
                "http://localhost:3000".into(),
                Arc::new(Metrics::new()),
            )
        }
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            name: "Sari".into(),
            email: "Sari@Example.com".into(),
            password: "rahasia123".into(),
            confirm_password: "rahasia123".into(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_find_by_email()
            .withf(|email| email == "sari@example.com")
            .returning(|_| Ok(Some(user(Some("hash")))));
        mocks.users.expect_create_user().never();

        let err = mocks
            .into_service()
            .register_user(&register_request())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn register_creates_default_settings_and_survives_mail_failure() {
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_email().returning(|_| Ok(None));
        mocks
            .hashing
            .expect_hash_password()
            .returning(|_| Ok("hashed".to_string()));
        mocks
            .users
            .expect_create_user()
            .withf(|input| input.password.as_deref() == Some("hashed"))
            .returning(|_| Ok(user(Some("hashed"))));
        mocks
            .settings
            .expect_find_or_create()
            .times(1)
            .returning(|user_id| Ok(default_settings(user_id)));
        mocks
            .mailer
            .expect_send()
            .returning(|_| Err(AppError::UpstreamError("smtp down".into())));

        let response = mocks
            .into_service()
            .register_user(&register_request())
            .await
            .unwrap();

        assert!(response.data.has_password);
        assert_eq!(response.data.email, "sari@example.com");
    }

    #[tokio::test]
    async fn oauth_only_account_cannot_log_in_with_password() {
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_find_by_email()
            .returning(|_| Ok(Some(user(None))));
        mocks.hashing.expect_compare_password().never();

        let err = mocks
            .into_service()
            .login_user(&LoginRequest {
                email: "sari@example.com".into(),
                password: "whatever1".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Invalid credentials");
    }

    #[tokio::test]
    async fn login_stores_refresh_token_hash() {
        let mut mocks = Mocks::new().with_tokens();
        mocks
            .users
            .expect_find_by_email()
            .returning(|_| Ok(Some(user(Some("hash")))));
        mocks
            .hashing
            .expect_compare_password()
            .returning(|_, _| Ok(()));
        mocks
            .users
            .expect_set_refresh_token_hash()
            .withf(|_, hash| hash.as_deref() == Some(sha256_hex("Refresh-1").as_str()))
            .times(1)
            .returning(|_, _| Ok(()));

        let response = mocks
            .into_service()
            .login_user(&LoginRequest {
                email: "sari@example.com".into(),
                password: "rahasia123".into(),
            })
            .await
            .unwrap();

        assert_eq!(response.data.access_token, "Access-1");
        assert_eq!(response.data.refresh_token, "Refresh-1");
    }

    #[tokio::test]
    async fn rotated_refresh_token_is_rejected() {
        let mut mocks = Mocks::new();
        mocks.jwt.expect_verify_token().returning(|_, _| Ok(1));
        mocks.users.expect_find_by_id().returning(|_| {
            Ok(Some(User {
                refresh_token_hash: Some(sha256_hex("newer-token")),
                ..user(Some("hash"))
            }))
        });
        mocks.users.expect_set_refresh_token_hash().never();

        let err = mocks
            .into_service()
            .refresh_session("older-token")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn google_sign_in_links_existing_email_and_keeps_avatar() {
        let mut mocks = Mocks::new().with_tokens();
        mocks.oauth.expect_exchange_code().returning(|_| {
            Ok(GoogleProfile {
                google_id: "g-1".into(),
                email: "sari@example.com".into(),
                name: "Sari".into(),
                picture: Some("https://lh3.googleusercontent.com/a".into()),
            })
        });
        mocks.users.expect_find_by_google_id().returning(|_| Ok(None));
        mocks.users.expect_find_by_email().returning(|_| {
            Ok(Some(User {
                avatar_url: Some("https://res.cloudinary.com/me.png".into()),
                ..user(Some("hash"))
            }))
        });
        mocks
            .users
            .expect_link_google()
            .withf(|id, google_id, avatar| *id == 1 && google_id == "g-1" && avatar.is_none())
            .times(1)
            .returning(|_, google_id, _| {
                Ok(User {
                    google_id: Some(google_id.to_string()),
                    ..user(Some("hash"))
                })
            });
        mocks.users.expect_create_user().never();
        mocks
            .users
            .expect_set_refresh_token_hash()
            .returning(|_, _| Ok(()));

        let response = mocks.into_service().google_callback("code").await.unwrap();

        assert!(response.data.user.google_linked);
    }

    #[tokio::test]
    async fn forgot_password_is_silent_for_unknown_email() {
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_email().returning(|_| Ok(None));
        mocks.resets.expect_create().never();
        mocks.mailer.expect_send().never();

        let response = mocks
            .into_service()
            .forgot_password(&ForgotPasswordRequest {
                email: "ghost@example.com".into(),
            })
            .await
            .unwrap();

        assert_eq!(response.status, "success");
    }

    #[tokio::test]
    async fn used_reset_token_is_rejected() {
        let mut mocks = Mocks::new();
        mocks.resets.expect_find_by_token_hash().returning(|hash| {
            Ok(Some(PasswordReset {
                reset_id: 1,
                user_id: 1,
                token_hash: hash.to_string(),
                expires_at: Utc::now().naive_utc() + Duration::minutes(30),
                used_at: Some(Utc::now().naive_utc()),
                created_at: None,
            }))
        });
        mocks.users.expect_update_password().never();

        let err = mocks
            .into_service()
            .reset_password(&ResetPasswordRequest {
                token: "abc".into(),
                password: "newsecret123".into(),
                confirm_password: "newsecret123".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reset_revokes_refresh_token() {
        let mut mocks = Mocks::new();
        mocks.resets.expect_find_by_token_hash().returning(|hash| {
            Ok(Some(PasswordReset {
                reset_id: 4,
                user_id: 1,
                token_hash: hash.to_string(),
                expires_at: Utc::now().naive_utc() + Duration::minutes(30),
                used_at: None,
                created_at: None,
            }))
        });
        mocks
            .hashing
            .expect_hash_password()
            .returning(|_| Ok("hashed".to_string()));
        mocks
            .users
            .expect_update_password()
            .times(1)
            .returning(|_, _| Ok(()));
        mocks
            .resets
            .expect_claim()
            .withf(|reset_id| *reset_id == 4)
            .times(1)
            .returning(|_| Ok(true));
        mocks
            .users
            .expect_set_refresh_token_hash()
            .withf(|_, hash| hash.is_none())
            .times(1)
            .returning(|_, _| Ok(()));

        assert!(
            mocks
                .into_service()
                .reset_password(&ResetPasswordRequest {
                    token: "abc".into(),
                    password: "newsecret123".into(),
                    confirm_password: "newsecret123".into(),
                })
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn already_claimed_reset_leaves_password_untouched() {
        let mut mocks = Mocks::new();
        mocks.resets.expect_find_by_token_hash().returning(|hash| {
            Ok(Some(PasswordReset {
                reset_id: 4,
                user_id: 1,
                token_hash: hash.to_string(),
                expires_at: Utc::now().naive_utc() + Duration::minutes(30),
                used_at: None,
                created_at: None,
            }))
        });
        mocks
            .hashing
            .expect_hash_password()
            .returning(|_| Ok("hashed".to_string()));
        mocks.resets.expect_claim().times(1).returning(|_| Ok(false));
        mocks.users.expect_update_password().never();
        mocks.users.expect_set_refresh_token_hash().never();

        let err = mocks
            .into_service()
            .reset_password(&ResetPasswordRequest {
                token: "abc".into(),
                password: "newsecret123".into(),
                confirm_password: "newsecret123".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid or expired reset token");
    }
}

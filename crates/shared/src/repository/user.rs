use async_trait::async_trait;
use sea_query::{Expr, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use tracing::{error, info};

use crate::abstract_trait::UserRepositoryTrait;
use crate::config::ConnectionPool;
use crate::domain::request::{CreateUserRequest, UpdateProfileRequest};
use crate::model::user::User;
use crate::schema::user::Users;
use crate::utils::AppError;

pub struct UserRepository {
    db_pool: ConnectionPool,
}

impl UserRepository {
    pub fn new(db_pool: ConnectionPool) -> Self {
        Self { db_pool }
    }

    async fn find_one_by(
        &self,
        column: Users,
        value: sea_query::Value,
    ) -> Result<Option<User>, AppError> {
        let (sql, values) = Query::select()
            .columns(Users::COLUMNS)
            .from(Users::Table)
            .and_where(Expr::col(column).eq(value))
            .build_sqlx(PostgresQueryBuilder);

        let user = sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(user)
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        info!("Finding user by id: {id}");

        let user = self.find_one_by(Users::UserId, id.into()).await?;

        if user.is_none() {
            info!("User with id {id} not found");
        }

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        info!("Finding user by email: {email}");

        self.find_one_by(Users::Email, email.to_lowercase().into())
            .await
    }

    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, AppError> {
        info!("Finding user by google id");

        self.find_one_by(Users::GoogleId, google_id.into()).await
    }

    async fn create_user(&self, input: &CreateUserRequest) -> Result<User, AppError> {
        info!("Creating user with email: {}", input.email);

        let (sql, values) = Query::insert()
            .into_table(Users::Table)
            .columns([
                Users::Name,
                Users::Email,
                Users::Password,
                Users::GoogleId,
                Users::AvatarUrl,
            ])
            .values([
                input.name.clone().into(),
                input.email.to_lowercase().into(),
                input.password.clone().into(),
                input.google_id.clone().into(),
                input.avatar_url.clone().into(),
            ])?
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let user: User = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.db_pool)
            .await
            .map_err(|e| {
                error!("Error creating user {}: {e}", input.email);
                AppError::from(e)
            })?;

        info!("User created with ID: {}", user.user_id);

        Ok(user)
    }

    async fn update_profile(
        &self,
        id: i32,
        input: &UpdateProfileRequest,
    ) -> Result<User, AppError> {
        info!("Updating profile of user ID {id}");

        let mut update_query = Query::update();
        let mut query = update_query
            .table(Users::Table)
            .value(Users::UpdatedAt, Expr::current_timestamp())
            .and_where(Expr::col(Users::UserId).eq(id));

        if let Some(name) = &input.name {
            query = query.value(Users::Name, name.trim().to_string());
        }

        if let Some(phone) = &input.phone {
            query = query.value(Users::Phone, phone.trim().to_string());
        }

        query = query.returning_all();

        let (sql, values) = query.build_sqlx(PostgresQueryBuilder);

        let user = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.db_pool)
            .await?;

        info!("User updated with ID: {id}");

        Ok(user)
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), AppError> {
        info!("Updating password of user ID {id}");

        let (sql, values) = Query::update()
            .table(Users::Table)
            .value(Users::Password, password_hash)
            .value(Users::UpdatedAt, Expr::current_timestamp())
            .and_where(Expr::col(Users::UserId).eq(id))
            .build_sqlx(PostgresQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User ID {id} not found")));
        }

        Ok(())
    }

    async fn update_avatar(&self, id: i32, avatar_url: &str) -> Result<User, AppError> {
        info!("Updating avatar of user ID {id}");

        let (sql, values) = Query::update()
            .table(Users::Table)
            .value(Users::AvatarUrl, avatar_url)
            .value(Users::UpdatedAt, Expr::current_timestamp())
            .and_where(Expr::col(Users::UserId).eq(id))
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let user = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.db_pool)
            .await?;

        Ok(user)
    }

    async fn link_google(
        &self,
        id: i32,
        google_id: &str,
        avatar_url: Option<String>,
    ) -> Result<User, AppError> {
        info!("Linking google account to user ID {id}");

        let mut update_query = Query::update();
        let mut query = update_query
            .table(Users::Table)
            .value(Users::GoogleId, google_id)
            .value(Users::UpdatedAt, Expr::current_timestamp())
            .and_where(Expr::col(Users::UserId).eq(id));

        if let Some(url) = avatar_url {
            query = query.value(Users::AvatarUrl, url);
        }

        let (sql, values) = query.returning_all().build_sqlx(PostgresQueryBuilder);

        let user = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.db_pool)
            .await?;

        Ok(user)
    }

    async fn set_refresh_token_hash(
        &self,
        id: i32,
        token_hash: Option<String>,
    ) -> Result<(), AppError> {
        let (sql, values) = Query::update()
            .table(Users::Table)
            .value(Users::RefreshTokenHash, token_hash)
            .and_where(Expr::col(Users::UserId).eq(id))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_with(&sql, values)
            .execute(&self.db_pool)
            .await?;

        Ok(())
    }

    async fn delete_user(&self, id: i32) -> Result<(), AppError> {
        info!("Deleting user ID {id}");

        let (sql, values) = Query::delete()
            .from_table(Users::Table)
            .and_where(Expr::col(Users::UserId).eq(id))
            .build_sqlx(PostgresQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User ID {id} not found")));
        }

        Ok(())
    }
}

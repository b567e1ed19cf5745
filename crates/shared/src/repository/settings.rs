use async_trait::async_trait;
use sea_query::{Expr, OnConflict, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use tracing::info;

use crate::abstract_trait::SettingsRepositoryTrait;
use crate::config::ConnectionPool;
use crate::domain::request::UpdateSettingsRequest;
use crate::model::settings::UserSettings;
use crate::schema::settings::UserSettings as SettingsTable;
use crate::utils::AppError;

pub struct SettingsRepository {
    db_pool: ConnectionPool,
}

impl SettingsRepository {
    pub fn new(db_pool: ConnectionPool) -> Self {
        Self { db_pool }
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Option<UserSettings>, AppError> {
        let (sql, values) = Query::select()
            .columns(SettingsTable::COLUMNS)
            .from(SettingsTable::Table)
            .and_where(Expr::col(SettingsTable::UserId).eq(user_id))
            .build_sqlx(PostgresQueryBuilder);

        let settings = sqlx::query_as_with::<_, UserSettings, _>(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(settings)
    }
}

#[async_trait]
impl SettingsRepositoryTrait for SettingsRepository {
    async fn find_or_create(&self, user_id: i32) -> Result<UserSettings, AppError> {
        if let Some(settings) = self.find_by_user(user_id).await? {
            return Ok(settings);
        }

        info!("Creating default settings for user ID {user_id}");

        // Column defaults carry the initial values.
        let (sql, values) = Query::insert()
            .into_table(SettingsTable::Table)
            .columns([SettingsTable::UserId])
            .values([user_id.into()])?
            .on_conflict(
                OnConflict::column(SettingsTable::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_with(&sql, values)
            .execute(&self.db_pool)
            .await?;

        self.find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Settings for user {user_id} not found")))
    }

    async fn update(
        &self,
        user_id: i32,
        input: &UpdateSettingsRequest,
    ) -> Result<UserSettings, AppError> {
        info!("Updating settings for user ID {user_id}");

        self.find_or_create(user_id).await?;

        let mut update_query = Query::update();
        let mut query = update_query
            .table(SettingsTable::Table)
            .value(SettingsTable::UpdatedAt, Expr::current_timestamp())
            .and_where(Expr::col(SettingsTable::UserId).eq(user_id));

        if let Some(currency) = &input.currency {
            query = query.value(SettingsTable::Currency, currency.clone());
        }

        if let Some(language) = &input.language {
            query = query.value(SettingsTable::Language, language.clone());
        }

        if let Some(theme) = &input.theme {
            query = query.value(SettingsTable::Theme, theme.clone());
        }

        if let Some(enabled) = input.email_notifications {
            query = query.value(SettingsTable::EmailNotifications, enabled);
        }

        if let Some(enabled) = input.budget_alerts {
            query = query.value(SettingsTable::BudgetAlerts, enabled);
        }

        if let Some(threshold) = input.alert_threshold {
            query = query.value(SettingsTable::AlertThreshold, threshold);
        }

        let (sql, values) = query.returning_all().build_sqlx(PostgresQueryBuilder);

        let settings = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.db_pool)
            .await?;

        Ok(settings)
    }
}

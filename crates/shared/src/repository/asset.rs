use async_trait::async_trait;
use sea_query::{Expr, Func, Order, PostgresQueryBuilder, Query, SelectStatement};
use sea_query_binder::SqlxBinder;
use tracing::{error, info};

use crate::abstract_trait::AssetRepositoryTrait;
use crate::config::ConnectionPool;
use crate::domain::request::{CreateAssetRequest, UpdateAssetRequest, page_offset};
use crate::model::asset::{Asset, AssetType};
use crate::schema::asset::Assets;
use crate::utils::AppError;

pub struct AssetRepository {
    db_pool: ConnectionPool,
}

impl AssetRepository {
    pub fn new(db_pool: ConnectionPool) -> Self {
        Self { db_pool }
    }

    fn filtered(query: &mut SelectStatement, user_id: i32, asset_type: Option<AssetType>) {
        query.and_where(Expr::col(Assets::UserId).eq(user_id));

        if let Some(asset_type) = asset_type {
            query.and_where(Expr::col(Assets::AssetType).eq(asset_type.as_str()));
        }
    }
}

#[async_trait]
impl AssetRepositoryTrait for AssetRepository {
    async fn find_all(
        &self,
        user_id: i32,
        asset_type: Option<AssetType>,
        page: i32,
        page_size: i32,
    ) -> Result<(Vec<Asset>, i64), AppError> {
        info!("Getting assets of user {user_id} - type: {asset_type:?}, page: {page}, page_size: {page_size}");

        let offset = page_offset(page, page_size);

        let mut select_query = Query::select();
        select_query
            .columns(Assets::COLUMNS)
            .from(Assets::Table)
            .order_by(Assets::Value, Order::Desc)
            .order_by(Assets::AssetId, Order::Asc)
            .limit(page_size as u64)
            .offset(offset);
        Self::filtered(&mut select_query, user_id, asset_type);

        let (sql, values) = select_query.build_sqlx(PostgresQueryBuilder);

        let assets = sqlx::query_as_with::<_, Asset, _>(&sql, values)
            .fetch_all(&self.db_pool)
            .await
            .map_err(|e| {
                error!("Error fetching assets: {e}");
                AppError::from(e)
            })?;

        let mut count_query = Query::select();
        count_query
            .expr(Func::count(Expr::col(Assets::AssetId)))
            .from(Assets::Table);
        Self::filtered(&mut count_query, user_id, asset_type);

        let (count_sql, count_values) = count_query.build_sqlx(PostgresQueryBuilder);

        let (total,) = sqlx::query_as_with::<_, (i64,), _>(&count_sql, count_values)
            .fetch_one(&self.db_pool)
            .await?;

        Ok((assets, total))
    }

    async fn find_all_by_user(&self, user_id: i32) -> Result<Vec<Asset>, AppError> {
        let (sql, values) = Query::select()
            .columns(Assets::COLUMNS)
            .from(Assets::Table)
            .and_where(Expr::col(Assets::UserId).eq(user_id))
            .build_sqlx(PostgresQueryBuilder);

        let assets = sqlx::query_as_with::<_, Asset, _>(&sql, values)
            .fetch_all(&self.db_pool)
            .await?;

        Ok(assets)
    }

    async fn find_by_id(&self, user_id: i32, id: i32) -> Result<Option<Asset>, AppError> {
        info!("Finding asset {id} of user {user_id}");

        let (sql, values) = Query::select()
            .columns(Assets::COLUMNS)
            .from(Assets::Table)
            .and_where(Expr::col(Assets::AssetId).eq(id))
            .and_where(Expr::col(Assets::UserId).eq(user_id))
            .build_sqlx(PostgresQueryBuilder);

        let asset = sqlx::query_as_with::<_, Asset, _>(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(asset)
    }

    async fn create(&self, user_id: i32, input: &CreateAssetRequest) -> Result<Asset, AppError> {
        info!("Creating asset '{}' for user {user_id}", input.name);

        let (sql, values) = Query::insert()
            .into_table(Assets::Table)
            .columns([
                Assets::UserId,
                Assets::Name,
                Assets::AssetType,
                Assets::Category,
                Assets::Value,
                Assets::Description,
            ])
            .values([
                user_id.into(),
                input.name.trim().into(),
                input.asset_type.as_str().into(),
                input.category.trim().into(),
                input.value.into(),
                input.description.clone().into(),
            ])?
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let asset = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.db_pool)
            .await?;

        Ok(asset)
    }

    async fn update(
        &self,
        user_id: i32,
        id: i32,
        input: &UpdateAssetRequest,
    ) -> Result<Option<Asset>, AppError> {
        info!("Updating asset {id} of user {user_id}");

        let mut update_query = Query::update();
        let mut query = update_query
            .table(Assets::Table)
            .value(Assets::UpdatedAt, Expr::current_timestamp())
            .and_where(Expr::col(Assets::AssetId).eq(id))
            .and_where(Expr::col(Assets::UserId).eq(user_id));

        if let Some(name) = &input.name {
            query = query.value(Assets::Name, name.trim());
        }

        if let Some(asset_type) = input.asset_type {
            query = query.value(Assets::AssetType, asset_type.as_str());
        }

        if let Some(category) = &input.category {
            query = query.value(Assets::Category, category.trim());
        }

        if let Some(value) = input.value {
            query = query.value(Assets::Value, value);
        }

        if let Some(description) = &input.description {
            query = query.value(Assets::Description, description.clone());
        }

        let (sql, values) = query.returning_all().build_sqlx(PostgresQueryBuilder);

        let asset = sqlx::query_as_with::<_, Asset, _>(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(asset)
    }

    async fn delete(&self, user_id: i32, id: i32) -> Result<bool, AppError> {
        info!("Deleting asset {id} of user {user_id}");

        let (sql, values) = Query::delete()
            .from_table(Assets::Table)
            .and_where(Expr::col(Assets::AssetId).eq(id))
            .and_where(Expr::col(Assets::UserId).eq(user_id))
            .build_sqlx(PostgresQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

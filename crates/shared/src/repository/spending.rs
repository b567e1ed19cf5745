use async_trait::async_trait;
use sea_query::{Expr, Func, Order, PostgresQueryBuilder, Query, SelectStatement};
use sea_query_binder::SqlxBinder;
use tracing::{error, info};

use crate::abstract_trait::SpendingRepositoryTrait;
use crate::config::ConnectionPool;
use crate::domain::request::{
    CreateSpendingRequest, FindAllSpendingRequest, UpdateSpendingRequest, normalize_page,
    page_offset,
};
use crate::model::spending::Spending;
use crate::schema::spending::Spendings;
use crate::utils::{AppError, year_month_of};

const SUM_AMOUNT: &str = "CAST(COALESCE(SUM(amount), 0) AS BIGINT)";

pub struct SpendingRepository {
    db_pool: ConnectionPool,
}

impl SpendingRepository {
    pub fn new(db_pool: ConnectionPool) -> Self {
        Self { db_pool }
    }

    fn filtered(query: &mut SelectStatement, user_id: i32, req: &FindAllSpendingRequest) {
        query.and_where(Expr::col(Spendings::UserId).eq(user_id));

        if let Some(year_month) = &req.year_month {
            query.and_where(Expr::col(Spendings::YearMonth).eq(year_month.clone()));
        }

        if let Some(category) = req.category.as_deref().filter(|c| !c.trim().is_empty()) {
            query.and_where(Expr::col(Spendings::Category).eq(category.trim()));
        }
    }
}

#[async_trait]
impl SpendingRepositoryTrait for SpendingRepository {
    async fn find_all(
        &self,
        user_id: i32,
        req: &FindAllSpendingRequest,
    ) -> Result<(Vec<Spending>, i64), AppError> {
        let (page, page_size) = normalize_page(req.page, req.page_size);
        info!(
            "Getting spending of user {user_id} - year_month: {:?}, category: {:?}, page: {page}",
            req.year_month, req.category
        );

        let offset = page_offset(page, page_size);

        let mut select_query = Query::select();
        select_query
            .columns(Spendings::COLUMNS)
            .from(Spendings::Table)
            .order_by(Spendings::SpentAt, Order::Desc)
            .order_by(Spendings::SpendingId, Order::Desc)
            .limit(page_size as u64)
            .offset(offset);
        Self::filtered(&mut select_query, user_id, req);

        let (sql, values) = select_query.build_sqlx(PostgresQueryBuilder);

        let spendings = sqlx::query_as_with::<_, Spending, _>(&sql, values)
            .fetch_all(&self.db_pool)
            .await
            .map_err(|e| {
                error!("Error fetching spending: {e}");
                AppError::from(e)
            })?;

        let mut count_query = Query::select();
        count_query
            .expr(Func::count(Expr::col(Spendings::SpendingId)))
            .from(Spendings::Table);
        Self::filtered(&mut count_query, user_id, req);

        let (count_sql, count_values) = count_query.build_sqlx(PostgresQueryBuilder);

        let (total,) = sqlx::query_as_with::<_, (i64,), _>(&count_sql, count_values)
            .fetch_one(&self.db_pool)
            .await?;

        info!("Found {} spending entries out of total {total}", spendings.len());

        Ok((spendings, total))
    }

    async fn find_by_id(&self, user_id: i32, id: i32) -> Result<Option<Spending>, AppError> {
        info!("Finding spending {id} of user {user_id}");

        let (sql, values) = Query::select()
            .columns(Spendings::COLUMNS)
            .from(Spendings::Table)
            .and_where(Expr::col(Spendings::SpendingId).eq(id))
            .and_where(Expr::col(Spendings::UserId).eq(user_id))
            .build_sqlx(PostgresQueryBuilder);

        let spending = sqlx::query_as_with::<_, Spending, _>(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(spending)
    }

    async fn find_by_month(
        &self,
        user_id: i32,
        year_month: &str,
    ) -> Result<Vec<Spending>, AppError> {
        let (sql, values) = Query::select()
            .columns(Spendings::COLUMNS)
            .from(Spendings::Table)
            .and_where(Expr::col(Spendings::UserId).eq(user_id))
            .and_where(Expr::col(Spendings::YearMonth).eq(year_month))
            .order_by(Spendings::SpentAt, Order::Asc)
            .build_sqlx(PostgresQueryBuilder);

        let spendings = sqlx::query_as_with::<_, Spending, _>(&sql, values)
            .fetch_all(&self.db_pool)
            .await?;

        Ok(spendings)
    }

    async fn monthly_totals(&self, user_id: i32, year: i32) -> Result<Vec<(String, i64)>, AppError> {
        let (sql, values) = Query::select()
            .column(Spendings::YearMonth)
            .expr(Expr::cust(SUM_AMOUNT))
            .from(Spendings::Table)
            .and_where(Expr::col(Spendings::UserId).eq(user_id))
            .and_where(Expr::col(Spendings::YearMonth).like(format!("{year:04}-%")))
            .group_by_col(Spendings::YearMonth)
            .order_by(Spendings::YearMonth, Order::Asc)
            .build_sqlx(PostgresQueryBuilder);

        let totals = sqlx::query_as_with::<_, (String, i64), _>(&sql, values)
            .fetch_all(&self.db_pool)
            .await?;

        Ok(totals)
    }

    async fn category_total(
        &self,
        user_id: i32,
        year_month: &str,
        category: &str,
    ) -> Result<i64, AppError> {
        let (sql, values) = Query::select()
            .expr(Expr::cust(SUM_AMOUNT))
            .from(Spendings::Table)
            .and_where(Expr::col(Spendings::UserId).eq(user_id))
            .and_where(Expr::col(Spendings::YearMonth).eq(year_month))
            .and_where(Expr::col(Spendings::Category).eq(category))
            .build_sqlx(PostgresQueryBuilder);

        let (total,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
            .fetch_one(&self.db_pool)
            .await?;

        Ok(total)
    }

    async fn create(
        &self,
        user_id: i32,
        input: &CreateSpendingRequest,
    ) -> Result<Spending, AppError> {
        info!("Creating spending for user {user_id} on {}", input.spent_at);

        let (sql, values) = Query::insert()
            .into_table(Spendings::Table)
            .columns([
                Spendings::UserId,
                Spendings::SpentAt,
                Spendings::YearMonth,
                Spendings::Category,
                Spendings::CategoryType,
                Spendings::Account,
                Spendings::Description,
                Spendings::Amount,
            ])
            .values([
                user_id.into(),
                input.spent_at.into(),
                year_month_of(input.spent_at).into(),
                input.category.trim().into(),
                input.category_type.as_str().into(),
                input.account.trim().into(),
                input.description.clone().into(),
                input.amount.into(),
            ])?
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let spending = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.db_pool)
            .await?;

        Ok(spending)
    }

    async fn update(
        &self,
        user_id: i32,
        id: i32,
        input: &UpdateSpendingRequest,
    ) -> Result<Option<Spending>, AppError> {
        info!("Updating spending {id} of user {user_id}");

        let mut update_query = Query::update();
        let mut query = update_query
            .table(Spendings::Table)
            .value(Spendings::UpdatedAt, Expr::current_timestamp())
            .and_where(Expr::col(Spendings::SpendingId).eq(id))
            .and_where(Expr::col(Spendings::UserId).eq(user_id));

        if let Some(spent_at) = input.spent_at {
            query = query
                .value(Spendings::SpentAt, spent_at)
                .value(Spendings::YearMonth, year_month_of(spent_at));
        }

        if let Some(category) = &input.category {
            query = query.value(Spendings::Category, category.trim());
        }

        if let Some(category_type) = input.category_type {
            query = query.value(Spendings::CategoryType, category_type.as_str());
        }

        if let Some(account) = &input.account {
            query = query.value(Spendings::Account, account.trim());
        }

        if let Some(description) = &input.description {
            query = query.value(Spendings::Description, description.clone());
        }

        if let Some(amount) = input.amount {
            query = query.value(Spendings::Amount, amount);
        }

        let (sql, values) = query.returning_all().build_sqlx(PostgresQueryBuilder);

        let spending = sqlx::query_as_with::<_, Spending, _>(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(spending)
    }

    async fn delete(&self, user_id: i32, id: i32) -> Result<Option<Spending>, AppError> {
        info!("Deleting spending {id} of user {user_id}");

        let (sql, values) = Query::delete()
            .from_table(Spendings::Table)
            .and_where(Expr::col(Spendings::SpendingId).eq(id))
            .and_where(Expr::col(Spendings::UserId).eq(user_id))
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let spending = sqlx::query_as_with::<_, Spending, _>(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(spending)
    }
}

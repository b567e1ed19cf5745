use async_trait::async_trait;
use sea_query::{Expr, Func, Order, PostgresQueryBuilder, Query, SelectStatement};
use sea_query_binder::SqlxBinder;
use serde_json::json;
use tracing::{error, info};

use crate::abstract_trait::BudgetRepositoryTrait;
use crate::config::ConnectionPool;
use crate::domain::request::{CreateBudgetRequest, UpdateBudgetRequest, page_offset};
use crate::model::budget::Budget;
use crate::schema::budget::Budgets;
use crate::utils::AppError;

pub struct BudgetRepository {
    db_pool: ConnectionPool,
}

impl BudgetRepository {
    pub fn new(db_pool: ConnectionPool) -> Self {
        Self { db_pool }
    }

    fn scoped(query: &mut SelectStatement, user_id: i32, year: Option<i32>) {
        query.and_where(Expr::col(Budgets::UserId).eq(user_id));

        if let Some(year) = year {
            query.and_where(Expr::col(Budgets::YearMonth).like(format!("{year:04}-%")));
        }
    }
}

#[async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    async fn find_all(
        &self,
        user_id: i32,
        year: Option<i32>,
        page: i32,
        page_size: i32,
    ) -> Result<(Vec<Budget>, i64), AppError> {
        info!("Getting budgets of user {user_id} - year: {year:?}, page: {page}, page_size: {page_size}");

        let offset = page_offset(page, page_size);

        let mut select_query = Query::select();
        select_query
            .columns(Budgets::COLUMNS)
            .from(Budgets::Table)
            .order_by(Budgets::YearMonth, Order::Desc)
            .limit(page_size as u64)
            .offset(offset);
        Self::scoped(&mut select_query, user_id, year);

        let (sql, values) = select_query.build_sqlx(PostgresQueryBuilder);

        let budgets = sqlx::query_as_with::<_, Budget, _>(&sql, values)
            .fetch_all(&self.db_pool)
            .await
            .map_err(|e| {
                error!("Error fetching budgets: {e}");
                AppError::from(e)
            })?;

        let mut count_query = Query::select();
        count_query
            .expr(Func::count(Expr::col(Budgets::BudgetId)))
            .from(Budgets::Table);
        Self::scoped(&mut count_query, user_id, year);

        let (count_sql, count_values) = count_query.build_sqlx(PostgresQueryBuilder);

        let (total,) = sqlx::query_as_with::<_, (i64,), _>(&count_sql, count_values)
            .fetch_one(&self.db_pool)
            .await?;

        info!("Found {} budgets out of total {total}", budgets.len());

        Ok((budgets, total))
    }

    async fn find_by_month(
        &self,
        user_id: i32,
        year_month: &str,
    ) -> Result<Option<Budget>, AppError> {
        info!("Finding budget {year_month} of user {user_id}");

        let (sql, values) = Query::select()
            .columns(Budgets::COLUMNS)
            .from(Budgets::Table)
            .and_where(Expr::col(Budgets::UserId).eq(user_id))
            .and_where(Expr::col(Budgets::YearMonth).eq(year_month))
            .build_sqlx(PostgresQueryBuilder);

        let budget = sqlx::query_as_with::<_, Budget, _>(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(budget)
    }

    async fn find_by_year(&self, user_id: i32, year: i32) -> Result<Vec<Budget>, AppError> {
        let mut select_query = Query::select();
        select_query
            .columns(Budgets::COLUMNS)
            .from(Budgets::Table)
            .order_by(Budgets::YearMonth, Order::Asc);
        Self::scoped(&mut select_query, user_id, Some(year));

        let (sql, values) = select_query.build_sqlx(PostgresQueryBuilder);

        let budgets = sqlx::query_as_with::<_, Budget, _>(&sql, values)
            .fetch_all(&self.db_pool)
            .await?;

        Ok(budgets)
    }

    async fn create(&self, user_id: i32, input: &CreateBudgetRequest) -> Result<Budget, AppError> {
        info!("Creating budget {} for user {user_id}", input.year_month);

        let (sql, values) = Query::insert()
            .into_table(Budgets::Table)
            .columns([
                Budgets::UserId,
                Budgets::YearMonth,
                Budgets::Income,
                Budgets::Expenses,
                Budgets::SavingsAllocation,
            ])
            .values([
                user_id.into(),
                input.year_month.clone().into(),
                json!(input.income).into(),
                json!(input.expenses).into(),
                json!(input.savings_allocation).into(),
            ])?
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let budget = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.db_pool)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => AppError::Conflict(format!(
                    "Budget for {} already exists",
                    input.year_month
                )),
                other => other,
            })?;

        Ok(budget)
    }

    async fn update(
        &self,
        user_id: i32,
        year_month: &str,
        input: &UpdateBudgetRequest,
    ) -> Result<Option<Budget>, AppError> {
        info!("Updating budget {year_month} of user {user_id}");

        let mut update_query = Query::update();
        let mut query = update_query
            .table(Budgets::Table)
            .value(Budgets::UpdatedAt, Expr::current_timestamp())
            .and_where(Expr::col(Budgets::UserId).eq(user_id))
            .and_where(Expr::col(Budgets::YearMonth).eq(year_month));

        if let Some(income) = &input.income {
            query = query.value(Budgets::Income, json!(income));
        }

        if let Some(expenses) = &input.expenses {
            query = query.value(Budgets::Expenses, json!(expenses));
        }

        if let Some(savings) = &input.savings_allocation {
            query = query.value(Budgets::SavingsAllocation, json!(savings));
        }

        let (sql, values) = query.returning_all().build_sqlx(PostgresQueryBuilder);

        let budget = sqlx::query_as_with::<_, Budget, _>(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(budget)
    }

    async fn delete(&self, user_id: i32, year_month: &str) -> Result<bool, AppError> {
        info!("Deleting budget {year_month} of user {user_id}");

        let (sql, values) = Query::delete()
            .from_table(Budgets::Table)
            .and_where(Expr::col(Budgets::UserId).eq(user_id))
            .and_where(Expr::col(Budgets::YearMonth).eq(year_month))
            .build_sqlx(PostgresQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

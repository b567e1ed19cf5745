use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_query::{Expr, Func, OnConflict, Order, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use tracing::{error, info};

use crate::abstract_trait::{
    CreatePaymentRequest, PaymentRepositoryTrait, PaymentTransition, SubscriptionRepositoryTrait,
};
use crate::config::ConnectionPool;
use crate::domain::request::page_offset;
use crate::model::payment::{Payment, PaymentStatus};
use crate::model::subscription::Subscription;
use crate::schema::payment::Payments;
use crate::schema::subscription::Subscriptions;
use crate::utils::AppError;

pub struct PaymentRepository {
    db_pool: ConnectionPool,
}

impl PaymentRepository {
    pub fn new(db_pool: ConnectionPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentRepositoryTrait for PaymentRepository {
    async fn create(&self, input: &CreatePaymentRequest) -> Result<Payment, AppError> {
        info!("Creating payment {} for user {}", input.order_id, input.user_id);

        let (sql, values) = Query::insert()
            .into_table(Payments::Table)
            .columns([
                Payments::UserId,
                Payments::OrderId,
                Payments::Plan,
                Payments::Amount,
                Payments::Status,
            ])
            .values([
                input.user_id.into(),
                input.order_id.clone().into(),
                input.plan.clone().into(),
                input.amount.into(),
                PaymentStatus::Pending.as_str().into(),
            ])?
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let payment = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.db_pool)
            .await?;

        Ok(payment)
    }

    async fn attach_snap(
        &self,
        order_id: &str,
        snap_token: &str,
        redirect_url: &str,
    ) -> Result<Payment, AppError> {
        let (sql, values) = Query::update()
            .table(Payments::Table)
            .value(Payments::SnapToken, snap_token)
            .value(Payments::RedirectUrl, redirect_url)
            .value(Payments::UpdatedAt, Expr::current_timestamp())
            .and_where(Expr::col(Payments::OrderId).eq(order_id))
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let payment = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.db_pool)
            .await?;

        Ok(payment)
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Payment>, AppError> {
        info!("Finding payment by order id: {order_id}");

        let (sql, values) = Query::select()
            .columns(Payments::COLUMNS)
            .from(Payments::Table)
            .and_where(Expr::col(Payments::OrderId).eq(order_id))
            .build_sqlx(PostgresQueryBuilder);

        let payment = sqlx::query_as_with::<_, Payment, _>(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(payment)
    }

    async fn find_by_user(
        &self,
        user_id: i32,
        page: i32,
        page_size: i32,
    ) -> Result<(Vec<Payment>, i64), AppError> {
        info!("Getting payments of user {user_id} - page: {page}, page_size: {page_size}");

        let offset = page_offset(page, page_size);

        let (sql, values) = Query::select()
            .columns(Payments::COLUMNS)
            .from(Payments::Table)
            .and_where(Expr::col(Payments::UserId).eq(user_id))
            .order_by(Payments::CreatedAt, Order::Desc)
            .order_by(Payments::PaymentId, Order::Desc)
            .limit(page_size as u64)
            .offset(offset)
            .build_sqlx(PostgresQueryBuilder);

        let payments = sqlx::query_as_with::<_, Payment, _>(&sql, values)
            .fetch_all(&self.db_pool)
            .await
            .map_err(|e| {
                error!("Error fetching payments: {e}");
                AppError::from(e)
            })?;

        let (count_sql, count_values) = Query::select()
            .expr(Func::count(Expr::col(Payments::PaymentId)))
            .from(Payments::Table)
            .and_where(Expr::col(Payments::UserId).eq(user_id))
            .build_sqlx(PostgresQueryBuilder);

        let (total,) = sqlx::query_as_with::<_, (i64,), _>(&count_sql, count_values)
            .fetch_one(&self.db_pool)
            .await?;

        Ok((payments, total))
    }

    async fn transition_status(
        &self,
        transition: &PaymentTransition,
    ) -> Result<Option<Payment>, AppError> {
        let sources: Vec<&'static str> = PaymentStatus::sources_for(transition.next)
            .iter()
            .map(|status| status.as_str())
            .collect();

        if sources.is_empty() {
            return Ok(None);
        }

        info!(
            "Moving payment {} to {} from any of {sources:?}",
            transition.order_id, transition.next
        );

        let mut update_query = Query::update();
        let mut query = update_query
            .table(Payments::Table)
            .value(Payments::Status, transition.next.as_str())
            .value(Payments::UpdatedAt, Expr::current_timestamp())
            .and_where(Expr::col(Payments::OrderId).eq(transition.order_id.clone()))
            .and_where(Expr::col(Payments::Status).is_in(sources));

        if let Some(payment_type) = &transition.payment_type {
            query = query.value(Payments::PaymentType, payment_type.clone());
        }

        if let Some(transaction_id) = &transition.transaction_id {
            query = query.value(Payments::TransactionId, transaction_id.clone());
        }

        if transition.next == PaymentStatus::Success {
            query = query.value(Payments::PaidAt, Expr::current_timestamp());
        }

        let (sql, values) = query.returning_all().build_sqlx(PostgresQueryBuilder);

        let payment = sqlx::query_as_with::<_, Payment, _>(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(payment)
    }
}

pub struct SubscriptionRepository {
    db_pool: ConnectionPool,
}

impl SubscriptionRepository {
    pub fn new(db_pool: ConnectionPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepositoryTrait for SubscriptionRepository {
    async fn find_by_user(&self, user_id: i32) -> Result<Option<Subscription>, AppError> {
        let (sql, values) = Query::select()
            .columns(Subscriptions::COLUMNS)
            .from(Subscriptions::Table)
            .and_where(Expr::col(Subscriptions::UserId).eq(user_id))
            .build_sqlx(PostgresQueryBuilder);

        let subscription = sqlx::query_as_with::<_, Subscription, _>(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(subscription)
    }

    async fn upsert_active(
        &self,
        user_id: i32,
        plan: &str,
        started_at: NaiveDateTime,
        expires_at: NaiveDateTime,
    ) -> Result<Subscription, AppError> {
        info!("Activating {plan} for user {user_id} until {expires_at}");

        let (sql, values) = Query::insert()
            .into_table(Subscriptions::Table)
            .columns([
                Subscriptions::UserId,
                Subscriptions::Plan,
                Subscriptions::Status,
                Subscriptions::StartedAt,
                Subscriptions::ExpiresAt,
            ])
            .values([
                user_id.into(),
                plan.into(),
                "active".into(),
                started_at.into(),
                expires_at.into(),
            ])?
            .on_conflict(
                OnConflict::column(Subscriptions::UserId)
                    .update_columns([
                        Subscriptions::Plan,
                        Subscriptions::Status,
                        Subscriptions::StartedAt,
                        Subscriptions::ExpiresAt,
                    ])
                    .value(Subscriptions::UpdatedAt, Expr::current_timestamp())
                    .to_owned(),
            )
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let subscription = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.db_pool)
            .await?;

        Ok(subscription)
    }
}

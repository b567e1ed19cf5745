use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;

use crate::{
    domain::{
        request::{CheckoutRequest, FindAllPaymentRequest, MidtransNotification},
        response::{
            ApiResponse, ApiResponsePagination, ErrorResponse,
            payment::{
                CheckoutResponse, NotificationAck, PaymentResponse, PlanResponse,
                SubscriptionResponse,
            },
        },
    },
    model::{
        payment::{Payment, PaymentStatus},
        subscription::Subscription,
    },
    utils::AppError,
};

pub type DynPaymentRepository = Arc<dyn PaymentRepositoryTrait + Send + Sync>;
pub type DynSubscriptionRepository = Arc<dyn SubscriptionRepositoryTrait + Send + Sync>;
pub type DynPaymentGateway = Arc<dyn PaymentGatewayTrait + Send + Sync>;
pub type DynPaymentService = Arc<dyn PaymentServiceTrait + Send + Sync>;

#[derive(Debug, Clone)]
pub struct CreatePaymentRequest {
    pub user_id: i32,
    pub order_id: String,
    pub plan: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentTransition {
    pub order_id: String,
    pub next: PaymentStatus,
    pub payment_type: Option<String>,
    pub transaction_id: Option<String>,
}

/// Order sent to the gateway when a checkout starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapTransaction {
    pub order_id: String,
    pub gross_amount: i64,
    pub item_id: String,
    pub item_name: String,
    pub customer_name: String,
    pub customer_email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapToken {
    pub token: String,
    pub redirect_url: String,
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait PaymentRepositoryTrait {
    async fn create(&self, input: &CreatePaymentRequest) -> Result<Payment, AppError>;
    async fn attach_snap(
        &self,
        order_id: &str,
        snap_token: &str,
        redirect_url: &str,
    ) -> Result<Payment, AppError>;
    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Payment>, AppError>;
    async fn find_by_user(
        &self,
        user_id: i32,
        page: i32,
        page_size: i32,
    ) -> Result<(Vec<Payment>, i64), AppError>;
    /// Applies `next` only if the stored status may move there. `None`
    /// means the row was left untouched.
    async fn transition_status(
        &self,
        transition: &PaymentTransition,
    ) -> Result<Option<Payment>, AppError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait SubscriptionRepositoryTrait {
    async fn find_by_user(&self, user_id: i32) -> Result<Option<Subscription>, AppError>;
    async fn upsert_active(
        &self,
        user_id: i32,
        plan: &str,
        started_at: NaiveDateTime,
        expires_at: NaiveDateTime,
    ) -> Result<Subscription, AppError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait PaymentGatewayTrait {
    async fn create_transaction(&self, input: &SnapTransaction) -> Result<SnapToken, AppError>;
    fn verify_signature(&self, notification: &MidtransNotification) -> bool;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait PaymentServiceTrait {
    async fn get_plans(&self) -> Result<ApiResponse<Vec<PlanResponse>>, ErrorResponse>;
    async fn checkout(
        &self,
        user_id: i32,
        input: &CheckoutRequest,
    ) -> Result<ApiResponse<CheckoutResponse>, ErrorResponse>;
    async fn handle_notification(
        &self,
        notification: &MidtransNotification,
    ) -> Result<ApiResponse<NotificationAck>, ErrorResponse>;
    async fn get_history(
        &self,
        user_id: i32,
        req: &FindAllPaymentRequest,
    ) -> Result<ApiResponsePagination<Vec<PaymentResponse>>, ErrorResponse>;
    async fn get_payment(
        &self,
        user_id: i32,
        order_id: &str,
    ) -> Result<ApiResponse<PaymentResponse>, ErrorResponse>;
    async fn get_subscription(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<SubscriptionResponse>, ErrorResponse>;
}

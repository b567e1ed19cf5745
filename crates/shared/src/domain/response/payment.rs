use crate::model::payment::Payment;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, PartialEq)]
pub struct PlanResponse {
    pub code: String,
    pub name: String,
    pub price: i64,
    pub duration_days: i64,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct CheckoutResponse {
    pub order_id: String,
    pub plan: String,
    pub amount: i64,
    pub snap_token: String,
    pub redirect_url: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct PaymentResponse {
    pub id: i32,
    pub order_id: String,
    pub plan: String,
    pub amount: i64,
    pub status: String,
    pub redirect_url: Option<String>,
    pub payment_type: Option<String>,
    pub paid_at: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<Payment> for PaymentResponse {
    fn from(value: Payment) -> Self {
        PaymentResponse {
            id: value.payment_id,
            order_id: value.order_id,
            plan: value.plan,
            amount: value.amount,
            status: value.status,
            redirect_url: value.redirect_url,
            payment_type: value.payment_type,
            paid_at: value.paid_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, PartialEq)]
pub struct SubscriptionResponse {
    pub plan: Option<String>,
    /// `free`, `active` or `expired`.
    pub status: String,
    pub started_at: Option<NaiveDateTime>,
    pub expires_at: Option<NaiveDateTime>,
    pub is_premium: bool,
}

/// Acknowledgement returned to the payment gateway.
#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct NotificationAck {
    pub order_id: String,
    pub status: String,
    pub changed: bool,
}

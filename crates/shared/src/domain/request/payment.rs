use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::pagination::{default_page, default_page_size};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, message = "Plan is required"))]
    pub plan: String,
}

/// HTTP notification body posted by Midtrans. Only the fields used for
/// verification and status mapping are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MidtransNotification {
    pub order_id: String,
    pub status_code: String,
    pub gross_amount: String,
    pub signature_key: String,
    pub transaction_status: String,
    pub fraud_status: Option<String>,
    pub payment_type: Option<String>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
pub struct FindAllPaymentRequest {
    #[serde(default = "default_page")]
    pub page: i32,

    #[serde(default = "default_page_size")]
    pub page_size: i32,
}

impl Default for FindAllPaymentRequest {
    fn default() -> Self {
        FindAllPaymentRequest {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

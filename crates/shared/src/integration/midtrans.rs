use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha512};
use std::time::Duration;
use tracing::{error, info};

use crate::{
    abstract_trait::{PaymentGatewayTrait, SnapToken, SnapTransaction},
    config::MidtransConfig,
    domain::request::MidtransNotification,
    model::payment::PaymentStatus,
    utils::AppError,
};

const SANDBOX_SNAP_URL: &str = "https://app.sandbox.midtrans.com/snap/v1/transactions";
const PRODUCTION_SNAP_URL: &str = "https://app.midtrans.com/snap/v1/transactions";

#[derive(Debug, Clone)]
pub struct MidtransGateway {
    server_key: String,
    snap_url: &'static str,
    client: Client,
}

impl MidtransGateway {
    pub fn new(config: &MidtransConfig) -> Result<Self, AppError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            server_key: config.server_key.clone(),
            snap_url: if config.is_production {
                PRODUCTION_SNAP_URL
            } else {
                SANDBOX_SNAP_URL
            },
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SnapResponse {
    token: String,
    redirect_url: String,
}

/// `sha512(order_id + status_code + gross_amount + server_key)` in hex.
pub fn notification_signature(
    order_id: &str,
    status_code: &str,
    gross_amount: &str,
    server_key: &str,
) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Maps a gateway transaction status onto a payment status. Unknown
/// statuses leave the payment unchanged.
pub fn map_transaction_status(
    transaction_status: &str,
    fraud_status: Option<&str>,
) -> Option<PaymentStatus> {
    match transaction_status {
        "capture" => match fraud_status {
            None | Some("accept") => Some(PaymentStatus::Success),
            Some("challenge") => Some(PaymentStatus::Challenge),
            Some(_) => Some(PaymentStatus::Failed),
        },
        "settlement" => Some(PaymentStatus::Success),
        "pending" => Some(PaymentStatus::Pending),
        "deny" => Some(PaymentStatus::Failed),
        "cancel" => Some(PaymentStatus::Cancelled),
        "expire" => Some(PaymentStatus::Expired),
        "refund" | "partial_refund" => Some(PaymentStatus::Refunded),
        _ => None,
    }
}

#[async_trait]
impl PaymentGatewayTrait for MidtransGateway {
    async fn create_transaction(&self, input: &SnapTransaction) -> Result<SnapToken, AppError> {
        info!("Requesting Snap transaction for order {}", input.order_id);

        let body = json!({
            "transaction_details": {
                "order_id": input.order_id,
                "gross_amount": input.gross_amount,
            },
            "customer_details": {
                "first_name": input.customer_name,
                "email": input.customer_email,
            },
            "item_details": [{
                "id": input.item_id,
                "price": input.gross_amount,
                "quantity": 1,
                "name": input.item_name,
            }],
        });

        let response = self
            .client
            .post(self.snap_url)
            .basic_auth(&self.server_key, Some(""))
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            error!("Midtrans Snap error {status}: {text}");
            return Err(AppError::UpstreamError(format!("Midtrans returned {status}")));
        }

        let snap: SnapResponse = response.json().await?;

        Ok(SnapToken {
            token: snap.token,
            redirect_url: snap.redirect_url,
        })
    }

    fn verify_signature(&self, notification: &MidtransNotification) -> bool {
        let expected = notification_signature(
            &notification.order_id,
            &notification.status_code,
            &notification.gross_amount,
            &self.server_key,
        );

        expected.eq_ignore_ascii_case(&notification.signature_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_sha512_of_concatenation() {
        let signature = notification_signature("HSL-1-1700000000000", "200", "49000.00", "key");

        let mut hasher = Sha512::new();
        hasher.update(b"HSL-1-1700000000000200" as &[u8]);
        hasher.update(b"49000.00key" as &[u8]);

        assert_eq!(signature, hex::encode(hasher.finalize()));
        assert_eq!(signature.len(), 128);
    }

    #[test]
    fn verifies_notification_signature() {
        let gateway = MidtransGateway::new(&MidtransConfig {
            server_key: "server-key".into(),
            is_production: false,
        })
        .unwrap();

        let mut notification = MidtransNotification {
            order_id: "HSL-7-1".into(),
            status_code: "200".into(),
            gross_amount: "49000.00".into(),
            transaction_status: "settlement".into(),
            ..Default::default()
        };
        notification.signature_key =
            notification_signature("HSL-7-1", "200", "49000.00", "server-key");

        assert!(gateway.verify_signature(&notification));

        notification.gross_amount = "1.00".into();
        assert!(!gateway.verify_signature(&notification));
    }

    #[test]
    fn maps_capture_by_fraud_status() {
        assert_eq!(map_transaction_status("capture", None), Some(PaymentStatus::Success));
        assert_eq!(
            map_transaction_status("capture", Some("accept")),
            Some(PaymentStatus::Success)
        );
        assert_eq!(
            map_transaction_status("capture", Some("challenge")),
            Some(PaymentStatus::Challenge)
        );
    }

    #[test]
    fn maps_terminal_statuses() {
        assert_eq!(map_transaction_status("settlement", None), Some(PaymentStatus::Success));
        assert_eq!(map_transaction_status("deny", None), Some(PaymentStatus::Failed));
        assert_eq!(map_transaction_status("cancel", None), Some(PaymentStatus::Cancelled));
        assert_eq!(map_transaction_status("expire", None), Some(PaymentStatus::Expired));
        assert_eq!(
            map_transaction_status("partial_refund", None),
            Some(PaymentStatus::Refunded)
        );
        assert_eq!(map_transaction_status("authorize", None), None);
    }
}

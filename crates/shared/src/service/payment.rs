use crate::{
    abstract_trait::{
        CreatePaymentRequest, DynMailer, DynNotificationService, DynPaymentGateway,
        DynPaymentRepository, DynSubscriptionRepository, DynUserRepository, PaymentServiceTrait,
        PaymentTransition, SnapTransaction,
    },
    domain::{
        request::{CheckoutRequest, FindAllPaymentRequest, MidtransNotification, normalize_page},
        response::{
            ApiResponse, ApiResponsePagination, ErrorResponse,
            pagination::Pagination,
            payment::{
                CheckoutResponse, NotificationAck, PaymentResponse, PlanResponse,
                SubscriptionResponse,
            },
        },
    },
    integration::{map_transaction_status, templates},
    model::{
        notification::NotificationKind,
        payment::{Payment, PaymentStatus},
        subscription::Subscription,
    },
    utils::{AppError, Method, Metrics, ServiceTracer},
};
use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use opentelemetry::KeyValue;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub code: &'static str,
    pub name: &'static str,
    pub price: i64,
    pub duration_days: i64,
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        PlanResponse {
            code: plan.code.to_string(),
            name: plan.name.to_string(),
            price: plan.price,
            duration_days: plan.duration_days,
        }
    }
}

pub const PLANS: [Plan; 2] = [
    Plan {
        code: "premium_monthly",
        name: "Premium Monthly",
        price: 49_000,
        duration_days: 30,
    },
    Plan {
        code: "premium_yearly",
        name: "Premium Yearly",
        price: 490_000,
        duration_days: 365,
    },
];

pub fn find_plan(code: &str) -> Option<Plan> {
    PLANS.into_iter().find(|plan| plan.code == code)
}

pub fn order_id_for(user_id: i32, unix_millis: i64) -> String {
    format!("HSL-{user_id}-{unix_millis}")
}

/// Start and end of a subscription after buying `days` more. Time left
/// on an active subscription is kept.
pub fn extend_expiry(
    now: NaiveDateTime,
    current: Option<&Subscription>,
    days: i64,
) -> (NaiveDateTime, NaiveDateTime) {
    match current.filter(|s| s.is_active_at(now)) {
        Some(active) => (active.started_at, active.expires_at + Duration::days(days)),
        None => (now, now + Duration::days(days)),
    }
}

fn subscription_view(
    subscription: Option<Subscription>,
    now: NaiveDateTime,
) -> SubscriptionResponse {
    match subscription {
        None => SubscriptionResponse {
            plan: None,
            status: "free".to_string(),
            started_at: None,
            expires_at: None,
            is_premium: false,
        },
        Some(subscription) => {
            let active = subscription.is_active_at(now);

            SubscriptionResponse {
                plan: Some(subscription.plan),
                status: if active { "active" } else { "expired" }.to_string(),
                started_at: Some(subscription.started_at),
                expires_at: Some(subscription.expires_at),
                is_premium: active,
            }
        }
    }
}

#[derive(Clone)]
pub struct PaymentService {
    payments: DynPaymentRepository,
    subscriptions: DynSubscriptionRepository,
    users: DynUserRepository,
    gateway: DynPaymentGateway,
    notifications: DynNotificationService,
    mailer: DynMailer,
    tracer: ServiceTracer,
}

impl PaymentService {
    pub fn new(
        payments: DynPaymentRepository,
        subscriptions: DynSubscriptionRepository,
        users: DynUserRepository,
        gateway: DynPaymentGateway,
        notifications: DynNotificationService,
        mailer: DynMailer,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            payments,
            subscriptions,
            users,
            gateway,
            notifications,
            mailer,
            tracer: ServiceTracer::new("payment-service", metrics),
        }
    }

    async fn start_checkout(
        &self,
        user_id: i32,
        input: &CheckoutRequest,
    ) -> Result<CheckoutResponse, AppError> {
        let plan = find_plan(&input.plan)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown plan '{}'", input.plan)))?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let order_id = order_id_for(user_id, Utc::now().timestamp_millis());

        self.payments
            .create(&CreatePaymentRequest {
                user_id,
                order_id: order_id.clone(),
                plan: plan.code.to_string(),
                amount: plan.price,
            })
            .await?;

        let transaction = SnapTransaction {
            order_id: order_id.clone(),
            gross_amount: plan.price,
            item_id: plan.code.to_string(),
            item_name: plan.name.to_string(),
            customer_name: user.name,
            customer_email: user.email,
        };

        let snap = match self.gateway.create_transaction(&transaction).await {
            Ok(snap) => snap,
            Err(err) => {
                error!("Snap transaction for order {order_id} failed: {err}");

                let failed = PaymentTransition {
                    order_id: order_id.clone(),
                    next: PaymentStatus::Failed,
                    payment_type: None,
                    transaction_id: None,
                };
                if let Err(mark_err) = self.payments.transition_status(&failed).await {
                    error!("Could not mark order {order_id} as failed: {mark_err}");
                }

                return Err(err);
            }
        };

        self.payments
            .attach_snap(&order_id, &snap.token, &snap.redirect_url)
            .await?;

        Ok(CheckoutResponse {
            order_id,
            plan: plan.code.to_string(),
            amount: plan.price,
            snap_token: snap.token,
            redirect_url: snap.redirect_url,
        })
    }

    async fn process_notification(
        &self,
        notification: &MidtransNotification,
    ) -> Result<NotificationAck, AppError> {
        if !self.gateway.verify_signature(notification) {
            warn!(
                "Rejected notification for order {} with a bad signature",
                notification.order_id
            );
            return Err(AppError::Forbidden("Invalid signature".to_string()));
        }

        let payment = self
            .payments
            .find_by_order_id(&notification.order_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Order {} not found", notification.order_id))
            })?;

        let Some(next) = map_transaction_status(
            &notification.transaction_status,
            notification.fraud_status.as_deref(),
        ) else {
            info!(
                "Ignoring transaction status '{}' for order {}",
                notification.transaction_status, payment.order_id
            );
            return Ok(NotificationAck {
                order_id: payment.order_id,
                status: payment.status,
                changed: false,
            });
        };

        let transition = PaymentTransition {
            order_id: payment.order_id.clone(),
            next,
            payment_type: notification.payment_type.clone(),
            transaction_id: notification.transaction_id.clone(),
        };

        let Some(updated) = self.payments.transition_status(&transition).await? else {
            info!(
                "Order {} stays {} (notification asked for {next})",
                payment.order_id, payment.status
            );
            return Ok(NotificationAck {
                order_id: payment.order_id,
                status: payment.status,
                changed: false,
            });
        };

        info!("Order {} moved from {} to {next}", updated.order_id, payment.status);

        if next == PaymentStatus::Success {
            self.activate_subscription(&updated).await?;
        } else if next != PaymentStatus::Pending {
            self.notifications
                .notify(
                    updated.user_id,
                    NotificationKind::Payment,
                    "Payment update",
                    &format!("Your payment for order {} is now {next}.", updated.order_id),
                )
                .await;
        }

        Ok(NotificationAck {
            order_id: updated.order_id,
            status: updated.status,
            changed: true,
        })
    }

    async fn activate_subscription(&self, payment: &Payment) -> Result<(), AppError> {
        let plan = find_plan(&payment.plan).ok_or_else(|| {
            AppError::InternalError(format!(
                "Order {} references unknown plan '{}'",
                payment.order_id, payment.plan
            ))
        })?;

        let now = Utc::now().naive_utc();
        let current = self.subscriptions.find_by_user(payment.user_id).await?;
        let (started_at, expires_at) = extend_expiry(now, current.as_ref(), plan.duration_days);

        let subscription = self
            .subscriptions
            .upsert_active(payment.user_id, plan.code, started_at, expires_at)
            .await?;

        let expires_label = subscription.expires_at.format("%d %B %Y").to_string();

        self.notifications
            .notify(
                payment.user_id,
                NotificationKind::Payment,
                "Payment successful",
                &format!("{} is active until {expires_label}.", plan.name),
            )
            .await;

        match self.users.find_by_id(payment.user_id).await {
            Ok(Some(user)) => {
                let receipt = templates::payment_receipt(
                    &user.email,
                    &user.name,
                    &payment.order_id,
                    plan.name,
                    payment.amount,
                    &expires_label,
                );
                if let Err(err) = self.mailer.send(&receipt).await {
                    error!("Failed to send receipt for order {}: {err}", payment.order_id);
                }
            }
            Ok(None) => warn!("User {} vanished before the receipt was sent", payment.user_id),
            Err(err) => error!("Failed to load user {} for receipt: {err}", payment.user_id),
        }

        Ok(())
    }
}

#[async_trait]
impl PaymentServiceTrait for PaymentService {
    async fn get_plans(&self) -> Result<ApiResponse<Vec<PlanResponse>>, ErrorResponse> {
        Ok(ApiResponse::success(
            "Plans retrieved successfully",
            PLANS.into_iter().map(PlanResponse::from).collect(),
        ))
    }

    async fn checkout(
        &self,
        user_id: i32,
        input: &CheckoutRequest,
    ) -> Result<ApiResponse<CheckoutResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "Checkout",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("plan", input.plan.clone()),
            ],
        );

        let result = self.start_checkout(user_id, input).await;
        let checkout = self.tracer.finish(
            &tracing_ctx,
            Method::Post,
            result,
            "Checkout created successfully",
        )?;

        Ok(ApiResponse::success("Checkout created successfully", checkout))
    }

    async fn handle_notification(
        &self,
        notification: &MidtransNotification,
    ) -> Result<ApiResponse<NotificationAck>, ErrorResponse> {
        let method = Method::Post;
        let tracing_ctx = self.tracer.start_tracing(
            "HandlePaymentNotification",
            vec![
                KeyValue::new("order_id", notification.order_id.clone()),
                KeyValue::new("transaction_status", notification.transaction_status.clone()),
            ],
        );

        match self.process_notification(notification).await {
            Ok(ack) => {
                self.tracer.complete_tracing_success(
                    &tracing_ctx,
                    method,
                    "Notification processed successfully",
                );
                Ok(ApiResponse::success("Notification processed successfully", ack))
            }
            Err(err) => {
                error!(
                    "Failed to process notification for order {}: {err}",
                    notification.order_id
                );
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, &err.to_string());
                Err(ErrorResponse::from(err))
            }
        }
    }

    async fn get_history(
        &self,
        user_id: i32,
        req: &FindAllPaymentRequest,
    ) -> Result<ApiResponsePagination<Vec<PaymentResponse>>, ErrorResponse> {
        let (page, page_size) = normalize_page(req.page, req.page_size);

        let tracing_ctx = self.tracer.start_tracing(
            "GetPaymentHistory",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        let result = self.payments.find_by_user(user_id, page, page_size).await;
        let (payments, total) = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Payment history retrieved successfully",
        )?;

        Ok(ApiResponsePagination::success(
            "Payment history retrieved successfully",
            payments.into_iter().map(PaymentResponse::from).collect(),
            Pagination::new(page, page_size, total),
        ))
    }

    async fn get_payment(
        &self,
        user_id: i32,
        order_id: &str,
    ) -> Result<ApiResponse<PaymentResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "GetPayment",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("order_id", order_id.to_string()),
            ],
        );

        let result = match self.payments.find_by_order_id(order_id).await {
            Ok(Some(payment)) if payment.user_id == user_id => Ok(payment),
            Ok(_) => Err(AppError::NotFound(format!("Order {order_id} not found"))),
            Err(err) => Err(err),
        };

        let payment = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Payment retrieved successfully",
        )?;

        Ok(ApiResponse::success(
            "Payment retrieved successfully",
            PaymentResponse::from(payment),
        ))
    }

    async fn get_subscription(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<SubscriptionResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "GetSubscription",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        let result = self.subscriptions.find_by_user(user_id).await;
        let subscription = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Subscription retrieved successfully",
        )?;

        Ok(ApiResponse::success(
            "Subscription retrieved successfully",
            subscription_view(subscription, Utc::now().naive_utc()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::{
            MockMailerTrait, MockNotificationServiceTrait, MockPaymentGatewayTrait,
            MockPaymentRepositoryTrait, MockSubscriptionRepositoryTrait, MockUserRepositoryTrait,
            SnapToken,
        },
        model::user::User,
    };
    use axum::http::StatusCode;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn payment(status: &str) -> Payment {
        Payment {
            payment_id: 1,
            user_id: 7,
            order_id: "HSL-7-1".into(),
            plan: "premium_monthly".into(),
            amount: 49_000,
            status: status.into(),
            snap_token: None,
            redirect_url: None,
            payment_type: None,
            transaction_id: None,
            paid_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn subscription(expires_at: NaiveDateTime) -> Subscription {
        Subscription {
            subscription_id: 1,
            user_id: 7,
            plan: "premium_monthly".into(),
            status: "active".into(),
            started_at: at(1),
            expires_at,
            created_at: None,
            updated_at: None,
        }
    }

    fn user() -> User {
        User {
            user_id: 7,
            name: "Rina".into(),
            email: "rina@example.com".into(),
            password: None,
            google_id: None,
            avatar_url: None,
            phone: None,
            refresh_token_hash: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn settlement() -> MidtransNotification {
        MidtransNotification {
            order_id: "HSL-7-1".into(),
            status_code: "200".into(),
            gross_amount: "49000.00".into(),
            signature_key: "sig".into(),
            transaction_status: "settlement".into(),
            payment_type: Some("bank_transfer".into()),
            ..Default::default()
        }
    }

    struct Mocks {
        payments: MockPaymentRepositoryTrait,
        subscriptions: MockSubscriptionRepositoryTrait,
        users: MockUserRepositoryTrait,
        gateway: MockPaymentGatewayTrait,
        notifications: MockNotificationServiceTrait,
        mailer: MockMailerTrait,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                payments: MockPaymentRepositoryTrait::new(),
                subscriptions: MockSubscriptionRepositoryTrait::new(),
                users: MockUserRepositoryTrait::new(),
                gateway: MockPaymentGatewayTrait::new(),
                notifications: MockNotificationServiceTrait::new(),
                mailer: MockMailerTrait::new(),
            }
        }

        fn into_service(self) -> PaymentService {
            PaymentService::new(
                Arc::new(self.payments),
                Arc::new(self.subscriptions),
                Arc::new(self.users),
                Arc::new(self.gateway),
                Arc::new(self.notifications),
                Arc::new(self.mailer),
                Arc::new(Metrics::new()),
            )
        }
    }

    #[test]
    fn active_subscription_is_extended_from_its_expiry() {
        let current = subscription(at(20));
        let (started, expires) = extend_expiry(at(10), Some(&current), 30);

        assert_eq!(started, at(1));
        assert_eq!(expires, at(20) + Duration::days(30));
    }

    #[test]
    fn lapsed_subscription_restarts_now() {
        let current = subscription(at(5));
        let (started, expires) = extend_expiry(at(10), Some(&current), 30);

        assert_eq!(started, at(10));
        assert_eq!(expires, at(10) + Duration::days(30));
    }

    #[test]
    fn plan_catalog_and_order_ids() {
        assert_eq!(find_plan("premium_yearly").map(|p| p.price), Some(490_000));
        assert_eq!(find_plan("premium_monthly").map(|p| p.duration_days), Some(30));
        assert!(find_plan("gold").is_none());
        assert_eq!(order_id_for(12, 1_700_000_000_000), "HSL-12-1700000000000");
    }

    #[test]
    fn subscription_view_reports_status() {
        assert_eq!(subscription_view(None, at(10)).status, "free");
        assert!(subscription_view(Some(subscription(at(20))), at(10)).is_premium);

        let expired = subscription_view(Some(subscription(at(5))), at(10));
        assert_eq!(expired.status, "expired");
        assert!(!expired.is_premium);
    }

    #[tokio::test]
    async fn bad_signature_is_forbidden() {
        let mut mocks = Mocks::new();
        mocks.gateway.expect_verify_signature().returning(|_| false);
        mocks.payments.expect_find_by_order_id().never();

        let err = mocks
            .into_service()
            .handle_notification(&settlement())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let mut mocks = Mocks::new();
        mocks.gateway.expect_verify_signature().returning(|_| true);
        mocks.payments.expect_find_by_order_id().returning(|_| Ok(None));

        let err = mocks
            .into_service()
            .handle_notification(&settlement())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn settlement_activates_subscription_once() {
        let mut mocks = Mocks::new();
        mocks.gateway.expect_verify_signature().returning(|_| true);
        mocks
            .payments
            .expect_find_by_order_id()
            .returning(|_| Ok(Some(payment("pending"))));
        mocks
            .payments
            .expect_transition_status()
            .withf(|t| {
                t.next == PaymentStatus::Success && t.payment_type.as_deref() == Some("bank_transfer")
            })
            .returning(|_| Ok(Some(payment("success"))));
        mocks.subscriptions.expect_find_by_user().returning(|_| Ok(None));
        mocks
            .subscriptions
            .expect_upsert_active()
            .withf(|user_id, plan, started_at, expires_at| {
                *user_id == 7
                    && plan == "premium_monthly"
                    && *expires_at - *started_at == Duration::days(30)
            })
            .times(1)
            .returning(|_, _, started_at, expires_at| {
                Ok(Subscription {
                    started_at,
                    ..subscription(expires_at)
                })
            });
        mocks
            .notifications
            .expect_notify()
            .withf(|_, kind, _, _| *kind == NotificationKind::Payment)
            .times(1)
            .returning(|_, _, _, _| ());
        mocks.users.expect_find_by_id().returning(|_| Ok(Some(user())));
        mocks.mailer.expect_send().times(1).returning(|_| Ok(()));

        let response = mocks
            .into_service()
            .handle_notification(&settlement())
            .await
            .unwrap();

        assert!(response.data.changed);
        assert_eq!(response.data.status, "success");
    }

    #[tokio::test]
    async fn repeated_settlement_is_a_no_op() {
        let mut mocks = Mocks::new();
        mocks.gateway.expect_verify_signature().returning(|_| true);
        mocks
            .payments
            .expect_find_by_order_id()
            .returning(|_| Ok(Some(payment("success"))));
        mocks.payments.expect_transition_status().returning(|_| Ok(None));
        mocks.subscriptions.expect_upsert_active().never();
        mocks.notifications.expect_notify().never();

        let response = mocks
            .into_service()
            .handle_notification(&settlement())
            .await
            .unwrap();

        assert!(!response.data.changed);
        assert_eq!(response.data.status, "success");
    }

    #[tokio::test]
    async fn unknown_plan_is_rejected_before_any_write() {
        let mut mocks = Mocks::new();
        mocks.payments.expect_create().never();

        let err = mocks
            .into_service()
            .checkout(7, &CheckoutRequest { plan: "gold".into() })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn checkout_stores_snap_token() {
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_id().returning(|_| Ok(Some(user())));
        mocks
            .payments
            .expect_create()
            .withf(|input| input.amount == 490_000 && input.order_id.starts_with("HSL-7-"))
            .returning(|_| Ok(payment("pending")));
        mocks
            .gateway
            .expect_create_transaction()
            .withf(|tx| tx.customer_email == "rina@example.com" && tx.item_id == "premium_yearly")
            .returning(|_| {
                Ok(SnapToken {
                    token: "snap-123".into(),
                    redirect_url: "https://app.sandbox.midtrans.com/snap/v2/vtweb/snap-123".into(),
                })
            });
        mocks
            .payments
            .expect_attach_snap()
            .withf(|_, token, _| token == "snap-123")
            .returning(|_, _, _| Ok(payment("pending")));

        let response = mocks
            .into_service()
            .checkout(
                7,
                &CheckoutRequest {
                    plan: "premium_yearly".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(response.data.snap_token, "snap-123");
        assert_eq!(response.data.amount, 490_000);
    }

    #[tokio::test]
    async fn foreign_orders_are_hidden() {
        let mut mocks = Mocks::new();
        mocks
            .payments
            .expect_find_by_order_id()
            .returning(|_| Ok(Some(payment("success"))));

        let err = mocks
            .into_service()
            .get_payment(8, "HSL-7-1")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}

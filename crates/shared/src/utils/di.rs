use std::sync::Arc;

use crate::{
    abstract_trait::{
        DynAiService, DynAssetRepository, DynAssetService, DynAuthService, DynBudgetRepository,
        DynBudgetService, DynHashing, DynJwtService, DynMemberRepository, DynMemberService,
        DynNotificationRepository, DynNotificationService, DynPasswordResetRepository,
        DynPaymentRepository, DynPaymentService, DynReportService, DynSettingsRepository,
        DynSettingsService, DynSetupRepository, DynSetupService, DynSpendingRepository,
        DynSpendingService, DynSubscriptionRepository, DynUserRepository, DynUserService,
    },
    cache::CacheStore,
    config::ConnectionPool,
    integration::Integrations,
    repository::{
        AssetRepository, BudgetRepository, MemberRepository, NotificationRepository,
        PasswordResetRepository, PaymentRepository, SettingsRepository, SetupRepository,
        SpendingRepository, SubscriptionRepository, UserRepository,
    },
    service::{
        AiService, AssetService, AuthService, BudgetService, MemberService, NotificationService,
        PaymentService, ReportService, SettingsService, SetupService, SpendingService, UserService,
    },
    utils::Metrics,
};

#[derive(Clone)]
pub struct DependenciesInject {
    pub auth_service: DynAuthService,
    pub user_service: DynUserService,
    pub settings_service: DynSettingsService,
    pub setup_service: DynSetupService,
    pub budget_service: DynBudgetService,
    pub spending_service: DynSpendingService,
    pub asset_service: DynAssetService,
    pub report_service: DynReportService,
    pub payment_service: DynPaymentService,
    pub notification_service: DynNotificationService,
    pub member_service: DynMemberService,
    pub ai_service: DynAiService,
}

impl std::fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("auth_service", &"DynAuthService")
            .field("user_service", &"DynUserService")
            .field("settings_service", &"DynSettingsService")
            .field("setup_service", &"DynSetupService")
            .field("budget_service", &"DynBudgetService")
            .field("spending_service", &"DynSpendingService")
            .field("asset_service", &"DynAssetService")
            .field("report_service", &"DynReportService")
            .field("payment_service", &"DynPaymentService")
            .field("notification_service", &"DynNotificationService")
            .field("member_service", &"DynMemberService")
            .field("ai_service", &"DynAiService")
            .finish()
    }
}

impl DependenciesInject {
    pub fn new(
        pool: ConnectionPool,
        cache: CacheStore,
        integrations: Integrations,
        hashing: DynHashing,
        jwt_config: DynJwtService,
        metrics: Arc<Metrics>,
        frontend_url: &str,
    ) -> Self {
        let user_repository = Arc::new(UserRepository::new(pool.clone())) as DynUserRepository;
        let reset_repository =
            Arc::new(PasswordResetRepository::new(pool.clone())) as DynPasswordResetRepository;
        let settings_repository =
            Arc::new(SettingsRepository::new(pool.clone())) as DynSettingsRepository;
        let setup_repository = Arc::new(SetupRepository::new(pool.clone())) as DynSetupRepository;
        let budget_repository =
            Arc::new(BudgetRepository::new(pool.clone())) as DynBudgetRepository;
        let spending_repository =
            Arc::new(SpendingRepository::new(pool.clone())) as DynSpendingRepository;
        let asset_repository = Arc::new(AssetRepository::new(pool.clone())) as DynAssetRepository;
        let payment_repository =
            Arc::new(PaymentRepository::new(pool.clone())) as DynPaymentRepository;
        let subscription_repository =
            Arc::new(SubscriptionRepository::new(pool.clone())) as DynSubscriptionRepository;
        let notification_repository =
            Arc::new(NotificationRepository::new(pool.clone())) as DynNotificationRepository;
        let member_repository = Arc::new(MemberRepository::new(pool)) as DynMemberRepository;

        let notification_service = Arc::new(NotificationService::new(
            notification_repository,
            metrics.clone(),
        )) as DynNotificationService;

        let auth_service = Arc::new(AuthService::new(
            user_repository.clone(),
            reset_repository,
            settings_repository.clone(),
            hashing.clone(),
            jwt_config,
            integrations.oauth.clone(),
            integrations.mailer.clone(),
            frontend_url.to_string(),
            metrics.clone(),
        )) as DynAuthService;

        let user_service = Arc::new(UserService::new(
            user_repository.clone(),
            hashing,
            integrations.media_storage.clone(),
            metrics.clone(),
        )) as DynUserService;

        let settings_service = Arc::new(SettingsService::new(
            settings_repository.clone(),
            metrics.clone(),
        )) as DynSettingsService;

        let setup_service =
            Arc::new(SetupService::new(setup_repository, metrics.clone())) as DynSetupService;

        let budget_service = Arc::new(BudgetService::new(
            budget_repository.clone(),
            notification_service.clone(),
            cache.clone(),
            metrics.clone(),
        )) as DynBudgetService;

        let spending_service = Arc::new(SpendingService::new(
            spending_repository.clone(),
            budget_repository.clone(),
            settings_repository,
            notification_service.clone(),
            cache.clone(),
            metrics.clone(),
        )) as DynSpendingService;

        let asset_service = Arc::new(AssetService::new(
            asset_repository,
            cache.clone(),
            metrics.clone(),
        )) as DynAssetService;

        let report_service = Arc::new(ReportService::new(
            budget_repository.clone(),
            spending_repository,
            cache,
            metrics.clone(),
        )) as DynReportService;

        let payment_service = Arc::new(PaymentService::new(
            payment_repository,
            subscription_repository.clone(),
            user_repository.clone(),
            integrations.payment_gateway.clone(),
            notification_service.clone(),
            integrations.mailer.clone(),
            metrics.clone(),
        )) as DynPaymentService;

        let member_service = Arc::new(MemberService::new(
            member_repository,
            user_repository,
            subscription_repository,
            notification_service.clone(),
            integrations.mailer.clone(),
            frontend_url.to_string(),
            metrics.clone(),
        )) as DynMemberService;

        let ai_service = Arc::new(AiService::new(
            integrations.chat.clone(),
            budget_repository,
            metrics,
        )) as DynAiService;

        Self {
            auth_service,
            user_service,
            settings_service,
            setup_service,
            budget_service,
            spending_service,
            asset_service,
            report_service,
            payment_service,
            notification_service,
            member_service,
            ai_service,
        }
    }
}

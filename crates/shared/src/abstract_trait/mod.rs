pub mod ai;
pub mod asset;
pub mod auth;
pub mod budget;
pub mod hashing;
pub mod jwt;
pub mod mailer;
pub mod member;
pub mod notification;
pub mod oauth;
pub mod payment;
pub mod report;
pub mod settings;
pub mod setup;
pub mod spending;
pub mod storage;
pub mod user;

pub use self::ai::{AiServiceTrait, ChatProviderTrait, ChatStream, DynAiService, DynChatProvider};
pub use self::asset::{AssetRepositoryTrait, AssetServiceTrait, DynAssetRepository, DynAssetService};
pub use self::auth::{
    AuthServiceTrait, DynAuthService, DynPasswordResetRepository, PasswordResetRepositoryTrait,
};
pub use self::budget::{
    BudgetRepositoryTrait, BudgetServiceTrait, DynBudgetRepository, DynBudgetService,
};
pub use self::hashing::{DynHashing, HashingTrait};
pub use self::jwt::{DynJwtService, JwtServiceTrait};
pub use self::mailer::{DynMailer, EmailMessage, MailerTrait};
pub use self::member::{
    DynMemberRepository, DynMemberService, MemberRepositoryTrait, MemberServiceTrait,
};
pub use self::notification::{
    DynNotificationRepository, DynNotificationService, NotificationRepositoryTrait,
    NotificationServiceTrait,
};
pub use self::oauth::{DynOAuthProvider, OAuthProviderTrait};
pub use self::payment::{
    CreatePaymentRequest, DynPaymentGateway, DynPaymentRepository, DynPaymentService,
    DynSubscriptionRepository, PaymentGatewayTrait, PaymentRepositoryTrait, PaymentServiceTrait,
    PaymentTransition, SnapToken, SnapTransaction, SubscriptionRepositoryTrait,
};
pub use self::report::{DynReportService, ReportServiceTrait};
pub use self::settings::{
    DynSettingsRepository, DynSettingsService, SettingsRepositoryTrait, SettingsServiceTrait,
};
pub use self::setup::{DynSetupRepository, DynSetupService, SetupRepositoryTrait, SetupServiceTrait};
pub use self::spending::{
    DynSpendingRepository, DynSpendingService, SpendingRepositoryTrait, SpendingServiceTrait,
};
pub use self::storage::{DynMediaStorage, MediaStorageTrait};
pub use self::user::{
    AvatarUpload, DynUserRepository, DynUserService, UserRepositoryTrait, UserServiceTrait,
};

#[cfg(any(test, feature = "mocks"))]
pub use self::{
    ai::{MockAiServiceTrait, MockChatProviderTrait},
    asset::{MockAssetRepositoryTrait, MockAssetServiceTrait},
    auth::{MockAuthServiceTrait, MockPasswordResetRepositoryTrait},
    budget::{MockBudgetRepositoryTrait, MockBudgetServiceTrait},
    hashing::MockHashingTrait,
    jwt::MockJwtServiceTrait,
    mailer::MockMailerTrait,
    member::{MockMemberRepositoryTrait, MockMemberServiceTrait},
    notification::{MockNotificationRepositoryTrait, MockNotificationServiceTrait},
    oauth::MockOAuthProviderTrait,
    payment::{
        MockPaymentGatewayTrait, MockPaymentRepositoryTrait, MockPaymentServiceTrait,
        MockSubscriptionRepositoryTrait,
    },
    report::MockReportServiceTrait,
    settings::{MockSettingsRepositoryTrait, MockSettingsServiceTrait},
    setup::{MockSetupRepositoryTrait, MockSetupServiceTrait},
    spending::{MockSpendingRepositoryTrait, MockSpendingServiceTrait},
    storage::MockMediaStorageTrait,
    user::{MockUserRepositoryTrait, MockUserServiceTrait},
};

mod asset;
mod budget;
mod member;
mod notification;
mod password_reset;
mod payment;
mod settings;
mod setup;
mod spending;
mod user;

pub use self::asset::AssetRepository;
pub use self::budget::BudgetRepository;
pub use self::member::MemberRepository;
pub use self::notification::NotificationRepository;
pub use self::password_reset::PasswordResetRepository;
pub use self::payment::{PaymentRepository, SubscriptionRepository};
pub use self::settings::SettingsRepository;
pub use self::setup::SetupRepository;
pub use self::spending::SpendingRepository;
pub use self::user::UserRepository;

mod ai;
mod asset;
mod auth;
mod budget;
mod member;
mod notification;
mod payment;
mod report;
mod settings;
mod setup;
mod spending;
mod user;

pub use self::ai::{AiService, system_prompt};
pub use self::asset::{AssetService, summarize_assets};
pub use self::auth::AuthService;
pub use self::budget::{BudgetService, summarize_budget};
pub use self::member::{MAX_GROUP_MEMBERS, MemberService};
pub use self::notification::NotificationService;
pub use self::payment::{PLANS, PaymentService, Plan, extend_expiry, find_plan, order_id_for};
pub use self::report::{ReportService, build_monthly_report, build_yearly_report};
pub use self::settings::SettingsService;
pub use self::setup::SetupService;
pub use self::spending::{SpendingService, crosses_threshold, summarize_spending};
pub use self::user::{MAX_AVATAR_BYTES, UserService};

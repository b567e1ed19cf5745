pub mod ai;
pub mod asset;
pub mod auth;
pub mod budget;
pub mod member;
pub mod notification;
pub mod pagination;
pub mod payment;
pub mod settings;
pub mod setup;
pub mod spending;
pub mod user;

pub use self::ai::{ChatMessage, ChatRequest, ChatRole};
pub use self::asset::{CreateAssetRequest, FindAllAssetRequest, UpdateAssetRequest};
pub use self::auth::{
    ForgotPasswordRequest, GoogleCallbackQuery, GoogleProfile, LoginRequest, RegisterRequest,
    ResetPasswordRequest,
};
pub use self::budget::{
    CopyBudgetRequest, CreateBudgetRequest, FindAllBudgetRequest, UpdateBudgetRequest,
    validate_category_amounts,
};
pub use self::member::{CreateGroupRequest, InviteMemberRequest};
pub use self::notification::FindAllNotificationRequest;
pub use self::pagination::{PageRequest, normalize_page, page_offset};
pub use self::payment::{CheckoutRequest, FindAllPaymentRequest, MidtransNotification};
pub use self::settings::UpdateSettingsRequest;
pub use self::setup::{UpdateSetupRequest, validate_category_list};
pub use self::spending::{
    CreateSpendingRequest, FindAllSpendingRequest, SpendingSummaryQuery, UpdateSpendingRequest,
};
pub use self::user::{ChangePasswordRequest, CreateUserRequest, UpdateProfileRequest};

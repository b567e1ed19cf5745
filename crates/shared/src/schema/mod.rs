pub mod asset;
pub mod budget;
pub mod member;
pub mod notification;
pub mod password_reset;
pub mod payment;
pub mod settings;
pub mod setup;
pub mod spending;
pub mod subscription;
pub mod user;

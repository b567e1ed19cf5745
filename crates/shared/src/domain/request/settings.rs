use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub const LANGUAGES: [&str; 2] = ["id", "en"];
pub const THEMES: [&str; 3] = ["light", "dark", "system"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateSettingsRequest {
    #[validate(custom(function = "validate_currency"))]
    pub currency: Option<String>,

    #[validate(custom(function = "validate_language"))]
    pub language: Option<String>,

    #[validate(custom(function = "validate_theme"))]
    pub theme: Option<String>,

    pub email_notifications: Option<bool>,

    pub budget_alerts: Option<bool>,

    #[validate(range(min = 1, max = 100, message = "Alert threshold must be between 1 and 100"))]
    pub alert_threshold: Option<i32>,
}

fn validate_currency(value: &str) -> Result<(), ValidationError> {
    if value.len() == 3 && value.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(ValidationError::new("currency")
            .with_message(Cow::Borrowed("Currency must be 3 upper-case letters")))
    }
}

fn validate_language(value: &str) -> Result<(), ValidationError> {
    if LANGUAGES.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("language")
            .with_message(Cow::Borrowed("Language must be one of: id, en")))
    }
}

fn validate_theme(value: &str) -> Result<(), ValidationError> {
    if THEMES.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("theme")
            .with_message(Cow::Borrowed("Theme must be one of: light, dark, system")))
    }
}

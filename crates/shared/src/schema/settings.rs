use sea_query::Iden;

#[derive(Debug, Iden)]
pub enum UserSettings {
    Table,
    SettingsId,
    UserId,
    Currency,
    Language,
    Theme,
    EmailNotifications,
    BudgetAlerts,
    AlertThreshold,
    CreatedAt,
    UpdatedAt,
}

impl UserSettings {
    pub const COLUMNS: [UserSettings; 10] = [
        UserSettings::SettingsId,
        UserSettings::UserId,
        UserSettings::Currency,
        UserSettings::Language,
        UserSettings::Theme,
        UserSettings::EmailNotifications,
        UserSettings::BudgetAlerts,
        UserSettings::AlertThreshold,
        UserSettings::CreatedAt,
        UserSettings::UpdatedAt,
    ];
}

use sea_query::Iden;

#[derive(Debug, Iden)]
pub enum SetupConfigs {
    Table,
    SetupId,
    UserId,
    Needs,
    Wants,
    Savings,
    IncomeSources,
    Accounts,
    CreatedAt,
    UpdatedAt,
}

impl SetupConfigs {
    pub const COLUMNS: [SetupConfigs; 9] = [
        SetupConfigs::SetupId,
        SetupConfigs::UserId,
        SetupConfigs::Needs,
        SetupConfigs::Wants,
        SetupConfigs::Savings,
        SetupConfigs::IncomeSources,
        SetupConfigs::Accounts,
        SetupConfigs::CreatedAt,
        SetupConfigs::UpdatedAt,
    ];
}

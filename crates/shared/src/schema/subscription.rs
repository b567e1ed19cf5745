use sea_query::Iden;

#[derive(Debug, Iden)]
pub enum Subscriptions {
    Table,
    SubscriptionId,
    UserId,
    Plan,
    Status,
    StartedAt,
    ExpiresAt,
    CreatedAt,
    UpdatedAt,
}

impl Subscriptions {
    pub const COLUMNS: [Subscriptions; 8] = [
        Subscriptions::SubscriptionId,
        Subscriptions::UserId,
        Subscriptions::Plan,
        Subscriptions::Status,
        Subscriptions::StartedAt,
        Subscriptions::ExpiresAt,
        Subscriptions::CreatedAt,
        Subscriptions::UpdatedAt,
    ];
}

use sea_query::Iden;

#[derive(Debug, Iden)]
pub enum Notifications {
    Table,
    NotificationId,
    UserId,
    Kind,
    Title,
    Message,
    IsRead,
    CreatedAt,
}

impl Notifications {
    pub const COLUMNS: [Notifications; 7] = [
        Notifications::NotificationId,
        Notifications::UserId,
        Notifications::Kind,
        Notifications::Title,
        Notifications::Message,
        Notifications::IsRead,
        Notifications::CreatedAt,
    ];
}

use sea_query::Iden;

#[derive(Debug, Iden)]
pub enum Users {
    Table,
    UserId,
    Name,
    Email,
    Password,
    GoogleId,
    AvatarUrl,
    Phone,
    RefreshTokenHash,
    CreatedAt,
    UpdatedAt,
}

impl Users {
    pub const COLUMNS: [Users; 10] = [
        Users::UserId,
        Users::Name,
        Users::Email,
        Users::Password,
        Users::GoogleId,
        Users::AvatarUrl,
        Users::Phone,
        Users::RefreshTokenHash,
        Users::CreatedAt,
        Users::UpdatedAt,
    ];
}

use sea_query::Iden;

#[derive(Debug, Iden)]
pub enum PasswordResets {
    Table,
    ResetId,
    UserId,
    TokenHash,
    ExpiresAt,
    UsedAt,
    CreatedAt,
}

impl PasswordResets {
    pub const COLUMNS: [PasswordResets; 6] = [
        PasswordResets::ResetId,
        PasswordResets::UserId,
        PasswordResets::TokenHash,
        PasswordResets::ExpiresAt,
        PasswordResets::UsedAt,
        PasswordResets::CreatedAt,
    ];
}

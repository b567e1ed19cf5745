use sea_query::Iden;

#[derive(Debug, Iden)]
pub enum Assets {
    Table,
    AssetId,
    UserId,
    Name,
    AssetType,
    Category,
    Value,
    Description,
    CreatedAt,
    UpdatedAt,
}

impl Assets {
    pub const COLUMNS: [Assets; 9] = [
        Assets::AssetId,
        Assets::UserId,
        Assets::Name,
        Assets::AssetType,
        Assets::Category,
        Assets::Value,
        Assets::Description,
        Assets::CreatedAt,
        Assets::UpdatedAt,
    ];
}

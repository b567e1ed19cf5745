use sea_query::Iden;

#[derive(Debug, Iden)]
pub enum Spendings {
    Table,
    SpendingId,
    UserId,
    SpentAt,
    YearMonth,
    Category,
    CategoryType,
    Account,
    Description,
    Amount,
    CreatedAt,
    UpdatedAt,
}

impl Spendings {
    pub const COLUMNS: [Spendings; 11] = [
        Spendings::SpendingId,
        Spendings::UserId,
        Spendings::SpentAt,
        Spendings::YearMonth,
        Spendings::Category,
        Spendings::CategoryType,
        Spendings::Account,
        Spendings::Description,
        Spendings::Amount,
        Spendings::CreatedAt,
        Spendings::UpdatedAt,
    ];
}

use sea_query::Iden;

#[derive(Debug, Iden)]
pub enum Budgets {
    Table,
    BudgetId,
    UserId,
    YearMonth,
    Income,
    Expenses,
    SavingsAllocation,
    CreatedAt,
    UpdatedAt,
}

impl Budgets {
    pub const COLUMNS: [Budgets; 8] = [
        Budgets::BudgetId,
        Budgets::UserId,
        Budgets::YearMonth,
        Budgets::Income,
        Budgets::Expenses,
        Budgets::SavingsAllocation,
        Budgets::CreatedAt,
        Budgets::UpdatedAt,
    ];
}

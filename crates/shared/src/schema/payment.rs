use sea_query::Iden;

#[derive(Debug, Iden)]
pub enum Payments {
    Table,
    PaymentId,
    UserId,
    OrderId,
    Plan,
    Amount,
    Status,
    SnapToken,
    RedirectUrl,
    PaymentType,
    TransactionId,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}

impl Payments {
    pub const COLUMNS: [Payments; 13] = [
        Payments::PaymentId,
        Payments::UserId,
        Payments::OrderId,
        Payments::Plan,
        Payments::Amount,
        Payments::Status,
        Payments::SnapToken,
        Payments::RedirectUrl,
        Payments::PaymentType,
        Payments::TransactionId,
        Payments::PaidAt,
        Payments::CreatedAt,
        Payments::UpdatedAt,
    ];
}

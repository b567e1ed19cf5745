use sea_query::Iden;

#[derive(Debug, Iden)]
pub enum MemberGroups {
    Table,
    GroupId,
    OwnerId,
    Name,
    CreatedAt,
    UpdatedAt,
}

impl MemberGroups {
    pub const COLUMNS: [MemberGroups; 5] = [
        MemberGroups::GroupId,
        MemberGroups::OwnerId,
        MemberGroups::Name,
        MemberGroups::CreatedAt,
        MemberGroups::UpdatedAt,
    ];
}

#[derive(Debug, Iden)]
pub enum Members {
    Table,
    MemberId,
    GroupId,
    UserId,
    Email,
    Role,
    Status,
    InvitedAt,
    RespondedAt,
}

impl Members {
    pub const COLUMNS: [Members; 8] = [
        Members::MemberId,
        Members::GroupId,
        Members::UserId,
        Members::Email,
        Members::Role,
        Members::Status,
        Members::InvitedAt,
        Members::RespondedAt,
    ];
}

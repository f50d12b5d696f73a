use splittab_domain::model::{MemberId, Money, Transfer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemberBalance {
    pub id: MemberId,
    pub balance: Money,
}

/// The read-side answer for one group: display-rounded net positions plus
/// the suggested transfers that clear them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceReport {
    pub balances: Vec<MemberBalance>,
    pub transfers: Vec<Transfer>,
}

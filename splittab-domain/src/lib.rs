#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    Expense, ExpenseId, GroupId, LedgerSnapshot, Member, MemberBalances, MemberId, Money,
    SnapshotError, Transfer,
};
pub use services::{BalanceCalculator, BalanceError, PlanError, SettlementPlanner};

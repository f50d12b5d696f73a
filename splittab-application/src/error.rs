use splittab_domain::{
    model::{ExpenseId, GroupId, MemberId, Money, SnapshotError},
    BalanceError, PlanError,
};
use thiserror::Error;

use crate::ports::SnapshotFetchError;

/// An invariant the engine relies on was violated. Always a bug upstream of
/// the engine, never a recoverable business error; retrying does not help.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("expense {expense:?} references member {member:?} missing from the balance table")]
    UnresolvedMember {
        expense: ExpenseId,
        member: MemberId,
    },
    #[error("balances sum to {total} instead of zero")]
    ImbalancedTotal { total: Money },
    #[error("stored ledger data failed snapshot validation: {0:?}")]
    CorruptSnapshot(SnapshotError),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NotFound {
    #[error("group {0:?} does not exist")]
    Group(GroupId),
    #[error("expense {0:?} does not exist")]
    Expense(ExpenseId),
    #[error("member {0:?} does not exist")]
    Member(MemberId),
    #[error("invite code {0:?} does not match any group")]
    InviteCode(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Caller-supplied data violates a precondition. Surfaced as-is and
    /// never retried automatically.
    #[error("invalid ledger input: {0:?}")]
    Validation(SnapshotError),
    #[error(transparent)]
    DataIntegrity(IntegrityError),
    #[error(transparent)]
    NotFound(NotFound),
}

impl From<SnapshotError> for EngineError {
    fn from(err: SnapshotError) -> Self {
        EngineError::Validation(err)
    }
}

impl From<BalanceError> for EngineError {
    fn from(err: BalanceError) -> Self {
        let (expense, member) = match err {
            BalanceError::UnresolvedPayer { expense, member } => (expense, member),
            BalanceError::UnresolvedParticipant { expense, member } => (expense, member),
        };
        EngineError::DataIntegrity(IntegrityError::UnresolvedMember { expense, member })
    }
}

impl From<PlanError> for EngineError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::ImbalancedTotal(total) => {
                EngineError::DataIntegrity(IntegrityError::ImbalancedTotal { total })
            }
        }
    }
}

impl From<SnapshotFetchError> for EngineError {
    fn from(err: SnapshotFetchError) -> Self {
        match err {
            SnapshotFetchError::GroupNotFound(group_id) => {
                EngineError::NotFound(NotFound::Group(group_id))
            }
            SnapshotFetchError::Corrupt(err) => {
                EngineError::DataIntegrity(IntegrityError::CorruptSnapshot(err))
            }
        }
    }
}

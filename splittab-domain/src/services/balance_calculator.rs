use crate::model::{ExpenseId, LedgerSnapshot, MemberBalances, MemberId, Money};
use rust_decimal::Decimal;

/// Net-position aggregation service.
pub struct BalanceCalculator;

/// Referential-integrity failure inside the balance table.
///
/// Snapshot construction already guarantees membership, so hitting one of
/// these means the caller handed the engine structurally broken data. The
/// expense is never silently skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BalanceError {
    UnresolvedPayer { expense: ExpenseId, member: MemberId },
    UnresolvedParticipant { expense: ExpenseId, member: MemberId },
}

impl BalanceCalculator {
    /// Aggregates every member's net position from the snapshot's expenses.
    ///
    /// Each expense credits its payer the full amount and debits every
    /// participant an equal share, accumulated at full decimal precision.
    /// The result covers every member, zero balances included, and does not
    /// depend on expense order.
    pub fn compute(&self, snapshot: &LedgerSnapshot) -> Result<MemberBalances, BalanceError> {
        let mut balances: MemberBalances = snapshot
            .member_ids()
            .map(|member| (member, Money::ZERO))
            .collect();

        for expense in snapshot.expenses() {
            let share = Money::from_decimal(
                expense.amount.as_decimal() / Decimal::from(expense.participant_ids.len() as u64),
            );

            match balances.get_mut(&expense.payer_id) {
                Some(balance) => *balance += expense.amount,
                None => {
                    return Err(BalanceError::UnresolvedPayer {
                        expense: expense.id,
                        member: expense.payer_id,
                    })
                }
            }

            for &participant in &expense.participant_ids {
                match balances.get_mut(&participant) {
                    Some(balance) => *balance -= share,
                    None => {
                        return Err(BalanceError::UnresolvedParticipant {
                            expense: expense.id,
                            member: participant,
                        })
                    }
                }
            }
        }

        Ok(balances)
    }
}

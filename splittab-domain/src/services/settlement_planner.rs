use crate::model::{MemberBalances, MemberId, Money, Transfer};

/// Greedy debtor/creditor matching service.
///
/// Largest-first matching yields a valid plan but not a provably minimal
/// one; true transaction-count minimization is NP-hard and out of scope.
pub struct SettlementPlanner;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanError {
    /// The balance total exceeds the settled tolerance. A plan built from
    /// such input would look plausible and be wrong, so the planner refuses.
    ImbalancedTotal(Money),
}

impl SettlementPlanner {
    /// Emits the ordered transfer list that clears the given balances.
    ///
    /// Each round matches the debtor of largest absolute debt with the
    /// creditor of largest credit, ties broken by ascending member id, so
    /// identical input always yields an identical list. Members within
    /// epsilon of zero are already settled and never appear.
    pub fn plan(&self, balances: &MemberBalances) -> Result<Vec<Transfer>, PlanError> {
        let epsilon = Money::epsilon();

        let total: Money = balances.values().sum();
        if total.abs() > epsilon {
            tracing::error!(
                reject_reason = "input_imbalance",
                member_count = balances.len(),
                total = %total,
                "settlement planning rejected: balances do not sum to zero"
            );
            return Err(PlanError::ImbalancedTotal(total));
        }

        // Both sides carry positive magnitudes.
        let mut debtors: Vec<(MemberId, Money)> = balances
            .iter()
            .filter(|(_, balance)| **balance < -epsilon)
            .map(|(&member, &balance)| (member, balance.abs()))
            .collect();
        let mut creditors: Vec<(MemberId, Money)> = balances
            .iter()
            .filter(|(_, balance)| **balance > epsilon)
            .map(|(&member, &balance)| (member, balance))
            .collect();

        let mut transfers = Vec::new();
        while !debtors.is_empty() && !creditors.is_empty() {
            let debtor_idx = largest(&debtors);
            let creditor_idx = largest(&creditors);

            let amount = debtors[debtor_idx]
                .1
                .min(creditors[creditor_idx].1)
                .round_display();
            transfers.push(Transfer {
                from: debtors[debtor_idx].0,
                to: creditors[creditor_idx].0,
                amount,
            });

            debtors[debtor_idx].1 -= amount;
            creditors[creditor_idx].1 -= amount;
            if debtors[debtor_idx].1 <= epsilon {
                debtors.swap_remove(debtor_idx);
            }
            if creditors[creditor_idx].1 <= epsilon {
                creditors.swap_remove(creditor_idx);
            }
        }

        Ok(transfers)
    }
}

/// Index of the entry with the largest amount, smallest member id on ties.
fn largest(entries: &[(MemberId, Money)]) -> usize {
    let mut best = 0;
    for (idx, entry) in entries.iter().enumerate().skip(1) {
        let (best_member, best_amount) = entries[best];
        if entry.1 > best_amount || (entry.1 == best_amount && entry.0 < best_member) {
            best = idx;
        }
    }
    best
}

use proptest::prelude::*;
use splittab_domain::{
    BalanceCalculator, Expense, ExpenseId, LedgerSnapshot, Member, MemberBalances, MemberId, Money,
    SettlementPlanner,
};

/// Builds a snapshot whose expense amounts are whole-cent multiples of the
/// participant count, so every share is an exact cent value.
fn build_snapshot(
    member_count: usize,
    expense_count: usize,
    share_cents: &[i64],
    payer_indexes: &[usize],
    participant_masks: &[usize],
) -> LedgerSnapshot {
    let members = (1..=member_count as u64)
        .map(|id| Member {
            id: MemberId(id),
            display_name: format!("member-{id}"),
        })
        .collect();

    let mut expenses = Vec::with_capacity(expense_count);
    for idx in 0..expense_count {
        let share = *share_cents.get(idx).unwrap_or(&1);
        let payer_idx = payer_indexes.get(idx).copied().unwrap_or(0) % member_count;
        let mask = participant_masks.get(idx).copied().unwrap_or(1);

        let mut participants: Vec<MemberId> = (0..member_count)
            .filter(|bit| mask & (1 << bit) != 0)
            .map(|bit| MemberId(bit as u64 + 1))
            .collect();
        if participants.is_empty() {
            participants.push(MemberId(1));
        }

        expenses.push(Expense {
            id: ExpenseId(idx as u64 + 1),
            description: format!("expense-{idx}"),
            amount: Money::new(share * participants.len() as i64, 2),
            payer_id: MemberId(payer_idx as u64 + 1),
            participant_ids: participants,
        });
    }

    LedgerSnapshot::try_new(members, expenses).expect("snapshot build failed")
}

proptest! {
    #[test]
    fn balances_sum_to_zero_and_cover_every_member(
        member_count in 1usize..=6,
        expense_count in 0usize..=30,
        share_cents in prop::collection::vec(1i64..=10_000, 0..=30),
        payer_indexes in prop::collection::vec(0usize..=5, 0..=30),
        participant_masks in prop::collection::vec(1usize..=63, 0..=30),
    ) {
        let snapshot = build_snapshot(
            member_count,
            expense_count,
            &share_cents,
            &payer_indexes,
            &participant_masks,
        );
        let balances = BalanceCalculator.compute(&snapshot).expect("compute failed");

        prop_assert_eq!(balances.len(), member_count);
        let total: Money = balances.values().sum();
        prop_assert!(total.is_zero());
    }
}

proptest! {
    #[test]
    fn balances_are_expense_order_independent(
        member_count in 1usize..=6,
        expense_count in 0usize..=30,
        share_cents in prop::collection::vec(1i64..=10_000, 0..=30),
        payer_indexes in prop::collection::vec(0usize..=5, 0..=30),
        participant_masks in prop::collection::vec(1usize..=63, 0..=30),
    ) {
        let snapshot = build_snapshot(
            member_count,
            expense_count,
            &share_cents,
            &payer_indexes,
            &participant_masks,
        );
        let members = snapshot.members().to_vec();
        let mut reversed_expenses = snapshot.expenses().to_vec();
        reversed_expenses.reverse();
        let reversed = LedgerSnapshot::try_new(members, reversed_expenses)
            .expect("snapshot build failed");

        let forward = BalanceCalculator.compute(&snapshot).expect("compute failed");
        let backward = BalanceCalculator.compute(&reversed).expect("compute failed");
        prop_assert_eq!(forward, backward);
    }
}

proptest! {
    #[test]
    fn settlement_clears_all_members_and_is_deterministic(
        member_count in 1usize..=6,
        expense_count in 0usize..=30,
        share_cents in prop::collection::vec(1i64..=10_000, 0..=30),
        payer_indexes in prop::collection::vec(0usize..=5, 0..=30),
        participant_masks in prop::collection::vec(1usize..=63, 0..=30),
    ) {
        let snapshot = build_snapshot(
            member_count,
            expense_count,
            &share_cents,
            &payer_indexes,
            &participant_masks,
        );
        let balances = BalanceCalculator.compute(&snapshot).expect("compute failed");
        let transfers = SettlementPlanner.plan(&balances).expect("plan failed");

        // Replanning from a map built in a different insertion order must
        // yield the identical list.
        let mut entries: Vec<(MemberId, Money)> =
            balances.iter().map(|(&id, &balance)| (id, balance)).collect();
        entries.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        let reinserted: MemberBalances = entries.into_iter().collect();
        prop_assert_eq!(
            SettlementPlanner.plan(&reinserted).expect("plan failed"),
            transfers.clone()
        );

        let mut remaining = balances;
        for transfer in &transfers {
            prop_assert!(transfer.amount.is_positive());
            *remaining.get_mut(&transfer.from).expect("debtor missing") += transfer.amount;
            *remaining.get_mut(&transfer.to).expect("creditor missing") -= transfer.amount;
        }
        for (member, balance) in &remaining {
            prop_assert!(
                balance.abs() <= Money::epsilon(),
                "member {:?} left with {}",
                member,
                balance
            );
        }
    }
}

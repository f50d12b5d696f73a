use crate::{
    error::EngineError,
    model::{BalanceReport, MemberBalance},
    ports::SnapshotSource,
};
use splittab_domain::{model::GroupId, BalanceCalculator, SettlementPlanner};

/// Orchestrates one balance request: snapshot fetch, balance aggregation,
/// settlement planning, display rounding.
///
/// Stateless apart from the injected source; safe to share across callers
/// since every request works on its own snapshot.
#[derive(Clone, Copy)]
pub struct BalanceReporter<'a> {
    source: &'a dyn SnapshotSource,
}

impl<'a> BalanceReporter<'a> {
    pub fn new(source: &'a dyn SnapshotSource) -> Self {
        Self { source }
    }

    pub fn report(&self, group_id: GroupId) -> Result<BalanceReport, EngineError> {
        let snapshot = self.source.group_snapshot(group_id)?;
        tracing::debug!(
            group_id = group_id.0,
            member_count = snapshot.members().len(),
            expense_count = snapshot.expenses().len(),
            "computing balance report"
        );

        let balances = BalanceCalculator.compute(&snapshot)?;
        let transfers = SettlementPlanner.plan(&balances)?;

        let mut entries: Vec<MemberBalance> = balances
            .iter()
            .map(|(&id, &balance)| MemberBalance {
                id,
                balance: balance.round_display(),
            })
            .collect();
        entries.sort_unstable_by_key(|entry| entry.id);

        Ok(BalanceReport {
            balances: entries,
            transfers,
        })
    }
}

use fxhash::FxHashMap;
use splittab_domain::model::{GroupId, LedgerSnapshot, SnapshotError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotFetchError {
    GroupNotFound(GroupId),
    Corrupt(SnapshotError),
}

/// Read side of the ledger store: a consistent view of one group.
pub trait SnapshotSource: Send + Sync {
    fn group_snapshot(&self, group_id: GroupId) -> Result<LedgerSnapshot, SnapshotFetchError>;
}

impl SnapshotSource for FxHashMap<GroupId, LedgerSnapshot> {
    fn group_snapshot(&self, group_id: GroupId) -> Result<LedgerSnapshot, SnapshotFetchError> {
        self.get(&group_id)
            .cloned()
            .ok_or(SnapshotFetchError::GroupNotFound(group_id))
    }
}

/// Notified after a mutation makes a group's last report stale. The engine
/// keeps no cache, so listeners are expected to trigger a full recompute.
pub trait StaleListener: Send + Sync {
    fn balances_invalidated(&self, group_id: GroupId);
}

use std::sync::Arc;

use dashmap::DashMap;
use splittab_application::StaleListener;
use splittab_domain::model::GroupId;

/// Registry of stale-balance listeners, keyed by group.
///
/// Explicitly owned and injected wherever fan-out is needed; there is no
/// process-wide instance. Cloning shares the underlying registry.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    listeners: Arc<DashMap<GroupId, Vec<Arc<dyn StaleListener>>>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, group_id: GroupId, listener: Arc<dyn StaleListener>) {
        self.listeners.entry(group_id).or_default().push(listener);
    }

    /// Drops every listener for the group, returning how many were removed.
    pub fn unsubscribe_all(&self, group_id: GroupId) -> usize {
        self.listeners
            .remove(&group_id)
            .map_or(0, |(_, listeners)| listeners.len())
    }

    pub fn listener_count(&self, group_id: GroupId) -> usize {
        self.listeners
            .get(&group_id)
            .map_or(0, |listeners| listeners.len())
    }

    /// Tells every listener of the group that its balances are stale.
    pub fn notify(&self, group_id: GroupId) {
        // Clone out of the map entry so listeners run without the shard lock,
        // letting them subscribe or read the store from the callback.
        let Some(listeners) = self
            .listeners
            .get(&group_id)
            .map(|entry| entry.value().clone())
        else {
            return;
        };

        tracing::debug!(
            group_id = group_id.0,
            listener_count = listeners.len(),
            "broadcasting stale-balance notification"
        );
        for listener in &listeners {
            listener.balances_invalidated(group_id);
        }
    }
}

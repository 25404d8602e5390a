//! Change Notifier.
//!
//! Watches pagination, filters and sorting, and delivers one consolidated
//! [`TableChange`] per logical update. Selection and visibility are not
//! watched.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::state::{FilterSet, Pagination, SortState, TableState};

/// Event handed to the host whenever the watched state changes.
///
/// Server-mode hosts refetch on every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableChange {
    pub pagination: Pagination,
    pub filters: FilterSet,
    pub sorting: SortState,
}

impl TableChange {
    #[must_use]
    pub fn from_state(state: &TableState) -> Self {
        Self {
            pagination: state.pagination(),
            filters: state.filters().clone(),
            sorting: state.sorting().clone(),
        }
    }
}

pub type ChangeListener = Box<dyn FnMut(&TableChange)>;

#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<ChangeListener>,
    channels: Vec<UnboundedSender<TableChange>>,
    last: Option<TableChange>,
}

impl ChangeNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&TableChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Forwards events into a channel; closed channels are dropped on the
    /// next delivery.
    pub fn subscribe_channel(&mut self, sender: UnboundedSender<TableChange>) {
        self.channels.push(sender);
    }

    /// Delivers `change` unless it equals the last delivered event.
    ///
    /// Returns whether anything was delivered.
    pub fn commit(&mut self, change: TableChange) -> bool {
        if self.last.as_ref() == Some(&change) {
            return false;
        }

        for listener in &mut self.listeners {
            listener(&change);
        }
        self.channels
            .retain(|sender| sender.send(change.clone()).is_ok());

        self.last = Some(change);
        true
    }

    #[must_use]
    pub const fn last(&self) -> Option<&TableChange> {
        self.last.as_ref()
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .field("channels", &self.channels.len())
            .field("last", &self.last)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::state::SortDirection;

    #[test]
    fn test_identical_changes_are_delivered_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = ChangeNotifier::new();
        let sink = Rc::clone(&seen);
        notifier.subscribe(move |change| sink.borrow_mut().push(change.clone()));

        let state = TableState::default();
        assert!(notifier.commit(TableChange::from_state(&state)));
        assert!(!notifier.commit(TableChange::from_state(&state)));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_channel_subscribers_receive_events() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut notifier = ChangeNotifier::new();
        notifier.subscribe_channel(tx);

        let mut state = TableState::default();
        state.set_sorting(SortState::single("qps", SortDirection::Asc));
        notifier.commit(TableChange::from_state(&state));

        let change = rx.try_recv().expect("event delivered");
        assert_eq!(change.sorting.direction_of("qps"), Some(SortDirection::Asc));
    }

    #[test]
    fn test_dropped_receivers_are_pruned() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let mut notifier = ChangeNotifier::new();
        notifier.subscribe_channel(tx);
        drop(rx);

        notifier.commit(TableChange::from_state(&TableState::default()));
        assert_eq!(notifier.channels.len(), 0);
    }

    #[test]
    fn test_event_serializes_with_host_field_names() {
        let state = TableState::default();
        let json = serde_json::to_value(TableChange::from_state(&state))
            .expect("serializable");
        assert_eq!(
            json,
            serde_json::json!({
                "pagination": { "current": 1, "pageSize": 10 },
                "filters": [],
                "sorting": [],
            })
        );
    }
}

#![forbid(unsafe_code)]

//! Work deferred to the host's next idle tick.
//!
//! Nothing here runs on its own. The host drains the queue when its message
//! loop goes idle and performs each action. Scheduling the same action twice
//! before a drain runs it once.

use dockweave_core::Side;

use crate::context::PaneId;

/// An action the host performs once layout has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeferredAction {
    /// Move keyboard focus into a pane that just became visible.
    FocusPane(PaneId),
    /// Re-clip the tab strip of panes collapsed toward `side`.
    RecomputeClippedTabs(Side),
}

/// Ordered, coalescing queue of [`DeferredAction`]s.
#[derive(Debug, Clone, Default)]
pub struct IdleQueue {
    pending: Vec<DeferredAction>,
}

impl IdleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` unless an identical one is already waiting.
    ///
    /// Returns `true` when the action was newly queued.
    pub fn schedule(&mut self, action: DeferredAction) -> bool {
        if self.pending.contains(&action) {
            return false;
        }
        self.pending.push(action);
        true
    }

    /// Drop a queued action, e.g. a focus request for a removed pane.
    pub fn cancel(&mut self, action: &DeferredAction) -> bool {
        let before = self.pending.len();
        self.pending.retain(|queued| queued != action);
        self.pending.len() != before
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every queued action in schedule order, keeping only those `keep`
    /// still accepts.
    pub fn drain_where(&mut self, mut keep: impl FnMut(&DeferredAction) -> bool) -> Vec<DeferredAction> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .filter(|action| keep(action))
            .collect()
    }

    pub fn drain(&mut self) -> Vec<DeferredAction> {
        self.drain_where(|_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_coalesce() {
        let mut queue = IdleQueue::new();
        assert!(queue.schedule(DeferredAction::FocusPane(PaneId::new(1))));
        assert!(queue.schedule(DeferredAction::RecomputeClippedTabs(Side::Left)));
        assert!(!queue.schedule(DeferredAction::FocusPane(PaneId::new(1))));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut queue = IdleQueue::new();
        queue.schedule(DeferredAction::RecomputeClippedTabs(Side::Bottom));
        queue.schedule(DeferredAction::FocusPane(PaneId::new(4)));
        assert_eq!(
            queue.drain(),
            vec![
                DeferredAction::RecomputeClippedTabs(Side::Bottom),
                DeferredAction::FocusPane(PaneId::new(4)),
            ]
        );
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn filtered_drain_discards_rejected() {
        let mut queue = IdleQueue::new();
        queue.schedule(DeferredAction::FocusPane(PaneId::new(1)));
        queue.schedule(DeferredAction::FocusPane(PaneId::new(2)));
        let kept = queue.drain_where(|a| *a != DeferredAction::FocusPane(PaneId::new(1)));
        assert_eq!(kept, vec![DeferredAction::FocusPane(PaneId::new(2))]);
        assert!(queue.is_empty());
    }

    #[test]
    fn cancel_removes_queued_action() {
        let mut queue = IdleQueue::new();
        let focus = DeferredAction::FocusPane(PaneId::new(3));
        queue.schedule(focus);
        assert!(queue.cancel(&focus));
        assert!(!queue.cancel(&focus));
        assert!(queue.is_empty());
    }
}

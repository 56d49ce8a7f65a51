#![forbid(unsafe_code)]

//! Read-only pane lists derived from a panel.
//!
//! A [`FilteredView`] mirrors the panes of a [`DockingPanel`] that pass its
//! [`ViewFilter`]. The host re-syncs it after changing the panel. The view
//! owns no panes, so inserting into or removing from it directly is refused.

use dockweave_core::Side;

use crate::context::{LayoutContext, PaneId};
use crate::error::DockError;
use crate::panel::DockingPanel;

/// Which panes a [`FilteredView`] keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewFilter {
    /// Panes taking part in layout.
    Visible,
    /// Every collapsed pane.
    Collapsed,
    /// Panes whose tab strip collapsed toward this side.
    CollapsedToward(Side),
}

impl ViewFilter {
    pub fn accepts(self, ctx: &LayoutContext) -> bool {
        match self {
            ViewFilter::Visible => !ctx.is_collapsed(),
            ViewFilter::Collapsed => ctx.is_collapsed(),
            ViewFilter::CollapsedToward(side) => ctx.is_collapsed() && ctx.props().collapse_side() == side,
        }
    }
}

/// Panes of a panel matching a filter, in panel order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredView {
    filter: ViewFilter,
    items: Vec<PaneId>,
}

impl FilteredView {
    pub fn new(filter: ViewFilter) -> Self {
        Self {
            filter,
            items: Vec::new(),
        }
    }

    #[inline]
    pub fn filter(&self) -> ViewFilter {
        self.filter
    }

    /// Rebuild from `panel`. Returns whether the contents changed.
    pub fn sync(&mut self, panel: &DockingPanel) -> bool {
        let filter = self.filter;
        let items: Vec<PaneId> = panel
            .panes()
            .filter(|ctx| filter.accepts(ctx))
            .map(LayoutContext::id)
            .collect();
        if items == self.items {
            return false;
        }
        self.items = items;
        true
    }

    #[inline]
    pub fn items(&self) -> &[PaneId] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, pane: PaneId) -> bool {
        self.items.contains(&pane)
    }

    /// Always refused: add the pane to the panel and re-sync instead.
    pub fn try_insert(&mut self, _pane: PaneId) -> Result<(), DockError> {
        Err(DockError::Unsupported { operation: "insert" })
    }

    /// Always refused: remove the pane from the panel and re-sync instead.
    pub fn try_remove(&mut self, _pane: PaneId) -> Result<(), DockError> {
        Err(DockError::Unsupported { operation: "remove" })
    }
}

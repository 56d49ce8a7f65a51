#![forbid(unsafe_code)]

//! A root panel plus the floating panels torn off from it.

use dockweave_core::{Point, Rect, Side};
use tracing::debug;

use crate::config::DockConfig;
use crate::context::PaneId;
use crate::error::DockError;
use crate::panel::DockingPanel;
use crate::persist::{ContentFactory, DockSnapshot};

/// A panel shown in its own window.
#[derive(Debug, Clone)]
pub struct FloatingDock {
    /// Window rectangle in screen coordinates.
    pub position: Rect,
    pub panel: DockingPanel,
}

/// Every panel belonging to one host window.
#[derive(Debug, Clone, Default)]
pub struct DockSite {
    root: DockingPanel,
    origin: Point,
    floating: Vec<FloatingDock>,
}

impl DockSite {
    pub fn new(config: DockConfig) -> Self {
        Self {
            root: DockingPanel::with_config(config),
            ..Self::default()
        }
    }

    #[inline]
    pub fn root(&self) -> &DockingPanel {
        &self.root
    }

    #[inline]
    pub fn root_mut(&mut self) -> &mut DockingPanel {
        &mut self.root
    }

    /// Screen position of the root panel.
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    #[inline]
    pub fn floating(&self) -> &[FloatingDock] {
        &self.floating
    }

    pub fn floating_mut(&mut self, index: usize) -> Result<&mut FloatingDock, DockError> {
        self.floating
            .get_mut(index)
            .ok_or(DockError::UnknownFloatingDock { index })
    }

    /// Move a root pane into a new floating dock at `position`.
    ///
    /// Returns the floating dock's index and the pane's id inside it.
    pub fn float_pane(&mut self, pane: PaneId, position: Rect) -> Result<(usize, PaneId), DockError> {
        let ctx = self.root.remove_pane(pane)?;
        let mut props = ctx.props().clone();
        props.dock_position = None;

        let mut panel = DockingPanel::with_config(self.root.config().clone());
        let floated = panel.add_pane(props);
        panel.arrange(position.size());
        self.floating.push(FloatingDock { position, panel });
        let index = self.floating.len() - 1;
        debug!(%pane, %floated, index, "pane floated");
        Ok((index, floated))
    }

    /// Move a pane out of floating dock `index` and dock it to `side` of the
    /// root panel. A floating dock left empty is closed.
    ///
    /// Indices of later floating docks shift down when one closes.
    pub fn dock_pane(&mut self, index: usize, pane: PaneId, side: Side) -> Result<PaneId, DockError> {
        let floating = self.floating_mut(index)?;
        let ctx = floating.panel.remove_pane(pane)?;
        if floating.panel.is_empty() {
            self.floating.remove(index);
        }

        let mut props = ctx.props().clone();
        props.dock_position = Some(side);
        let docked = self.root.add_pane(props);
        if !self.root.is_linked(docked) {
            self.root.insert_at_edge(docked, side)?;
        }
        debug!(%pane, %docked, %side, "floating pane docked");
        Ok(docked)
    }

    /// Capture the root panel and every floating dock.
    pub fn snapshot(&self) -> DockSnapshot {
        let mut snapshot = DockSnapshot::capture(&self.root, self.origin);
        snapshot.floating = self
            .floating
            .iter()
            .map(|dock| {
                let mut child = DockSnapshot::capture(&dock.panel, Point::new(dock.position.x, dock.position.y));
                child.dock_size = dock.position.size();
                child
            })
            .collect();
        snapshot
    }

    /// Rebuild a site from `snapshot`, floating docks included.
    pub fn restore<F: ContentFactory + ?Sized>(
        snapshot: &DockSnapshot,
        config: DockConfig,
        factory: &mut F,
    ) -> Result<Self, DockError> {
        let mut site = Self::new(config);
        site.origin = snapshot.position;
        snapshot.restore_into(&mut site.root, factory)?;
        for child in &snapshot.floating {
            let mut panel = DockingPanel::with_config(site.root.config().clone());
            child.restore_into(&mut panel, factory)?;
            let position = Rect::new(child.position.x, child.position.y, child.dock_size.width, child.dock_size.height);
            site.floating.push(FloatingDock { position, panel });
        }
        debug!(floating = site.floating.len(), "site restored");
        Ok(site)
    }
}

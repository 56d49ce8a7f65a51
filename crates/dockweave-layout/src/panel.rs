#![forbid(unsafe_code)]

//! The docking panel: owner of one layout graph and driver of layout passes.
//!
//! A layout pass has two phases, mirroring a retained-mode UI toolkit:
//!
//! 1. [`measure`](DockingPanel::measure) asks the host for each pane's
//!    natural size. If any pane lacks a complete position from an earlier
//!    pass, a provisional arrange seeds one and the panes are measured again
//!    against their seeded sizes.
//! 2. [`arrange`](DockingPanel::arrange) docks any pane that was never
//!    linked into the graph, rebuilds silos if the graph changed, runs the
//!    [`AutoPositioner`] over every horizontal silo and then every vertical
//!    one, and finally stores each pane's rectangle.
//!
//! Panes that must always fit are protected by an effective minimum: on
//! each axis the configured floor is lowered to `extent / depth`, where
//! `depth` is the longest chain of logical neighbors across that axis.
//!
//! # Invalidation
//!
//! [`invalidate_positioning`](DockingPanel::invalidate_positioning) takes a
//! [`PositionClasses`] mask. Callers should pass the narrowest mask that
//! covers the change: `EVERY_COLLECTION` touches every pane and `COLLAPSE`
//! recomputes all logical adjacency.

use dockweave_core::{Axis, Point, Rect, Side, Size};
use rustc_hash::FxHashMap;
use tracing::{debug, debug_span, trace, warn};

use crate::config::DockConfig;
use crate::context::{LayoutContext, PaneId, PaneProps, PaneState, PositionClasses};
use crate::error::DockError;
use crate::graph::LayoutGraph;
use crate::idle::{DeferredAction, IdleQueue};
use crate::positioner::{AutoPositioner, HorizontalClient, PositionerClient, VerticalClient};
use crate::silo::Silo;
use crate::validate::validate_arrangement;

/// Host callback reporting a pane's natural size.
pub trait MeasurePane {
    /// Size `pane` would like when offered `available`.
    fn measure(&mut self, pane: PaneId, available: Size) -> Size;
}

impl<F> MeasurePane for F
where
    F: FnMut(PaneId, Size) -> Size,
{
    fn measure(&mut self, pane: PaneId, available: Size) -> Size {
        self(pane, available)
    }
}

/// Derived data valid for one graph generation.
#[derive(Debug, Clone, Default)]
struct LayoutCache {
    generation: u64,
    horizontal: Option<Vec<Silo>>,
    vertical: Option<Vec<Silo>>,
    horizontal_depth: Option<usize>,
    vertical_depth: Option<usize>,
}

impl LayoutCache {
    fn silos(&self, axis: Axis) -> Option<&[Silo]> {
        match axis {
            Axis::Horizontal => self.horizontal.as_deref(),
            Axis::Vertical => self.vertical.as_deref(),
        }
    }

    fn silos_mut(&mut self, axis: Axis) -> &mut Option<Vec<Silo>> {
        match axis {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        }
    }

    fn depth_mut(&mut self, axis: Axis) -> &mut Option<usize> {
        match axis {
            Axis::Horizontal => &mut self.horizontal_depth,
            Axis::Vertical => &mut self.vertical_depth,
        }
    }
}

/// A set of docked panes laid out inside one rectangular area.
#[derive(Debug, Clone, Default)]
pub struct DockingPanel {
    graph: LayoutGraph,
    config: DockConfig,
    cache: LayoutCache,
    idle: IdleQueue,
    arranged_size: Size,
    layout_dirty: bool,
    /// Area a restored layout was saved at, checked on the next arrange.
    restored_size: Option<Size>,
}

impl DockingPanel {
    pub fn new() -> Self {
        Self::with_config(DockConfig::default())
    }

    pub fn with_config(config: DockConfig) -> Self {
        Self {
            config,
            layout_dirty: true,
            ..Self::default()
        }
    }

    #[inline]
    pub fn config(&self) -> &DockConfig {
        &self.config
    }

    #[inline]
    pub fn graph(&self) -> &LayoutGraph {
        &self.graph
    }

    pub(crate) fn graph_mut(&mut self) -> &mut LayoutGraph {
        &mut self.graph
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Live panes in the order they were added.
    #[inline]
    pub fn ids(&self) -> &[PaneId] {
        self.graph.ids()
    }

    pub fn pane(&self, id: PaneId) -> Option<&LayoutContext> {
        self.graph.get(id)
    }

    pub fn panes(&self) -> impl Iterator<Item = &LayoutContext> + '_ {
        self.graph.ids().iter().filter_map(|&id| self.graph.get(id))
    }

    /// Rectangle from the last finalized arrange. `None` while collapsed.
    pub fn rect(&self, id: PaneId) -> Option<Rect> {
        self.graph.get(id)?.arranged_rect()
    }

    /// Area passed to the last finalized arrange.
    #[inline]
    pub fn arranged_size(&self) -> Size {
        self.arranged_size
    }

    /// Something changed since the last finalized arrange.
    #[inline]
    pub fn needs_layout(&self) -> bool {
        self.layout_dirty
    }

    #[inline]
    pub fn idle_queue(&self) -> &IdleQueue {
        &self.idle
    }

    /// Linked into the physical graph on at least one side.
    pub fn is_linked(&self, id: PaneId) -> bool {
        self.graph
            .get(id)
            .is_some_and(|ctx| Side::ALL.iter().any(|&side| !ctx.edge(side).physical().is_empty()))
    }

    fn require(&self, id: PaneId) -> Result<(), DockError> {
        if self.graph.contains(id) {
            Ok(())
        } else {
            Err(DockError::UnknownPane { pane: id })
        }
    }

    pub(crate) fn invalidate_layout(&mut self) {
        self.layout_dirty = true;
    }

    /// Remember the area a restored layout was saved at. The next arrange
    /// re-positions every pane if it is given a different area.
    pub(crate) fn expect_restored_size(&mut self, saved: Size) {
        self.restored_size = Some(saved);
        self.layout_dirty = true;
    }

    // ------------------------------------------------------------------
    // Pane management
    // ------------------------------------------------------------------

    /// Create a layout context for a new pane.
    ///
    /// A pane with a dock position hint is docked immediately. Any other
    /// pane stays unlinked until it is inserted explicitly or the next
    /// arrange docks it at the configured default side.
    pub fn add_pane(&mut self, props: PaneProps) -> PaneId {
        let hinted = props.dock_position.is_some();
        let id = self.graph.add(props);
        if hinted {
            self.insert_by_dock_position(id, None);
        }
        self.invalidate_layout();
        debug!(pane = %id, panes = self.graph.len(), "pane added");
        id
    }

    /// Detach a pane and drop its layout context.
    pub fn remove_pane(&mut self, id: PaneId) -> Result<LayoutContext, DockError> {
        self.require(id)?;
        if self.is_linked(id) {
            self.graph.unlink(id);
        }
        self.idle.cancel(&DeferredAction::FocusPane(id));
        let ctx = self.graph.release(id).ok_or(DockError::UnknownPane { pane: id })?;
        self.invalidate_layout();
        debug!(pane = %id, panes = self.graph.len(), "pane removed");
        Ok(ctx)
    }

    /// Set or clear the host-declared extents of a pane.
    pub fn set_declared_size(&mut self, id: PaneId, width: Option<f64>, height: Option<f64>) -> Result<(), DockError> {
        self.require(id)?;
        let ctx = self.graph.ctx_mut(id);
        ctx.size.width.set_user_value(width);
        ctx.size.height.set_user_value(height);
        ctx.measure_dirty = true;
        self.invalidate_layout();
        Ok(())
    }

    pub fn set_stretch(&mut self, id: PaneId, horizontal: bool, vertical: bool) -> Result<(), DockError> {
        self.require(id)?;
        let props = &mut self.graph.ctx_mut(id).props;
        props.horizontal_stretch = horizontal;
        props.vertical_stretch = vertical;
        self.invalidate_layout();
        Ok(())
    }

    /// Change the lifecycle state of a pane.
    ///
    /// Crossing between collapsed and visible hands the pane's area to (or
    /// back from) its logical replacements, re-clips the tab strip on the
    /// collapse side, and on uncollapse queues a focus request.
    pub fn set_state(&mut self, id: PaneId, state: PaneState) -> Result<(), DockError> {
        self.require(id)?;
        let ctx = self.graph.ctx_mut(id);
        let was_collapsed = ctx.is_collapsed();
        ctx.props.state = state;
        if was_collapsed == state.is_collapsed() {
            return Ok(());
        }
        let side = ctx.props.collapse_side();

        self.graph.invalidate_positioning(id, PositionClasses::COLLAPSE);
        self.idle.schedule(DeferredAction::RecomputeClippedTabs(side));
        if !state.is_collapsed() {
            self.idle.schedule(DeferredAction::FocusPane(id));
        }
        self.invalidate_layout();
        debug!(pane = %id, collapsed = state.is_collapsed(), %side, "collapse state changed");
        Ok(())
    }

    /// Collapse a pane into a tab on `side`.
    pub fn collapse(&mut self, id: PaneId, side: Side) -> Result<(), DockError> {
        self.require(id)?;
        self.graph.ctx_mut(id).props.collapsed_side = Some(side);
        self.set_state(id, PaneState::UnPinnedAndCollapsed)
    }

    /// Pin a pane back into the layout.
    pub fn pin(&mut self, id: PaneId) -> Result<(), DockError> {
        self.set_state(id, PaneState::Pinned)
    }

    /// Actions queued for the host's idle tick.
    ///
    /// Focus requests for panes that have since collapsed or gone away are
    /// dropped.
    pub fn drain_idle(&mut self) -> Vec<DeferredAction> {
        let graph = &self.graph;
        self.idle.drain_where(|action| match *action {
            DeferredAction::FocusPane(id) => graph.get(id).is_some_and(|ctx| !ctx.is_collapsed()),
            DeferredAction::RecomputeClippedTabs(_) => true,
        })
    }

    /// Logical neighbors of a pane on `side`.
    pub fn logical_neighbors(&mut self, id: PaneId, side: Side) -> Result<Vec<PaneId>, DockError> {
        self.require(id)?;
        Ok(self.graph.logical_neighbors(id, side))
    }

    // ------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------

    /// Place `new` on `side` of `reference`.
    ///
    /// If `reference` already has a computed extent on the split axis, the
    /// new pane takes part of it: half, or its desired extent if that is
    /// smaller, never below the minimum.
    pub fn insert_relative(&mut self, new: PaneId, reference: PaneId, side: Side) -> Result<(), DockError> {
        self.require(new)?;
        self.require(reference)?;
        if new == reference {
            return Err(DockError::SelfReference { pane: new });
        }
        if self.is_linked(new) {
            self.graph.unlink(new);
        }
        self.graph.insert_relative(reference, new, side);
        self.share_reference_space(new, reference, side.axis());
        self.invalidate_layout();
        debug!(pane = %new, %reference, %side, "inserted relative");
        Ok(())
    }

    pub fn insert_above(&mut self, new: PaneId, reference: PaneId) -> Result<(), DockError> {
        self.insert_relative(new, reference, Side::Top)
    }

    pub fn insert_below(&mut self, new: PaneId, reference: PaneId) -> Result<(), DockError> {
        self.insert_relative(new, reference, Side::Bottom)
    }

    pub fn insert_to_left_of(&mut self, new: PaneId, reference: PaneId) -> Result<(), DockError> {
        self.insert_relative(new, reference, Side::Left)
    }

    pub fn insert_to_right_of(&mut self, new: PaneId, reference: PaneId) -> Result<(), DockError> {
        self.insert_relative(new, reference, Side::Right)
    }

    fn share_reference_space(&mut self, new: PaneId, reference: PaneId, axis: Axis) {
        let minimum = self.config.minimum_pane_size.along(axis);
        let cross = axis.cross();
        let reference_ctx = self.graph.ctx(reference);
        let Some(available) = reference_ctx.size.along(axis).internal_value() else {
            return;
        };
        let cross_origin = reference_ctx.origin(cross);
        let cross_extent = reference_ctx.size.along(cross).internal_value();

        let desired = self.graph.ctx(new).desired.along(axis);
        let half = available / 2.0;
        let extent = minimum.max(if desired < minimum { half } else { half.min(desired) });

        let new_ctx = self.graph.ctx_mut(new);
        match cross {
            Axis::Horizontal => new_ctx.left = cross_origin,
            Axis::Vertical => new_ctx.top = cross_origin,
        }
        new_ctx.size.along_mut(axis).set_internal_value(Some(extent));
        new_ctx.size.along_mut(cross).set_internal_value(cross_extent);

        let reference_ctx = self.graph.ctx_mut(reference);
        reference_ctx
            .size
            .along_mut(axis)
            .set_internal_value(Some(available - extent));
        reference_ctx.measure_dirty = true;
        trace!(pane = %new, %reference, ?axis, extent, "shared reference space");
    }

    /// Dock `new` along the whole panel border on `side`.
    ///
    /// Docking at Left or Right makes the pane stretch vertically, docking at
    /// Top or Bottom makes it stretch horizontally. A no-op while `new` is
    /// the only pane.
    pub fn insert_at_edge(&mut self, new: PaneId, side: Side) -> Result<(), DockError> {
        self.require(new)?;
        if self.is_linked(new) {
            self.graph.unlink(new);
        }
        self.dock_at_edge(new, side);
        self.invalidate_layout();
        Ok(())
    }

    fn dock_at_edge(&mut self, new: PaneId, side: Side) {
        let others = || self.graph.ids().iter().copied().filter(move |&p| p != new);
        let Some(anchor) = others().find(|&p| self.is_linked(p)).or_else(|| others().next()) else {
            return;
        };
        let props = &mut self.graph.ctx_mut(new).props;
        match side.axis() {
            Axis::Horizontal => props.vertical_stretch = true,
            Axis::Vertical => props.horizontal_stretch = true,
        }
        self.graph.insert_at_edge(new, anchor, side);
        debug!(pane = %new, %anchor, %side, "docked at panel edge");
    }

    /// Dock `id` at its position hint, else at `default`. Returns whether it
    /// was docked.
    fn insert_by_dock_position(&mut self, id: PaneId, default: Option<Side>) -> bool {
        if self.graph.len() < 2 {
            return false;
        }
        match self.graph.ctx(id).props.dock_position.or(default) {
            Some(side) => {
                self.dock_at_edge(id, side);
                true
            }
            None => false,
        }
    }

    /// Visible pane whose last arranged rectangle contains `point`.
    pub fn pane_at(&self, point: Point) -> Option<PaneId> {
        self.pane_at_excluding(point, None)
    }

    fn pane_at_excluding(&self, point: Point, excluded: Option<PaneId>) -> Option<PaneId> {
        self.panes()
            .filter(|ctx| Some(ctx.id()) != excluded && !ctx.is_collapsed())
            .find(|ctx| ctx.bounds().is_some_and(|bounds| bounds.contains(point)))
            .map(LayoutContext::id)
    }

    /// Dock `new` where a drag ended at `point`.
    ///
    /// Beyond the arranged width the pane docks at Right, beyond the height
    /// at Bottom. Over a pane, a drop near its vertical centre line splits it
    /// above or below, near its horizontal centre line left or right, and
    /// anywhere else below. A drop over no pane falls back to the dock
    /// position hint or the configured default side.
    pub fn insert_by_location(&mut self, new: PaneId, point: Point) -> Result<(), DockError> {
        self.require(new)?;
        if self.graph.len() < 2 {
            return Ok(());
        }
        let area = self.arranged_size;
        if point.x >= area.width {
            return self.insert_at_edge(new, Side::Right);
        }
        if point.y >= area.height {
            return self.insert_at_edge(new, Side::Bottom);
        }

        let Some(target) = self.pane_at_excluding(point, Some(new)) else {
            let side = self
                .graph
                .ctx(new)
                .props
                .dock_position
                .unwrap_or(self.config.default_dock_side);
            return self.insert_at_edge(new, side);
        };
        let Some(bounds) = self.graph.ctx(target).bounds() else {
            return self.insert_at_edge(new, self.config.default_dock_side);
        };

        let centre = bounds.center();
        let dx = point.x - centre.x;
        let dy = point.y - centre.y;
        let minimum = self.config.minimum_pane_size;
        let side = if dx.abs() < minimum.width / 2.0 {
            if dy < 0.0 { Side::Top } else { Side::Bottom }
        } else if dy.abs() < minimum.height / 2.0 {
            if dx < 0.0 { Side::Left } else { Side::Right }
        } else {
            Side::Bottom
        };
        self.insert_relative(new, target, side)
    }

    // ------------------------------------------------------------------
    // Invalidation
    // ------------------------------------------------------------------

    /// Reset positioning state named by `classes`.
    ///
    /// Only [`EVERY_COLLECTION`](PositionClasses::EVERY_COLLECTION) reaches
    /// the panes themselves; without it only the next pass is scheduled.
    pub fn invalidate_positioning(&mut self, classes: PositionClasses) {
        if classes.contains(PositionClasses::EVERY_COLLECTION) {
            for id in self.graph.ids().to_vec() {
                self.graph.invalidate_positioning(id, classes);
            }
        }
        self.invalidate_layout();
    }

    /// Reset positioning state of one pane.
    pub fn invalidate_pane(&mut self, id: PaneId, classes: PositionClasses) -> Result<(), DockError> {
        self.require(id)?;
        self.graph.invalidate_positioning(id, classes);
        self.invalidate_layout();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Silos and depth
    // ------------------------------------------------------------------

    fn refresh_cache(&mut self) {
        let generation = self.graph.generation();
        if self.cache.generation != generation {
            self.cache = LayoutCache {
                generation,
                ..LayoutCache::default()
            };
        }
    }

    /// Silos along `axis`, rebuilt if the graph changed.
    pub fn silos(&mut self, axis: Axis) -> &[Silo] {
        self.refresh_cache();
        if self.cache.silos(axis).is_none() {
            let built = match self.graph.ids().first() {
                Some(&start) => self.graph.build_silos(start, axis),
                None => Vec::new(),
            };
            trace!(?axis, silos = built.len(), "silos rebuilt");
            *self.cache.silos_mut(axis) = Some(built);
        }
        self.cache.silos(axis).unwrap_or(&[])
    }

    /// Longest chain of logical neighbors across `axis`.
    pub fn max_depth(&mut self, axis: Axis) -> usize {
        self.refresh_cache();
        if let Some(depth) = *self.cache.depth_mut(axis) {
            return depth;
        }
        let depth = self.compute_depth(axis);
        *self.cache.depth_mut(axis) = Some(depth);
        depth
    }

    fn compute_depth(&mut self, axis: Axis) -> usize {
        let Some(&start) = self.graph.ids().first() else {
            return 0;
        };
        let Some(origin) = self.graph.top_left_most_visible(start) else {
            return 0;
        };
        let seek = axis.seek();
        let mut memo = FxHashMap::default();
        let mut deepest = 0;
        for root in self.graph.interior_logical_edge(origin, seek.opposite()) {
            deepest = deepest.max(chain_depth(&mut self.graph, root, seek, &mut memo));
        }
        deepest
    }

    /// The configured minimum, lowered where `area` cannot fit it along the
    /// deepest chain.
    pub fn effective_minimum(&mut self, area: Size) -> Size {
        let configured = self.config.minimum_pane_size;
        let mut effective = [configured.width, configured.height];
        for (slot, axis) in effective.iter_mut().zip([Axis::Horizontal, Axis::Vertical]) {
            let depth = self.max_depth(axis);
            if depth > 0 {
                *slot = slot.min(area.along(axis) / depth as f64);
            }
        }
        Size::new(effective[0], effective[1])
    }

    // ------------------------------------------------------------------
    // Layout passes
    // ------------------------------------------------------------------

    /// Measure every pane within `available` and report the panel's size.
    pub fn measure<M: MeasurePane + ?Sized>(&mut self, available: Size, host: &mut M) -> Size {
        let span = debug_span!(
            "measure",
            panes = self.graph.len(),
            width = available.width,
            height = available.height
        );
        let _guard = span.enter();

        let minimum = self.config.minimum_pane_size;
        let ids = self.graph.ids().to_vec();
        let mut fresh = false;
        for &id in &ids {
            let ctx = self.graph.ctx_mut(id);
            let constraint = if ctx.is_fully_positioned(minimum) {
                ctx.size.internal_size().unwrap_or(available)
            } else {
                fresh = true;
                ctx.reset_position();
                available
            };
            self.measure_pane(host, id, constraint);
        }

        if fresh {
            let bounded = self.bounded(available);
            debug!(width = bounded.width, height = bounded.height, "provisional arrange");
            self.arrange_internal(bounded, false);
            for &id in &ids {
                let ctx = self.graph.ctx(id);
                let constraint = if ctx.is_collapsed() {
                    Size::ZERO
                } else {
                    ctx.size.internal_size().unwrap_or(bounded)
                };
                self.measure_pane(host, id, constraint);
            }
        }

        match ids.as_slice() {
            [] => Size::ZERO,
            [only] => self.graph.ctx(*only).desired,
            _ if available.is_finite() => available,
            _ => {
                let fallback = self.config.unbounded_measure_fallback;
                self.arrange_internal(fallback, false)
            }
        }
    }

    fn measure_pane<M: MeasurePane + ?Sized>(&mut self, host: &mut M, id: PaneId, constraint: Size) {
        let measured = host.measure(id, constraint);
        let ctx = self.graph.ctx_mut(id);
        ctx.desired = Size::new(
            ctx.size.width.measure_override().unwrap_or(measured.width),
            ctx.size.height.measure_override().unwrap_or(measured.height),
        );
        ctx.measure_dirty = false;
    }

    fn bounded(&self, available: Size) -> Size {
        let fallback = self.config.unbounded_measure_fallback;
        Size::new(
            if available.width.is_finite() { available.width } else { fallback.width },
            if available.height.is_finite() { available.height } else { fallback.height },
        )
    }

    /// Position every pane inside `final_size` and store the rectangles.
    ///
    /// Returns the bounding size of the visible panes, which exceeds
    /// `final_size` when minimum sizes overflow it.
    pub fn arrange(&mut self, final_size: Size) -> Size {
        let bounding = self.arrange_internal(final_size, true);
        self.layout_dirty = false;
        bounding
    }

    fn arrange_internal(&mut self, final_size: Size, finalize: bool) -> Size {
        if self.graph.is_empty() {
            return final_size;
        }
        let span = debug_span!(
            "arrange",
            panes = self.graph.len(),
            width = final_size.width,
            height = final_size.height,
            finalize
        );
        let _guard = span.enter();

        if let Some(saved) = self.restored_size.take() {
            let tolerance = self.config.round_off_tolerance;
            if (saved.width - final_size.width).abs() > tolerance
                || (saved.height - final_size.height).abs() > tolerance
            {
                debug!(saved_width = saved.width, saved_height = saved.height, "restored at a different size");
                self.invalidate_positioning(
                    PositionClasses::EVERY_COLLECTION | PositionClasses::ALL | PositionClasses::RESIZE,
                );
            }
        }

        let ids = self.graph.ids().to_vec();
        // With nothing linked yet the first pane is the root the rest dock to.
        let any_linked = ids.iter().any(|&p| self.is_linked(p));
        let root = ids.first().copied().filter(|_| !any_linked);
        let mut retried = false;
        loop {
            for &id in &ids {
                if ids.len() > 1 && Some(id) != root && !self.is_linked(id) {
                    let side = self
                        .graph
                        .ctx(id)
                        .props
                        .dock_position
                        .unwrap_or(self.config.default_dock_side);
                    self.dock_at_edge(id, side);
                }
                self.graph.ctx_mut(id).pre_arrange();
            }
            self.position_silos(final_size);

            if !self.config.validation_enabled() {
                break;
            }
            let problems = validate_arrangement(&mut self.graph, final_size, self.config.round_off_tolerance);
            if problems.is_empty() {
                break;
            }
            for problem in &problems {
                warn!(%problem, retried, "arrange validation failed");
            }
            if retried {
                break;
            }
            for &id in &ids {
                self.graph.ctx_mut(id).restore();
            }
            retried = true;
        }

        if finalize {
            self.finalize(final_size);
        }
        let bounding = self.bounding_size();
        debug!(width = bounding.width, height = bounding.height, "arrange complete");
        bounding
    }

    fn position_silos(&mut self, final_size: Size) {
        let minimum = self.effective_minimum(final_size);
        self.position_axis(&HorizontalClient, final_size.width, minimum.width);
        self.position_axis(&VerticalClient, final_size.height, minimum.height);
    }

    fn position_axis<C: PositionerClient>(&mut self, client: &C, total: f64, minimum: f64) {
        let silos = self.silos(client.axis()).to_vec();
        for silo in &silos {
            AutoPositioner::run(&mut self.graph, silo, total, minimum, client);
        }
    }

    fn finalize(&mut self, final_size: Size) {
        let minimum = self.config.minimum_pane_size;
        for id in self.graph.ids().to_vec() {
            if self.graph.is_collapsed(id) {
                self.graph.ctx_mut(id).arranged = None;
                continue;
            }
            for (axis, side) in [(Axis::Vertical, Side::Bottom), (Axis::Horizontal, Side::Right)] {
                let dimension = *self.graph.ctx(id).size.along(axis);
                if !dimension.is_fixed() {
                    continue;
                }
                match dimension.internal_value() {
                    Some(extent) if extent >= minimum.along(axis) => {
                        if dimension.has_user_value() {
                            self.graph
                                .ctx_mut(id)
                                .size
                                .along_mut(axis)
                                .set_user_value(Some(extent));
                        }
                    }
                    _ => self.release_splitter_context(id, side),
                }
            }
            let ctx = self.graph.ctx_mut(id);
            ctx.arranged = ctx.bounds();
            if ctx.props.state == PaneState::Loaded {
                ctx.props.state = PaneState::Pinned;
            }
        }
        self.arranged_size = final_size;
    }

    /// Drop the user pins around the splitter on `side` of `id`.
    fn release_splitter_context(&mut self, id: PaneId, side: Side) {
        let axis = side.axis();
        self.graph.ctx_mut(id).size.along_mut(axis).release();
        let mut peers = self.graph.interior_logical_edge(id, side);
        peers.extend(self.graph.exterior_logical_edge(id, side));
        for peer in peers {
            self.graph.ctx_mut(peer).size.along_mut(axis).clear_splitter();
        }
        debug!(pane = %id, %side, "released fixed extent below minimum");
    }

    fn bounding_size(&self) -> Size {
        let bounds = self
            .panes()
            .filter(|ctx| !ctx.is_collapsed())
            .filter_map(LayoutContext::bounds)
            .reduce(|acc, rect| acc.union(&rect));
        match bounds {
            Some(rect) => Size::new(rect.width.max(0.0), rect.height.max(0.0)),
            None => Size::ZERO,
        }
    }

    // ------------------------------------------------------------------
    // Splitters
    // ------------------------------------------------------------------

    /// Move the splitter on `side` of `id` by `delta`.
    ///
    /// Positive deltas move the splitter right or down. The panes before the
    /// splitter grow by `delta` and those after it shrink, each pinned by a
    /// splitter value. Returns `false` without changing anything when a
    /// visible pane would drop below the minimum.
    pub fn splitter_moved(&mut self, id: PaneId, side: Side, delta: f64) -> Result<bool, DockError> {
        self.require(id)?;
        if delta == 0.0 {
            return Ok(false);
        }
        let interior = self.graph.interior_logical_edge(id, side);
        let exterior = self.graph.exterior_logical_edge(id, side);
        let (before, after) = match side {
            Side::Bottom | Side::Right => (interior, exterior),
            Side::Top | Side::Left => (exterior, interior),
        };

        let axis = side.axis();
        let floor = self.config.minimum_pane_size.along(axis);
        let graph = &self.graph;
        let extent = |pane: PaneId| graph.ctx(pane).size.along(axis).internal_value().unwrap_or(0.0);
        let visible = |pane: &&PaneId| !graph.is_collapsed(**pane);

        if delta < 0.0 && before.iter().filter(visible).any(|&p| extent(p) + delta < floor) {
            return Ok(false);
        }
        if delta > 0.0 && after.iter().filter(visible).any(|&p| extent(p) - delta < floor) {
            return Ok(false);
        }

        let updates: Vec<(PaneId, f64)> = before
            .iter()
            .filter(visible)
            .map(|&p| (p, extent(p) + delta))
            .chain(after.iter().filter(visible).map(|&p| (p, extent(p) - delta)))
            .collect();
        for (pane, value) in updates {
            self.graph.ctx_mut(pane).size.along_mut(axis).set_splitter(value);
        }
        self.invalidate_layout();
        debug!(pane = %id, %side, delta, "splitter moved");
        Ok(true)
    }
}

fn chain_depth(graph: &mut LayoutGraph, id: PaneId, seek: Side, memo: &mut FxHashMap<PaneId, usize>) -> usize {
    if let Some(&depth) = memo.get(&id) {
        return depth;
    }
    let mut depth = 1;
    for next in graph.logical_neighbors(id, seek) {
        depth = depth.max(chain_depth(graph, next, seek, memo) + 1);
    }
    memo.insert(id, depth);
    depth
}

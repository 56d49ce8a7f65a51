#![forbid(unsafe_code)]

//! Arena of [`LayoutContext`]s and the physical adjacency graph.
//!
//! Panes reference each other only through [`PaneId`] handles stored in the
//! per-side neighbor lists of their [`PaneEdge`](crate::edge::PaneEdge)s. The
//! graph is planar: if `b` is in `a`'s list for side `s`, then `a` is in
//! `b`'s list for `s.opposite()`.
//!
//! Neighbor lists on Left and Right run top to bottom. Lists on Top and Bottom
//! run left to right. Every structural mutation invalidates the cached
//! physical and logical views of all panes and bumps the graph
//! [`generation`](LayoutGraph::generation).

use dockweave_core::Side;
use tracing::trace;

use crate::collapse;
use crate::context::{LayoutContext, PaneId, PaneProps, PositionClasses};

/// Owner of all layout contexts in one panel.
#[derive(Debug, Clone, Default)]
pub struct LayoutGraph {
    slots: Vec<Option<LayoutContext>>,
    order: Vec<PaneId>,
    last_cycle: u64,
    generation: u64,
}

impl LayoutGraph {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live panes in the order they were added.
    #[inline]
    pub fn ids(&self) -> &[PaneId] {
        &self.order
    }

    pub fn contains(&self, id: PaneId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: PaneId) -> Option<&LayoutContext> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: PaneId) -> Option<&mut LayoutContext> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Counter bumped by every invalidation of logical state.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn ctx(&self, id: PaneId) -> &LayoutContext {
        match self.get(id) {
            Some(ctx) => ctx,
            None => panic!("stale pane handle {id} in layout graph"),
        }
    }

    pub(crate) fn ctx_mut(&mut self, id: PaneId) -> &mut LayoutContext {
        match self.get_mut(id) {
            Some(ctx) => ctx,
            None => panic!("stale pane handle {id} in layout graph"),
        }
    }

    #[inline]
    pub(crate) fn is_collapsed(&self, id: PaneId) -> bool {
        self.ctx(id).is_collapsed()
    }

    /// Panes whose opposite edge touches `side` of `id`.
    pub fn physical_neighbors(&self, id: PaneId, side: Side) -> &[PaneId] {
        self.ctx(id).edge(side).physical()
    }

    fn first_physical(&self, id: PaneId, side: Side) -> Option<PaneId> {
        self.physical_neighbors(id, side).first().copied()
    }

    pub(crate) fn add(&mut self, props: PaneProps) -> PaneId {
        let raw = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        let id = PaneId::new(raw);
        self.slots.push(Some(LayoutContext::new(id, props)));
        self.order.push(id);
        trace!(pane = %id, "layout context created");
        id
    }

    /// Drop the arena slot of a pane that has already been unlinked.
    pub(crate) fn release(&mut self, id: PaneId) -> Option<LayoutContext> {
        let ctx = self.slots.get_mut(id.index())?.take()?;
        self.order.retain(|&p| p != id);
        self.invalidate_physical();
        Some(ctx)
    }

    /// Fresh stamp for silo disjointness tests.
    pub(crate) fn next_cycle(&mut self) -> u64 {
        self.last_cycle += 1;
        self.last_cycle
    }

    // ------------------------------------------------------------------
    // Corner walks
    // ------------------------------------------------------------------

    /// Follow first neighbors on `primary`, falling back to `secondary`,
    /// until neither has one.
    fn corner(&self, mut id: PaneId, primary: Side, secondary: Side) -> PaneId {
        while let Some(next) = self
            .first_physical(id, primary)
            .or_else(|| self.first_physical(id, secondary))
        {
            id = next;
        }
        id
    }

    pub(crate) fn top_left_most(&self, id: PaneId) -> PaneId {
        self.corner(id, Side::Top, Side::Left)
    }

    pub(crate) fn bottom_left_most(&self, id: PaneId) -> PaneId {
        self.corner(id, Side::Bottom, Side::Left)
    }

    pub(crate) fn top_right_most(&self, id: PaneId) -> PaneId {
        self.corner(id, Side::Top, Side::Right)
    }

    /// First neighbor on `along` that has nothing on its `outer` side. Used to
    /// walk a panel border.
    pub(crate) fn next_border_peer(&self, id: PaneId, along: Side, outer: Side) -> Option<PaneId> {
        self.physical_neighbors(id, along)
            .iter()
            .copied()
            .find(|&peer| self.physical_neighbors(peer, outer).is_empty())
    }

    /// Walk the panel border on `side`, starting from the appropriate corner.
    pub(crate) fn border(&self, any: PaneId, side: Side) -> Vec<PaneId> {
        let (start, along) = match side {
            Side::Bottom => (self.bottom_left_most(any), Side::Right),
            Side::Top => (self.top_left_most(any), Side::Right),
            Side::Left => (self.top_left_most(any), Side::Bottom),
            Side::Right => (self.top_right_most(any), Side::Bottom),
        };
        let mut walk = vec![start];
        let mut current = start;
        while let Some(next) = self.next_border_peer(current, along, side) {
            if walk.contains(&next) {
                break;
            }
            walk.push(next);
            current = next;
        }
        walk
    }

    /// The top-left pane, or its first replacement when it is collapsed.
    ///
    /// Falls back to the first visible pane when nothing replaces the corner.
    /// `None` only when every pane is collapsed.
    pub(crate) fn top_left_most_visible(&mut self, any: PaneId) -> Option<PaneId> {
        let corner = self.top_left_most(any);
        if !self.is_collapsed(corner) {
            return Some(corner);
        }
        let right = self
            .logical_replacements(corner, Side::Right)
            .and_then(|r| r.first().copied());
        right
            .or_else(|| {
                self.logical_replacements(corner, Side::Bottom)
                    .and_then(|r| r.first().copied())
            })
            .or_else(|| self.order.iter().copied().find(|&p| !self.is_collapsed(p)))
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Splice `new` next to `reference` on `side`.
    ///
    /// `new` takes over `reference`'s neighbors on `side` and shares its
    /// neighbors on the two orthogonal sides. A single link joins the two on
    /// the facing sides.
    ///
    /// Sharing the orthogonal lists assumes `reference`'s sides line up with
    /// the edges of its orthogonal neighbors, as in a layout built by
    /// repeated splits. When one of those sides ends at a T-junction partway
    /// along a neighbor, `new` is linked to panes it may not touch.
    pub(crate) fn insert_relative(&mut self, reference: PaneId, new: PaneId, side: Side) {
        let facing = side.opposite();
        let before = !side.is_far();

        let taken = std::mem::take(self.ctx_mut(reference).edge_mut(side).physical_mut());
        for &peer in &taken {
            self.ctx_mut(peer)
                .edge_mut(facing)
                .replace(reference, new);
        }
        self.ctx_mut(new).edge_mut(side).physical_mut().extend(taken);

        for orthogonal in [side.clockwise(), side.counter_clockwise()] {
            let shared = self.physical_neighbors(reference, orthogonal).to_vec();
            for &peer in &shared {
                self.ctx_mut(peer)
                    .edge_mut(orthogonal.opposite())
                    .insert_next_to(reference, new, before);
                self.ctx_mut(new).edge_mut(orthogonal).push_unique(peer);
            }
        }

        self.ctx_mut(new).edge_mut(facing).push_unique(reference);
        self.ctx_mut(reference).edge_mut(side).push_unique(new);
        trace!(pane = %new, reference = %reference, %side, "inserted relative");
        self.invalidate_physical();
    }

    /// Attach `new` along the whole panel border on `side`.
    pub(crate) fn insert_at_edge(&mut self, new: PaneId, any: PaneId, side: Side) {
        for peer in self.border(any, side) {
            if peer == new {
                continue;
            }
            self.ctx_mut(new).edge_mut(side.opposite()).push_unique(peer);
            self.ctx_mut(peer).edge_mut(side).push_unique(new);
        }
        trace!(pane = %new, %side, "inserted at panel edge");
        self.invalidate_physical();
    }

    /// Append `peer` to `id`'s neighbors on `side`. One direction only.
    pub(crate) fn link(&mut self, id: PaneId, side: Side, peer: PaneId) {
        self.ctx_mut(id).edge_mut(side).push_unique(peer);
    }

    fn is_isomorph_with(&mut self, id: PaneId, side: Side) -> bool {
        let line = self.exterior_physical_edge(id, side);
        let (Some(&first), Some(&last)) = (line.first(), line.last()) else {
            return false;
        };
        let back = side.opposite();
        self.exterior_physical_edge(first, back).first() == Some(&id)
            && self.exterior_physical_edge(last, back).last() == Some(&id)
    }

    /// Bridge the neighbors on `near` and `far` of `id` so they touch once
    /// `id` is gone.
    fn bridge(&mut self, id: PaneId, near: Side, far: Side) {
        let near_peers = self.physical_neighbors(id, near).to_vec();
        let far_peers = self.physical_neighbors(id, far).to_vec();
        for &far_peer in &far_peers {
            for &near_peer in &near_peers {
                self.ctx_mut(far_peer)
                    .edge_mut(near)
                    .insert_next_to(id, near_peer, true);
                self.ctx_mut(near_peer)
                    .edge_mut(far)
                    .insert_next_to(id, far_peer, true);
            }
        }
    }

    /// Detach `id` from the graph.
    ///
    /// The vacated space is announced like a collapse first. When the pane
    /// spans exactly one splitter line on an axis, its neighbors across that
    /// axis are joined directly.
    pub(crate) fn unlink(&mut self, id: PaneId) {
        self.invalidate_positioning(id, PositionClasses::COLLAPSE);

        if self.is_isomorph_with(id, Side::Left) || self.is_isomorph_with(id, Side::Right) {
            self.bridge(id, Side::Left, Side::Right);
        } else if self.is_isomorph_with(id, Side::Bottom) || self.is_isomorph_with(id, Side::Top) {
            self.bridge(id, Side::Top, Side::Bottom);
        }

        for side in Side::ALL {
            let peers = std::mem::take(self.ctx_mut(id).edge_mut(side).physical_mut());
            for peer in peers {
                self.ctx_mut(peer).edge_mut(side.opposite()).remove(id);
            }
        }
        trace!(pane = %id, "unlinked");
        self.invalidate_physical();
    }

    // ------------------------------------------------------------------
    // Invalidation
    // ------------------------------------------------------------------

    pub(crate) fn invalidate_physical(&mut self) {
        for ctx in self.slots.iter_mut().flatten() {
            for edge in &mut ctx.edges {
                edge.invalidate_physical();
            }
        }
        self.generation += 1;
    }

    pub(crate) fn invalidate_logical(&mut self) {
        for ctx in self.slots.iter_mut().flatten() {
            for edge in &mut ctx.edges {
                edge.invalidate_logical();
            }
        }
        self.generation += 1;
    }

    /// Reset the parts of `id` named by `classes`.
    ///
    /// [`COLLAPSE`](PositionClasses::COLLAPSE) also invalidates all logical
    /// state and hands the vacated space to whichever neighbors own it.
    pub(crate) fn invalidate_positioning(&mut self, id: PaneId, classes: PositionClasses) {
        let ctx = self.ctx_mut(id);
        if classes.contains(PositionClasses::HORIZONTAL | PositionClasses::RESIZE)
            && ctx.props.horizontal_stretch
        {
            ctx.size.width.reset();
        }
        if classes.contains(PositionClasses::VERTICAL | PositionClasses::RESIZE)
            && ctx.props.vertical_stretch
        {
            ctx.size.height.reset();
        }
        if classes.contains(PositionClasses::INTERNAL) {
            ctx.measure_dirty = true;
        }
        if classes.contains(PositionClasses::COLLAPSE) {
            self.invalidate_logical();
            for side in [Side::Right, Side::Left, Side::Top, Side::Bottom] {
                collapse::invalidate_neighbors(self, id, side);
            }
        }
    }
}

#![forbid(unsafe_code)]

//! Single-axis space distribution over a [`Silo`].
//!
//! The positioner walks a silo along its seek direction and interleaves two
//! policies. Fixed panes get their desired extent, clamped so that the panes
//! still waiting further along keep at least the minimum each. Runs of
//! stretchable panes share whatever is left evenly, after reserving the
//! space already claimed by fixed panes deeper in the silo.
//!
//! ```text
//! Starting -> TestingElementType -+-> FirstFixedElement ---------+
//!                ^                |                              |
//!                |                +-> FirstVaryingElement        |
//!                |                      -> ScanningVarying (loop)|
//!                |                      -> EndVaryingRun --------+
//!                |                                               v
//!                +-------------------------------------- ResetAtEnd -> Finished
//! ```
//!
//! Axis-specific questions are answered by a [`PositionerClient`]. The
//! provided methods derive everything from [`PositionerClient::axis`], so the
//! two clients differ only in the axis they report.

use dockweave_core::{Axis, Side};
use tracing::{debug_span, trace};

use crate::context::PaneId;
use crate::graph::LayoutGraph;
use crate::silo::Silo;

/// Leftover space below this is treated as fully consumed.
pub const ROUND_OFF_TOLERANCE: f64 = 0.1;

/// Axis-specific queries driving the [`AutoPositioner`].
pub trait PositionerClient {
    /// The axis this client positions along.
    fn axis(&self) -> Axis;

    /// Side the walk moves toward.
    fn seek(&self) -> Side {
        self.axis().seek()
    }

    /// Computed extent if any, else the declared one, else the measured one,
    /// floored at `minimum`.
    fn desired_space(&self, graph: &LayoutGraph, id: PaneId, minimum: f64) -> f64 {
        let axis = self.axis();
        let ctx = graph.ctx(id);
        let dimension = ctx.size.along(axis);
        dimension
            .internal_value()
            .or_else(|| dimension.user_value())
            .unwrap_or_else(|| ctx.desired.along(axis))
            .max(minimum)
    }

    /// Stretches along the axis and is not pinned by the user.
    fn is_stretchable(&self, graph: &LayoutGraph, id: PaneId) -> bool {
        let axis = self.axis();
        let ctx = graph.ctx(id);
        let dimension = ctx.size.along(axis);
        !dimension.has_user_value() && !dimension.is_splitter_active() && ctx.props.stretches(axis)
    }

    /// First logical neighbor toward the seek side that still needs a position.
    fn next_descendant(&self, graph: &mut LayoutGraph, id: PaneId, pending: &[PaneId]) -> Option<PaneId> {
        graph
            .logical_neighbors(id, self.seek())
            .into_iter()
            .find(|peer| pending.contains(peer))
    }

    /// Where `id` starts: the far coordinate of its first preceding neighbor.
    ///
    /// # Panics
    ///
    /// When that neighbor has not been positioned yet.
    fn preceding_coordinate(&self, graph: &mut LayoutGraph, id: PaneId) -> f64 {
        let seek = self.seek();
        let Some(&peer) = graph.logical_neighbors(id, seek.opposite()).first() else {
            return 0.0;
        };
        match graph.ctx(peer).coordinate(seek) {
            Some(coordinate) => coordinate,
            None => panic!("unpositioned preceding element {peer} before {id}"),
        }
    }

    /// Longest chain of unpositioned panes still to come after `id`.
    fn remaining_depth(&self, graph: &mut LayoutGraph, id: PaneId, pending: &[PaneId]) -> usize {
        let axis = self.axis();
        let neighbors = graph.logical_neighbors(id, self.seek());
        if neighbors.iter().any(|&peer| graph.ctx(peer).origin(axis).is_some()) {
            return 0;
        }
        let mut depth = 0;
        for peer in neighbors {
            if pending.contains(&peer) {
                depth = depth.max(self.remaining_depth(graph, peer, pending) + 1);
            }
        }
        depth
    }

    /// Largest desired extent among silo members spanning the same two
    /// splitter lines as `id`.
    fn peers_max_desired_space(&self, graph: &mut LayoutGraph, id: PaneId, minimum: f64, silo: &Silo) -> f64 {
        let seek = self.seek();
        let trailing = graph.interior_logical_edge(id, seek);
        let mut widest = 0.0_f64;
        for peer in graph.interior_logical_edge(id, seek.opposite()) {
            if silo.contains(peer) && trailing.contains(&peer) {
                widest = widest.max(self.desired_space(graph, peer, minimum));
            }
        }
        widest
    }

    /// Nearest already-positioned obstacle ahead of `id`, or `edge_boundary`.
    fn min_boundary(&self, graph: &mut LayoutGraph, id: PaneId, edge_boundary: f64) -> f64 {
        let axis = self.axis();
        let neighbors = graph.logical_neighbors(id, self.seek());
        if let Some(origin) = neighbors.iter().find_map(|&peer| graph.ctx(peer).origin(axis)) {
            return origin;
        }
        let mut boundary = edge_boundary;
        for peer in neighbors {
            boundary = boundary.min(self.min_boundary(graph, peer, edge_boundary));
        }
        boundary
    }

    fn available_space(&self, graph: &mut LayoutGraph, id: PaneId, base: f64, total: f64) -> f64 {
        self.min_boundary(graph, id, total) - base
    }

    /// Accumulate the fixed space claimed below `root` and the number of
    /// stretchable groups competing with the current run.
    ///
    /// Sibling subtrees are alternatives, so the widest of them counts.
    #[allow(clippy::too_many_arguments)]
    fn fixed_space_internal(
        &self,
        graph: &mut LayoutGraph,
        root: PaneId,
        in_varying_group: bool,
        fixed: &mut f64,
        groups: &mut usize,
        minimum: f64,
        pending: &[PaneId],
    ) {
        let axis = self.axis();
        let neighbors = graph.logical_neighbors(root, self.seek());
        if neighbors.iter().any(|&peer| graph.ctx(peer).origin(axis).is_some()) {
            return;
        }

        let mut subtrees_fixed = 0.0_f64;
        let mut subtrees_groups = 0usize;
        for peer in neighbors {
            if !pending.contains(&peer) {
                continue;
            }
            let mut peer_fixed = 0.0;
            let mut peer_groups = 0;
            let peer_in_varying_group = if self.is_stretchable(graph, peer) {
                if in_varying_group {
                    *groups += 1;
                }
                true
            } else {
                peer_fixed += self.desired_space(graph, peer, minimum);
                false
            };
            self.fixed_space_internal(
                graph,
                peer,
                peer_in_varying_group,
                &mut peer_fixed,
                &mut peer_groups,
                minimum,
                pending,
            );
            subtrees_fixed = subtrees_fixed.max(peer_fixed);
            subtrees_groups = subtrees_groups.max(peer_groups);
        }
        *fixed += subtrees_fixed;
        *groups += subtrees_groups;
    }

    /// Total extent to hand to a stretchable run.
    ///
    /// Never less than `minimum` per member, even if that overflows.
    fn varying_space(
        &self,
        graph: &mut LayoutGraph,
        available: f64,
        minimum: f64,
        run: &[PaneId],
        pending: &[PaneId],
    ) -> f64 {
        let Some(&last) = run.last() else {
            return 0.0;
        };
        let mut fixed = 0.0;
        let mut groups = 1usize;
        self.fixed_space_internal(graph, last, false, &mut fixed, &mut groups, minimum, pending);

        let members = run.len() as f64;
        let share = (available - fixed) * members / (members + groups as f64 - 1.0);
        share.max(members * minimum)
    }

    fn set_position(&self, graph: &mut LayoutGraph, id: PaneId, coordinate: f64, extent: f64) {
        trace!(pane = %id, axis = ?self.axis(), coordinate, extent, "positioned");
        graph.ctx_mut(id).set_position(self.axis(), coordinate, extent);
    }
}

/// Positions silos left to right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HorizontalClient;

impl PositionerClient for HorizontalClient {
    fn axis(&self) -> Axis {
        Axis::Horizontal
    }
}

/// Positions silos top to bottom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerticalClient;

impl PositionerClient for VerticalClient {
    fn axis(&self) -> Axis {
        Axis::Vertical
    }
}

/// Step of one positioning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionerState {
    Starting,
    TestingElementType,
    FirstFixedElement,
    FirstVaryingElement,
    ScanningVarying,
    EndVaryingRun,
    ResetAtEnd,
    Finished,
}

/// Counters describing what a run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionerStats {
    /// Fixed panes positioned.
    pub fixed: usize,
    /// Stretchable runs distributed.
    pub varying_runs: usize,
    /// Restarts at a pane the walk could not reach.
    pub resets: usize,
}

/// Working state of one run over a silo.
#[derive(Debug)]
pub struct AutoPositioner<'c, C: PositionerClient + ?Sized> {
    client: &'c C,
    total: f64,
    minimum: f64,
    state: PositionerState,
    pending: Vec<PaneId>,
    current: Option<PaneId>,
    run: Vec<PaneId>,
    running: f64,
    stats: PositionerStats,
}

impl<'c, C: PositionerClient + ?Sized> AutoPositioner<'c, C> {
    pub fn new(client: &'c C, silo: &Silo, total: f64, minimum: f64) -> Self {
        Self {
            client,
            total,
            minimum,
            state: if silo.is_empty() {
                PositionerState::Finished
            } else {
                PositionerState::Starting
            },
            pending: silo.members().to_vec(),
            current: None,
            run: Vec::new(),
            running: 0.0,
            stats: PositionerStats::default(),
        }
    }

    #[inline]
    pub fn state(&self) -> PositionerState {
        self.state
    }

    /// Position every member of `silo` along the client's axis within
    /// `total` units.
    pub fn run(graph: &mut LayoutGraph, silo: &Silo, total: f64, minimum: f64, client: &'c C) -> PositionerStats {
        let span = debug_span!("auto_position", axis = ?client.axis(), members = silo.len(), total);
        let _guard = span.enter();
        let mut positioner = Self::new(client, silo, total, minimum);
        while positioner.state != PositionerState::Finished {
            positioner.step(graph, silo);
        }
        trace!(stats = ?positioner.stats, "silo positioned");
        positioner.stats
    }

    /// Perform one transition.
    pub fn step(&mut self, graph: &mut LayoutGraph, silo: &Silo) {
        self.state = match self.state {
            PositionerState::Starting => {
                self.current = self.pending.first().copied();
                self.running = 0.0;
                PositionerState::TestingElementType
            }
            PositionerState::TestingElementType => match self.current {
                Some(id) if self.client.is_stretchable(graph, id) => PositionerState::FirstVaryingElement,
                Some(_) => PositionerState::FirstFixedElement,
                None => PositionerState::ResetAtEnd,
            },
            PositionerState::FirstFixedElement => self.first_fixed(graph, silo),
            PositionerState::FirstVaryingElement => {
                self.run.clear();
                PositionerState::ScanningVarying
            }
            PositionerState::ScanningVarying => self.scan_varying(graph),
            PositionerState::EndVaryingRun => self.end_varying_run(graph),
            PositionerState::ResetAtEnd => match self.pending.first().copied() {
                None => PositionerState::Finished,
                Some(next) => {
                    self.stats.resets += 1;
                    self.current = Some(next);
                    self.running = self.client.preceding_coordinate(graph, next);
                    PositionerState::TestingElementType
                }
            },
            PositionerState::Finished => PositionerState::Finished,
        };
    }

    fn mark_positioned(&mut self, id: PaneId) {
        self.pending.retain(|&p| p != id);
    }

    fn first_fixed(&mut self, graph: &mut LayoutGraph, silo: &Silo) -> PositionerState {
        let Some(id) = self.current else {
            return PositionerState::ResetAtEnd;
        };
        let client = self.client;
        let minimum = self.minimum;

        let mut desired = client.peers_max_desired_space(graph, id, minimum, silo);
        self.mark_positioned(id);
        let depth = client.remaining_depth(graph, id, &self.pending) as f64;
        let available = client.available_space(graph, id, self.running, self.total);
        if available - desired < depth * minimum {
            desired = (available - depth * minimum).max(available / (1.0 + depth)).max(0.0);
        }
        client.set_position(graph, id, self.running, desired);
        self.stats.fixed += 1;

        match client.next_descendant(graph, id, &self.pending) {
            None => {
                // Last in its chain: take everything up to the boundary.
                if available > 0.0 {
                    client.set_position(graph, id, self.running, available);
                }
                PositionerState::ResetAtEnd
            }
            Some(next) => {
                self.running += desired;
                self.current = Some(next);
                PositionerState::TestingElementType
            }
        }
    }

    fn scan_varying(&mut self, graph: &mut LayoutGraph) -> PositionerState {
        let Some(id) = self.current else {
            return PositionerState::EndVaryingRun;
        };
        self.run.push(id);
        self.mark_positioned(id);
        self.current = self.client.next_descendant(graph, id, &self.pending);
        match self.current {
            Some(next) if self.client.is_stretchable(graph, next) => PositionerState::ScanningVarying,
            _ => PositionerState::EndVaryingRun,
        }
    }

    fn end_varying_run(&mut self, graph: &mut LayoutGraph) -> PositionerState {
        let client = self.client;
        let run = std::mem::take(&mut self.run);
        let Some(&first) = run.first() else {
            return PositionerState::ResetAtEnd;
        };

        let mut available = client.available_space(graph, first, self.running, self.total);
        let space = client.varying_space(graph, available, self.minimum, &run, &self.pending);
        let share = space / run.len() as f64;
        for &member in &run {
            client.set_position(graph, member, self.running, share);
            self.running += share;
            available -= share;
        }
        self.stats.varying_runs += 1;

        if self.current.is_some() {
            return PositionerState::TestingElementType;
        }
        assert!(
            available <= ROUND_OFF_TOLERANCE,
            "varying space not consumed: {available} units left after run ending at {:?}",
            run.last()
        );
        PositionerState::ResetAtEnd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PaneProps;

    const EPS: f64 = 1e-9;

    fn row(g: &mut LayoutGraph, props: Vec<PaneProps>) -> Vec<PaneId> {
        let mut ids: Vec<PaneId> = Vec::new();
        for p in props {
            let id = g.add(p);
            if let Some(&prev) = ids.last() {
                g.insert_relative(prev, id, Side::Right);
            }
            ids.push(id);
        }
        ids
    }

    fn fixed_width(g: &mut LayoutGraph, id: PaneId, width: f64) {
        let ctx = g.ctx_mut(id);
        ctx.size.width.set_user_value(Some(width));
        ctx.desired.width = width;
    }

    fn horizontal(g: &mut LayoutGraph, total: f64, minimum: f64) -> PositionerStats {
        let start = g.ids()[0];
        let silos = g.build_silos(start, Axis::Horizontal);
        let mut stats = PositionerStats::default();
        for silo in &silos {
            let s = AutoPositioner::run(g, silo, total, minimum, &HorizontalClient);
            stats.fixed += s.fixed;
            stats.varying_runs += s.varying_runs;
            stats.resets += s.resets;
        }
        stats
    }

    fn span(g: &LayoutGraph, id: PaneId) -> (f64, f64) {
        let ctx = g.ctx(id);
        (
            ctx.left().unwrap_or(f64::NAN),
            ctx.size().width.internal_value().unwrap_or(f64::NAN),
        )
    }

    #[test]
    fn stretchable_row_splits_evenly() {
        let mut g = LayoutGraph::new();
        let ids = row(&mut g, vec![PaneProps::new("a"), PaneProps::new("b"), PaneProps::new("c")]);
        let stats = horizontal(&mut g, 300.0, 75.0);
        assert_eq!(stats.varying_runs, 1);
        for (i, &id) in ids.iter().enumerate() {
            let (left, width) = span(&g, id);
            assert!((left - 100.0 * i as f64).abs() < EPS);
            assert!((width - 100.0).abs() < EPS);
        }
    }

    #[test]
    fn fixed_ends_keep_their_width() {
        let mut g = LayoutGraph::new();
        let ids = row(&mut g, vec![PaneProps::new("a"), PaneProps::new("b"), PaneProps::new("c")]);
        fixed_width(&mut g, ids[0], 50.0);
        fixed_width(&mut g, ids[2], 50.0);
        let stats = horizontal(&mut g, 300.0, 50.0);
        assert_eq!(stats.fixed, 2);
        assert_eq!(span(&g, ids[0]), (0.0, 50.0));
        assert_eq!(span(&g, ids[1]), (50.0, 200.0));
        assert_eq!(span(&g, ids[2]), (250.0, 50.0));
    }

    #[test]
    fn fixed_panes_are_floored_at_minimum() {
        let mut g = LayoutGraph::new();
        let ids = row(&mut g, vec![PaneProps::new("a"), PaneProps::new("b"), PaneProps::new("c")]);
        fixed_width(&mut g, ids[0], 50.0);
        fixed_width(&mut g, ids[2], 50.0);
        horizontal(&mut g, 300.0, 75.0);
        assert_eq!(span(&g, ids[0]), (0.0, 75.0));
        assert_eq!(span(&g, ids[1]), (75.0, 150.0));
        assert_eq!(span(&g, ids[2]), (225.0, 75.0));
    }

    #[test]
    fn stretch_share_never_drops_below_minimum() {
        let mut g = LayoutGraph::new();
        let ids = row(&mut g, vec![PaneProps::new("a"), PaneProps::new("b"), PaneProps::new("c")]);
        horizontal(&mut g, 120.0, 75.0);
        for (i, &id) in ids.iter().enumerate() {
            let (left, width) = span(&g, id);
            assert!((width - 75.0).abs() < EPS);
            assert!((left - 75.0 * i as f64).abs() < EPS);
        }
    }

    #[test]
    fn fixed_pane_yields_to_remaining_depth() {
        let mut g = LayoutGraph::new();
        let ids = row(&mut g, vec![PaneProps::new("a"), PaneProps::new("b")]);
        fixed_width(&mut g, ids[0], 280.0);
        horizontal(&mut g, 300.0, 75.0);
        // 300 - 280 leaves less than one minimum for b.
        assert_eq!(span(&g, ids[0]), (0.0, 225.0));
        assert_eq!(span(&g, ids[1]), (225.0, 75.0));
    }

    #[test]
    fn deeper_fixed_space_is_reserved() {
        let mut g = LayoutGraph::new();
        let ids = row(&mut g, vec![PaneProps::new("a"), PaneProps::new("b"), PaneProps::new("c")]);
        fixed_width(&mut g, ids[2], 100.0);
        horizontal(&mut g, 400.0, 75.0);
        assert_eq!(span(&g, ids[0]), (0.0, 150.0));
        assert_eq!(span(&g, ids[1]), (150.0, 150.0));
        assert_eq!(span(&g, ids[2]), (300.0, 100.0));
    }

    #[test]
    fn vertical_client_positions_a_column() {
        let mut g = LayoutGraph::new();
        let a = g.add(PaneProps::new("a"));
        let b = g.add(PaneProps::new("b"));
        g.insert_relative(a, b, Side::Bottom);
        let silos = g.build_silos(a, Axis::Vertical);
        assert_eq!(silos.len(), 1);
        AutoPositioner::run(&mut g, &silos[0], 200.0, 75.0, &VerticalClient);
        assert_eq!(g.ctx(a).top(), Some(0.0));
        assert_eq!(g.ctx(b).top(), Some(100.0));
        assert_eq!(g.ctx(b).size().height.internal_value(), Some(100.0));
    }

    #[test]
    fn empty_silo_finishes_immediately() {
        let positioner = AutoPositioner::new(&HorizontalClient, &Silo::new(), 100.0, 75.0);
        assert_eq!(positioner.state(), PositionerState::Finished);
    }

    #[test]
    fn client_queries_follow_axis() {
        assert_eq!(HorizontalClient.seek(), Side::Right);
        assert_eq!(VerticalClient.seek(), Side::Bottom);

        let mut g = LayoutGraph::new();
        let ids = row(&mut g, vec![PaneProps::new("a"), PaneProps::new("b").stretch(false, true)]);
        assert!(HorizontalClient.is_stretchable(&g, ids[0]));
        assert!(!HorizontalClient.is_stretchable(&g, ids[1]));
        assert!(VerticalClient.is_stretchable(&g, ids[1]));
        assert_eq!(HorizontalClient.remaining_depth(&mut g, ids[0], &ids), 1);
        assert_eq!(HorizontalClient.preceding_coordinate(&mut g, ids[0]), 0.0);
    }
}

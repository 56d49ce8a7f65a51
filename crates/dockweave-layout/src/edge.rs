#![forbid(unsafe_code)]

//! Pane edges and their derived adjacency views.
//!
//! Each side of a pane owns a [`PaneEdge`]. The physical neighbor list is
//! maintained by graph mutation. Everything else is derived on demand and
//! cached until the next invalidation:
//!
//! - **Physical edges**: the run of panes on both sides of the splitter line
//!   this edge lies on. The *interior* list is this side of the line, the
//!   *exterior* list the far side.
//! - **Logical replacements**: for a collapsed pane, the panes that grow into
//!   its space through this edge.
//! - **Logical neighbors**: the physical neighbors with collapsed panes
//!   replaced by whoever covers for them.
//! - **Logical edges**: the interior/exterior runs rebuilt over logical
//!   neighbors, which seed silo construction.
//!
//! The logical views are computed strictly in that order. A
//! [`RelationshipLevel`] records how far an edge has got, and an in-progress
//! marker turns accidental recursion into an immediate panic instead of
//! unbounded descent.

use dockweave_core::Side;
use rustc_hash::FxHashSet;

use crate::context::PaneId;
use crate::graph::LayoutGraph;

/// How much derived state of an edge is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelationshipLevel {
    NotBuilt,
    ReplacementsKnown,
    NeighborsKnown,
    EdgesKnown,
}

impl RelationshipLevel {
    fn next(self) -> Option<RelationshipLevel> {
        match self {
            Self::NotBuilt => Some(Self::ReplacementsKnown),
            Self::ReplacementsKnown => Some(Self::NeighborsKnown),
            Self::NeighborsKnown => Some(Self::EdgesKnown),
            Self::EdgesKnown => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct EdgeRun {
    interior: Vec<PaneId>,
    exterior: Vec<PaneId>,
}

/// One side of a pane.
#[derive(Debug, Clone)]
pub struct PaneEdge {
    side: Side,
    physical: Vec<PaneId>,
    physical_run: Option<EdgeRun>,
    level: RelationshipLevel,
    in_progress: Option<RelationshipLevel>,
    replacements: Option<Vec<PaneId>>,
    logical_neighbors: Vec<PaneId>,
    logical_run: EdgeRun,
}

impl PaneEdge {
    pub(crate) fn new(side: Side) -> Self {
        Self {
            side,
            physical: Vec::new(),
            physical_run: None,
            level: RelationshipLevel::NotBuilt,
            in_progress: None,
            replacements: None,
            logical_neighbors: Vec::new(),
            logical_run: EdgeRun::default(),
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Panes directly touching this side, in list order.
    #[inline]
    pub fn physical(&self) -> &[PaneId] {
        &self.physical
    }

    #[inline]
    pub fn level(&self) -> RelationshipLevel {
        self.level
    }

    pub(crate) fn physical_mut(&mut self) -> &mut Vec<PaneId> {
        &mut self.physical
    }

    pub(crate) fn push_unique(&mut self, id: PaneId) {
        if !self.physical.contains(&id) {
            self.physical.push(id);
        }
    }

    pub(crate) fn replace(&mut self, old: PaneId, new: PaneId) {
        if let Some(slot) = self.physical.iter_mut().find(|p| **p == old) {
            *slot = new;
        } else {
            panic!(
                "peer list mismatch: {old} missing from {} list while splicing {new}",
                self.side
            );
        }
    }

    /// Insert `new` immediately before or after `anchor`.
    pub(crate) fn insert_next_to(&mut self, anchor: PaneId, new: PaneId, before: bool) {
        if self.physical.contains(&new) {
            return;
        }
        match self.physical.iter().position(|p| *p == anchor) {
            Some(pos) => {
                let at = if before { pos } else { pos + 1 };
                self.physical.insert(at, new);
            }
            None => panic!(
                "peer list mismatch: {anchor} missing from {} list while inserting {new}",
                self.side
            ),
        }
    }

    pub(crate) fn remove(&mut self, id: PaneId) {
        self.physical.retain(|p| *p != id);
    }

    pub(crate) fn invalidate_logical(&mut self) {
        self.level = RelationshipLevel::NotBuilt;
        self.in_progress = None;
        self.replacements = None;
        self.logical_neighbors.clear();
        self.logical_run = EdgeRun::default();
    }

    pub(crate) fn invalidate_physical(&mut self) {
        self.physical_run = None;
        self.invalidate_logical();
    }
}

impl LayoutGraph {
    fn edge(&self, id: PaneId, side: Side) -> &PaneEdge {
        self.ctx(id).edge(side)
    }

    fn edge_mut(&mut self, id: PaneId, side: Side) -> &mut PaneEdge {
        self.ctx_mut(id).edge_mut(side)
    }

    // ------------------------------------------------------------------
    // Physical edges
    // ------------------------------------------------------------------

    fn ensure_physical_run(&mut self, id: PaneId, side: Side) {
        if self.edge(id, side).physical_run.is_some() {
            return;
        }
        let run = if self.edge(id, side).physical.is_empty() {
            self.physical_outward_run(id, side)
        } else {
            self.physical_inward_run(id, side)
        };
        self.edge_mut(id, side).physical_run = Some(run);
    }

    /// Panes on this side of the splitter line `id`'s `side` lies on.
    pub fn interior_physical_edge(&mut self, id: PaneId, side: Side) -> Vec<PaneId> {
        self.ensure_physical_run(id, side);
        self.edge(id, side)
            .physical_run
            .as_ref()
            .map(|run| run.interior.clone())
            .unwrap_or_default()
    }

    /// Panes on the far side of the splitter line `id`'s `side` lies on.
    pub fn exterior_physical_edge(&mut self, id: PaneId, side: Side) -> Vec<PaneId> {
        self.ensure_physical_run(id, side);
        self.edge(id, side)
            .physical_run
            .as_ref()
            .map(|run| run.exterior.clone())
            .unwrap_or_default()
    }

    /// Walk back along the line to the first pane touching it on this side.
    fn first_physical_member(&self, id: PaneId, side: Side) -> PaneId {
        let mut current = id;
        let mut seen = FxHashSet::default();
        while seen.insert(current) {
            let Some(&across) = self.edge(current, side).physical.first() else {
                break;
            };
            let Some(&back) = self.edge(across, side.opposite()).physical.first() else {
                break;
            };
            if back == current {
                break;
            }
            current = back;
        }
        current
    }

    fn physical_inward_run(&self, id: PaneId, side: Side) -> EdgeRun {
        let first = self.first_physical_member(id, side);
        sweep_line(
            first,
            &mut |p: PaneId, s: Side| self.edge(p, s).physical.clone(),
            side,
        )
    }

    /// A side on the panel border: the interior run is the whole border.
    fn physical_outward_run(&self, id: PaneId, side: Side) -> EdgeRun {
        let (mut peer, take_last) = match side {
            Side::Bottom => (self.bottom_left_most(id), true),
            Side::Right => (self.top_right_most(id), true),
            Side::Left | Side::Top => (self.top_left_most(id), false),
        };
        let step = side.max_orthogonal();
        let mut interior = vec![peer];
        loop {
            let list = &self.edge(peer, step).physical;
            let next = if take_last { list.last() } else { list.first() };
            match next {
                Some(&next) if !interior.contains(&next) => {
                    interior.push(next);
                    peer = next;
                }
                _ => break,
            }
        }
        EdgeRun {
            interior,
            exterior: Vec::new(),
        }
    }

    pub(crate) fn is_physically_reachable(&mut self, from: PaneId, target: PaneId, seek: Side) -> bool {
        for neighbor in self.exterior_physical_edge(from, seek) {
            if neighbor == target || self.is_physically_reachable(neighbor, target, seek) {
                return true;
            }
        }
        false
    }

    // ------------------------------------------------------------------
    // Logical relationships
    // ------------------------------------------------------------------

    fn ensure_relationships(&mut self, id: PaneId, side: Side, required: RelationshipLevel) {
        while self.edge(id, side).level < required {
            let edge = self.edge_mut(id, side);
            let Some(building) = edge.level.next() else {
                return;
            };
            if edge.in_progress == Some(building) {
                panic!("recursive {building:?} computation on {id}/{side}: recursion not supported");
            }
            edge.in_progress = Some(building);
            match building {
                RelationshipLevel::ReplacementsKnown => {
                    let replacements = self.compute_logical_replacements(id, side);
                    self.edge_mut(id, side).replacements = replacements;
                }
                RelationshipLevel::NeighborsKnown => {
                    let neighbors = self.compute_logical_neighbors(id, side);
                    self.edge_mut(id, side).logical_neighbors = neighbors;
                }
                RelationshipLevel::EdgesKnown => {
                    let run = self.compute_logical_run(id, side);
                    self.edge_mut(id, side).logical_run = run;
                }
                RelationshipLevel::NotBuilt => {}
            }
            let edge = self.edge_mut(id, side);
            edge.level = building;
            edge.in_progress = None;
        }
    }

    /// Panes that grow into a collapsed pane's space through this edge.
    ///
    /// `None` for visible panes, or when nothing can take the space.
    pub fn logical_replacements(&mut self, id: PaneId, side: Side) -> Option<Vec<PaneId>> {
        self.ensure_relationships(id, side, RelationshipLevel::ReplacementsKnown);
        let replacements = self.edge(id, side).replacements.clone();
        if let Some(list) = &replacements {
            self.assert_visible(list, id, side, "logical replacements");
        }
        replacements
    }

    /// Physical neighbors with collapsed panes replaced by their cover.
    pub fn logical_neighbors(&mut self, id: PaneId, side: Side) -> Vec<PaneId> {
        self.ensure_relationships(id, side, RelationshipLevel::NeighborsKnown);
        let neighbors = self.edge(id, side).logical_neighbors.clone();
        self.assert_visible(&neighbors, id, side, "logical neighbors");
        neighbors
    }

    pub fn interior_logical_edge(&mut self, id: PaneId, side: Side) -> Vec<PaneId> {
        self.ensure_relationships(id, side, RelationshipLevel::EdgesKnown);
        self.edge(id, side).logical_run.interior.clone()
    }

    pub fn exterior_logical_edge(&mut self, id: PaneId, side: Side) -> Vec<PaneId> {
        self.ensure_relationships(id, side, RelationshipLevel::EdgesKnown);
        self.edge(id, side).logical_run.exterior.clone()
    }

    fn assert_visible(&self, list: &[PaneId], id: PaneId, side: Side, what: &str) {
        if let Some(bad) = list.iter().find(|p| self.is_collapsed(**p)) {
            panic!("collapsed pane {bad} found in {what} of {id}/{side}");
        }
    }

    fn compute_logical_replacements(&mut self, id: PaneId, side: Side) -> Option<Vec<PaneId>> {
        if !self.is_collapsed(id) {
            return None;
        }
        let (contacting, opposing) = self.replacement_candidates(id, side.opposite());
        match (contacting, opposing) {
            (None, opposing) => opposing,
            (contacting, None) => contacting,
            (Some(contacting), Some(opposing)) => Some(match side {
                Side::Left | Side::Top => contacting.into_iter().chain(opposing).collect(),
                Side::Right | Side::Bottom => opposing.into_iter().chain(contacting).collect(),
            }),
        }
    }

    /// Who could expand into `id`'s space from each side of the axis of
    /// `contacting`: first from across `contacting`, then from across its
    /// opposite.
    pub(crate) fn replacement_candidates(
        &mut self,
        id: PaneId,
        contacting: Side,
    ) -> (Option<Vec<PaneId>>, Option<Vec<PaneId>>) {
        let limit = self.exterior_physical_edge(id, contacting);
        let from_contacting = self.promotion_candidates(id, &limit, contacting.opposite());
        let limit = self.exterior_physical_edge(id, contacting.opposite());
        let from_opposing = self.promotion_candidates(id, &limit, contacting);
        (from_contacting, from_opposing)
    }

    fn promotion_candidates(&mut self, id: PaneId, limit: &[PaneId], seek: Side) -> Option<Vec<PaneId>> {
        let visible = self.visible_ancestor(id, seek)?;
        let back = seek.opposite();
        let behind = self.exterior_physical_edge(visible, back);
        if self.any_descendants_visible(&behind, limit, back) {
            return None;
        }
        let candidates = self
            .interior_physical_edge(visible, back)
            .into_iter()
            .filter(|p| !self.is_collapsed(*p))
            .collect();
        Some(candidates)
    }

    fn any_descendants_visible(&self, line: &[PaneId], limit: &[PaneId], side: Side) -> bool {
        let mut hit_limit = false;
        for &pane in line {
            if limit.contains(&pane) {
                hit_limit = true;
            } else if !self.is_collapsed(pane) {
                return true;
            }
        }
        if !hit_limit {
            for &pane in line {
                let next = self.edge(pane, side).physical.clone();
                if self.any_descendants_visible(&next, limit, side) {
                    return true;
                }
            }
        }
        false
    }

    /// First visible pane reached by walking physical neighbors toward `seek`.
    pub(crate) fn visible_ancestor(&self, id: PaneId, seek: Side) -> Option<PaneId> {
        let neighbors = &self.edge(id, seek).physical;
        if let Some(&visible) = neighbors.iter().find(|p| !self.is_collapsed(**p)) {
            return Some(visible);
        }
        neighbors
            .iter()
            .find_map(|&candidate| self.visible_ancestor(candidate, seek))
    }

    fn compute_logical_neighbors(&mut self, id: PaneId, side: Side) -> Vec<PaneId> {
        let physical = self.edge(id, side).physical.clone();
        if !physical.iter().any(|p| self.is_collapsed(*p)) {
            return physical;
        }

        let mut logical = Vec::new();
        for neighbor in physical {
            if !self.is_collapsed(neighbor) {
                if !logical.contains(&neighbor) {
                    logical.push(neighbor);
                }
                continue;
            }
            let Some(replacements) = self.logical_replacements(neighbor, side) else {
                continue;
            };
            let mut found = false;
            for replacement in replacements {
                if self.is_physically_reachable(id, replacement, side) {
                    found = true;
                    if !logical.contains(&replacement) {
                        logical.push(replacement);
                    }
                }
            }
            if !found {
                for beyond in self.logical_neighbors(neighbor, side) {
                    if !logical.contains(&beyond) {
                        logical.push(beyond);
                    }
                }
            }
        }
        logical
    }

    fn compute_logical_run(&mut self, id: PaneId, side: Side) -> EdgeRun {
        if self.is_collapsed(id) {
            return EdgeRun::default();
        }
        if self.logical_neighbors(id, side).is_empty() {
            self.logical_outward_run(side)
        } else {
            let first = self.first_logical_member(id, side);
            sweep_line(
                first,
                &mut |p: PaneId, s: Side| self.logical_neighbors(p, s),
                side,
            )
        }
    }

    /// Every visible pane on the panel border at `side`, ordered top to
    /// bottom or left to right.
    fn logical_outward_run(&mut self, side: Side) -> EdgeRun {
        let mut interior: Vec<PaneId> = Vec::new();
        for pane in self.ids().to_vec() {
            if self.is_collapsed(pane) || !self.logical_neighbors(pane, side).is_empty() {
                continue;
            }
            let mut at = interior.len();
            for (i, &existing) in interior.iter().enumerate() {
                if self.is_logical_preceding(pane, existing, side) {
                    at = i;
                    break;
                }
            }
            interior.insert(at, pane);
        }
        EdgeRun {
            interior,
            exterior: Vec::new(),
        }
    }

    /// True when `id` lies before `reference` along a border on `side`.
    fn is_logical_preceding(&mut self, id: PaneId, reference: PaneId, side: Side) -> bool {
        let before = self.logical_neighbors(reference, side.min_orthogonal());
        if before.contains(&id) {
            return true;
        }
        before
            .into_iter()
            .any(|neighbor| self.is_logical_preceding(id, neighbor, side))
    }

    fn first_logical_member(&mut self, id: PaneId, side: Side) -> PaneId {
        assert!(
            !self.is_collapsed(id),
            "logical edge requested for collapsed pane {id}/{side}"
        );
        for candidate in self.interior_physical_edge(id, side) {
            if !self.is_collapsed(candidate) {
                return candidate;
            }
            let (_, opposing) = self.replacement_candidates(candidate, side);
            if let Some(visible) = opposing
                .into_iter()
                .flatten()
                .find(|p| !self.is_collapsed(*p))
            {
                return visible;
            }
        }
        panic!("no visible first member on logical edge {id}/{side}");
    }
}

/// Sweep a splitter line starting from `first`, alternating between panes on
/// its near side and their neighbors across it.
fn sweep_line(
    first: PaneId,
    neighbors: &mut dyn FnMut(PaneId, Side) -> Vec<PaneId>,
    side: Side,
) -> EdgeRun {
    let mut seen = FxHashSet::default();
    let mut run = EdgeRun {
        interior: vec![first],
        exterior: Vec::new(),
    };
    seen.insert(first);
    let mut current = first;
    loop {
        for across in neighbors(current, side) {
            if !seen.insert(across) {
                continue;
            }
            run.exterior.push(across);
            for near in neighbors(across, side.opposite()) {
                if seen.insert(near) {
                    run.interior.push(near);
                }
            }
        }
        current = match run.interior.last() {
            Some(&last) => last,
            None => break,
        };
        match neighbors(current, side).last() {
            Some(last) if !seen.contains(last) => {}
            _ => break,
        }
    }
    run
}

#![forbid(unsafe_code)]

//! Silos: groups of panes positioned together along one axis.
//!
//! A horizontal silo is every pane reachable rightward from a set of roots on
//! the panel's left border. Roots whose reach overlaps are merged into one
//! silo so that a pane is never positioned by two independent runs.

use dockweave_core::{Axis, Side};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::context::PaneId;
use crate::graph::LayoutGraph;

/// Ordered, set-backed collection of panes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Silo {
    members: Vec<PaneId>,
    index: FxHashSet<PaneId>,
}

impl Silo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` unless already present.
    pub fn add(&mut self, id: PaneId) -> bool {
        if self.index.insert(id) {
            self.members.push(id);
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn contains(&self, id: PaneId) -> bool {
        self.index.contains(&id)
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.index.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in insertion order.
    #[inline]
    pub fn members(&self) -> &[PaneId] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = PaneId> + '_ {
        self.members.iter().copied()
    }

    /// True when no pane belongs to both silos.
    ///
    /// Stamps every member of `self` with a fresh cycle number and checks
    /// `other` against the stamp, so the test is linear in both sizes.
    pub fn is_disjoint(&self, other: &Silo, graph: &mut LayoutGraph) -> bool {
        let cycle = graph.next_cycle();
        for &id in &self.members {
            graph.ctx_mut(id).cycle = cycle;
        }
        other.members.iter().all(|&id| graph.ctx(id).cycle != cycle)
    }
}

impl<'a> IntoIterator for &'a Silo {
    type Item = &'a PaneId;
    type IntoIter = std::slice::Iter<'a, PaneId>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl LayoutGraph {
    /// Partition the visible panes into silos along `axis`.
    ///
    /// `start` may be any pane; building begins from the top-left visible one.
    pub fn build_silos(&mut self, start: PaneId, axis: Axis) -> Vec<Silo> {
        let seek = axis.seek();
        let Some(origin) = self.top_left_most_visible(start) else {
            return Vec::new();
        };

        let mut silos: Vec<Silo> = Vec::new();
        let mut merged_roots: Vec<PaneId> = Vec::new();
        for root in self.interior_logical_edge(origin, seek.opposite()) {
            let mut silo = Silo::new();
            self.fill_silo(&mut silo, &[root], seek);

            let disjoint = match silos.last() {
                Some(last) => last.is_disjoint(&silo, self),
                None => true,
            };
            if disjoint {
                silos.push(silo);
                merged_roots.clear();
                merged_roots.push(root);
            } else if let Some(last) = silos.last_mut() {
                merged_roots.push(root);
                debug!(?axis, %root, roots = merged_roots.len(), "merging overlapping silo");
                last.clear();
                self.fill_silo(last, &merged_roots, seek);
            }
        }
        silos
    }

    fn fill_silo(&mut self, silo: &mut Silo, roots: &[PaneId], seek: Side) {
        for &root in roots {
            silo.add(root);
        }
        for &root in roots {
            for descendant in self.exterior_logical_edge(root, seek) {
                let next = self.interior_logical_edge(descendant, seek.opposite());
                self.fill_silo(silo, &next, seek);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PaneProps;

    fn ids(raw: &[u32]) -> Vec<PaneId> {
        raw.iter().map(|&r| PaneId::new(r)).collect()
    }

    #[test]
    fn silo_keeps_first_insertion_order() {
        let mut silo = Silo::new();
        assert!(silo.add(PaneId::new(3)));
        assert!(silo.add(PaneId::new(1)));
        assert!(!silo.add(PaneId::new(3)));
        assert_eq!(silo.members(), &ids(&[3, 1])[..]);
        assert!(silo.contains(PaneId::new(1)));
        silo.clear();
        assert!(silo.is_empty());
    }

    #[test]
    fn disjointness_by_cycle_stamp() {
        let mut g = LayoutGraph::new();
        let a = g.add(PaneProps::new("a"));
        let b = g.add(PaneProps::new("b"));
        let c = g.add(PaneProps::new("c"));
        let mut left = Silo::new();
        left.add(a);
        left.add(b);
        let mut right = Silo::new();
        right.add(c);
        assert!(left.is_disjoint(&right, &mut g));
        right.add(b);
        assert!(!left.is_disjoint(&right, &mut g));
        // Stale stamps from the previous check must not leak.
        let mut only_a = Silo::new();
        only_a.add(a);
        let mut only_c = Silo::new();
        only_c.add(c);
        assert!(only_c.is_disjoint(&only_a, &mut g));
    }

    #[test]
    fn row_is_one_horizontal_silo_and_many_vertical() {
        let mut g = LayoutGraph::new();
        let a = g.add(PaneProps::new("a"));
        let b = g.add(PaneProps::new("b"));
        g.insert_relative(a, b, Side::Right);
        let c = g.add(PaneProps::new("c"));
        g.insert_relative(b, c, Side::Right);

        let horizontal = g.build_silos(c, Axis::Horizontal);
        assert_eq!(horizontal.len(), 1);
        assert_eq!(horizontal[0].members(), &[a, b, c]);

        let vertical = g.build_silos(a, Axis::Vertical);
        assert_eq!(vertical.len(), 3);
        assert_eq!(vertical[0].members(), &[a]);
        assert_eq!(vertical[2].members(), &[c]);
    }

    #[test]
    fn shared_descendant_merges_roots() {
        // A over B on the left, C spanning both on the right.
        let mut g = LayoutGraph::new();
        let a = g.add(PaneProps::new("a"));
        let c = g.add(PaneProps::new("c"));
        g.insert_relative(a, c, Side::Right);
        let b = g.add(PaneProps::new("b"));
        g.insert_relative(a, b, Side::Bottom);

        let horizontal = g.build_silos(a, Axis::Horizontal);
        assert_eq!(horizontal.len(), 1);
        let silo = &horizontal[0];
        assert_eq!(silo.len(), 3);
        for id in [a, b, c] {
            assert!(silo.contains(id));
        }

        let vertical = g.build_silos(a, Axis::Vertical);
        assert_eq!(vertical.len(), 2);
        assert_eq!(vertical[0].members(), &[a, b]);
        assert_eq!(vertical[1].members(), &[c]);
    }
}

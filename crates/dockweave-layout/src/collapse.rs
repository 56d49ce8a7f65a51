#![forbid(unsafe_code)]

//! Finding the panes that own space vacated by a collapse.
//!
//! When a pane collapses (or comes back) the region it covers changes hands.
//! [`invalidate_neighbors`] looks across one edge of the pane for a band of
//! neighbors that exactly shares the pane's extent, skipping over panes that
//! are themselves collapsed, and resets the band once it finds one made only
//! of visible panes.

use dockweave_core::Side;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::context::{PaneId, PositionClasses};
use crate::graph::LayoutGraph;

type PaneSet = FxHashSet<PaneId>;

fn neighbor_set(graph: &LayoutGraph, id: PaneId, side: Side) -> PaneSet {
    graph.physical_neighbors(id, side).iter().copied().collect()
}

/// Extend the collapsed run around `root` toward `rotation`.
///
/// Collapsed panes whose `edge` neighbors equal `neighbors` act as one unit
/// with the root; the outermost one's neighbors on `rotation` become the
/// band limit on that side.
fn extend_run(
    graph: &LayoutGraph,
    root: PaneId,
    edge: Side,
    rotation: Side,
    neighbors: &PaneSet,
    preceding: &mut PaneSet,
) -> PaneSet {
    let mut limit = neighbor_set(graph, root, rotation);
    let mut cursor = graph.physical_neighbors(root, rotation).first().copied();
    while let Some(peer) = cursor {
        if !graph.is_collapsed(peer) || neighbor_set(graph, peer, edge) != *neighbors {
            break;
        }
        if !preceding.insert(peer) {
            break;
        }
        limit = neighbor_set(graph, peer, rotation);
        cursor = graph.physical_neighbors(peer, rotation).first().copied();
    }
    limit
}

/// Invalidate the visible band across `edge` of `root`, if one exists.
///
/// Returns `true` when a band was found and reset. `false` means the band is
/// ambiguous (mixed collapsed and visible, or not aligned with the root) and
/// no geometry on that edge depends on `root`.
pub(crate) fn invalidate_neighbors(graph: &mut LayoutGraph, root: PaneId, edge: Side) -> bool {
    let mut neighbors = neighbor_set(graph, root, edge);
    let mut preceding = PaneSet::default();
    preceding.insert(root);

    let clockwise = edge.clockwise();
    let counter_clockwise = edge.counter_clockwise();
    let limit_cw = extend_run(graph, root, edge, clockwise, &neighbors, &mut preceding);
    let limit_ccw = extend_run(graph, root, edge, counter_clockwise, &neighbors, &mut preceding);

    while !neighbors.is_empty() {
        let mut collapsed = 0usize;
        for &neighbor in &neighbors {
            let aligned = neighbor_set(graph, neighbor, edge.opposite()).is_subset(&preceding)
                && neighbor_set(graph, neighbor, clockwise).is_subset(&limit_cw)
                && neighbor_set(graph, neighbor, counter_clockwise).is_subset(&limit_ccw);
            if !aligned {
                debug!(pane = %root, %edge, %neighbor, "collapse band not aligned");
                return false;
            }
            if graph.is_collapsed(neighbor) {
                collapsed += 1;
            }
        }

        if collapsed == neighbors.len() {
            let next: PaneSet = neighbors
                .iter()
                .flat_map(|&n| graph.physical_neighbors(n, edge).iter().copied())
                .collect();
            preceding = std::mem::replace(&mut neighbors, next);
        } else if collapsed == 0 {
            let mut band: Vec<PaneId> = neighbors.into_iter().collect();
            band.sort_unstable();
            debug!(pane = %root, %edge, band = band.len(), "invalidating collapse band");
            for neighbor in band {
                graph.invalidate_positioning(neighbor, PositionClasses::for_side(edge));
            }
            return true;
        } else {
            debug!(pane = %root, %edge, collapsed, "collapse band is mixed");
            return false;
        }
    }
    false
}

#![forbid(unsafe_code)]

//! Consistency checks over an arranged layout.
//!
//! Every visible pane must be positioned, must start inside the panel, and
//! must touch each logical neighbor on its right and bottom sides. A pane
//! with no neighbor there must reach the panel border. Overshooting the
//! border is accepted: minimum sizes may overflow a panel that is too small.

use dockweave_core::{Side, Size};

use crate::context::PaneId;
use crate::error::{LayoutValidationError, ValidationIssue};
use crate::graph::LayoutGraph;

/// Check the current positions in `graph` against an arrange of `area`.
///
/// Returns every problem found, in pane order.
pub fn validate_arrangement(graph: &mut LayoutGraph, area: Size, tolerance: f64) -> Vec<LayoutValidationError> {
    let mut problems = Vec::new();
    for pane in graph.ids().to_vec() {
        if graph.is_collapsed(pane) {
            continue;
        }
        let Some(bounds) = graph.ctx(pane).bounds() else {
            problems.push(LayoutValidationError {
                pane,
                issue: ValidationIssue::Unpositioned,
            });
            continue;
        };

        for (edge, coordinate) in [(Side::Left, bounds.left()), (Side::Top, bounds.top())] {
            if coordinate < -tolerance {
                problems.push(LayoutValidationError {
                    pane,
                    issue: ValidationIssue::OutOfBounds {
                        edge,
                        coordinate,
                        limit: 0.0,
                    },
                });
            }
        }

        for (side, limit) in [(Side::Right, area.width), (Side::Bottom, area.height)] {
            check_trailing_side(graph, pane, side, bounds.edge(side), limit, tolerance, &mut problems);
        }
    }
    problems
}

fn check_trailing_side(
    graph: &mut LayoutGraph,
    pane: PaneId,
    side: Side,
    coordinate: f64,
    limit: f64,
    tolerance: f64,
    problems: &mut Vec<LayoutValidationError>,
) {
    let axis = side.axis();
    let neighbors = graph.logical_neighbors(pane, side);
    if neighbors.is_empty() {
        if coordinate < limit - tolerance {
            problems.push(LayoutValidationError {
                pane,
                issue: ValidationIssue::OutOfBounds {
                    edge: side,
                    coordinate,
                    limit,
                },
            });
        }
        return;
    }
    for neighbor in neighbors {
        let Some(origin) = graph.ctx(neighbor).origin(axis) else {
            continue;
        };
        let distance = origin - coordinate;
        if distance.abs() > tolerance {
            problems.push(LayoutValidationError {
                pane,
                issue: ValidationIssue::Gap {
                    side,
                    neighbor,
                    distance,
                },
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PaneProps;
    use dockweave_core::Axis;

    fn pair() -> (LayoutGraph, PaneId, PaneId) {
        let mut g = LayoutGraph::new();
        let a = g.add(PaneProps::new("a"));
        let b = g.add(PaneProps::new("b"));
        g.insert_relative(a, b, Side::Right);
        (g, a, b)
    }

    fn place(g: &mut LayoutGraph, id: PaneId, left: f64, width: f64, height: f64) {
        let ctx = g.ctx_mut(id);
        ctx.set_position(Axis::Horizontal, left, width);
        ctx.set_position(Axis::Vertical, 0.0, height);
    }

    #[test]
    fn clean_layout_passes() {
        let (mut g, a, b) = pair();
        place(&mut g, a, 0.0, 100.0, 50.0);
        place(&mut g, b, 100.05, 99.95, 50.0);
        assert!(validate_arrangement(&mut g, Size::new(200.0, 50.0), 0.1).is_empty());
    }

    #[test]
    fn unpositioned_pane_is_reported() {
        let (mut g, a, b) = pair();
        place(&mut g, a, 0.0, 100.0, 50.0);
        let problems = validate_arrangement(&mut g, Size::new(200.0, 50.0), 0.1);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].pane, b);
        assert_eq!(problems[0].issue, ValidationIssue::Unpositioned);
    }

    #[test]
    fn gap_between_neighbors_is_reported() {
        let (mut g, a, b) = pair();
        place(&mut g, a, 0.0, 90.0, 50.0);
        place(&mut g, b, 100.0, 100.0, 50.0);
        let problems = validate_arrangement(&mut g, Size::new(200.0, 50.0), 0.1);
        assert_eq!(problems.len(), 1);
        assert!(matches!(
            problems[0].issue,
            ValidationIssue::Gap { side: Side::Right, neighbor, .. } if neighbor == b
        ));
    }

    #[test]
    fn short_of_border_is_reported_but_overflow_is_not() {
        let (mut g, a, b) = pair();
        place(&mut g, a, 0.0, 100.0, 40.0);
        place(&mut g, b, 100.0, 150.0, 60.0);
        let problems = validate_arrangement(&mut g, Size::new(200.0, 50.0), 0.1);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].pane, a);
        assert!(matches!(
            problems[0].issue,
            ValidationIssue::OutOfBounds { edge: Side::Bottom, .. }
        ));
    }
}

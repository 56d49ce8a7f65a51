#![forbid(unsafe_code)]

//! Property tests for layout graph invariants.
//!
//! Random operation streams are applied through the public panel API and the
//! graph is checked after every step:
//!
//! - physical adjacency is symmetric
//! - logical neighbors never contain a collapsed pane
//! - arranged stretchable rows respect the minimum floor and split evenly
//! - inserting then removing a pane restores the original adjacency
//! - silos built along one axis never share a pane
//!
//! Run:
//!   cargo test -p dockweave-layout --test proptest_graph_invariants

use dockweave_layout::{Axis, DockingPanel, PaneId, PaneProps, Side, Size};
use proptest::prelude::*;

const TOLERANCE: f64 = 0.1;

// ============================================================================
// Generators
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    /// Split the pane at this index (modulo pane count) on this side.
    Insert { target: usize, side: usize },
    /// Remove the pane at this index, unless it is the last one.
    Remove { target: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<usize>(), 0usize..4).prop_map(|(target, side)| Op::Insert { target, side }),
        1 => any::<usize>().prop_map(|target| Op::Remove { target }),
    ]
}

fn splits_strategy(max: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((any::<usize>(), 0usize..4), 0..max)
}

// ============================================================================
// Helpers
// ============================================================================

fn guillotine(splits: &[(usize, usize)]) -> (DockingPanel, Vec<PaneId>) {
    let mut panel = DockingPanel::new();
    let mut ids = vec![panel.add_pane(PaneProps::new("root"))];
    for (n, &(target, side)) in splits.iter().enumerate() {
        let reference = ids[target % ids.len()];
        let id = panel.add_pane(PaneProps::new(format!("p{n}")));
        panel
            .insert_relative(id, reference, Side::ALL[side])
            .expect("split");
        ids.push(id);
    }
    (panel, ids)
}

fn adjacency(panel: &DockingPanel) -> Vec<(PaneId, Side, Vec<PaneId>)> {
    let mut all = Vec::new();
    for &id in panel.ids() {
        for side in Side::ALL {
            all.push((id, side, panel.graph().physical_neighbors(id, side).to_vec()));
        }
    }
    all
}

fn assert_symmetric(panel: &DockingPanel) -> Result<(), TestCaseError> {
    for &id in panel.ids() {
        for side in Side::ALL {
            for &peer in panel.graph().physical_neighbors(id, side) {
                prop_assert!(
                    panel.graph().physical_neighbors(peer, side.opposite()).contains(&id),
                    "{id} lists {peer} on {side} but not the reverse"
                );
                prop_assert_ne!(peer, id);
            }
        }
    }
    Ok(())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn adjacency_stays_symmetric(ops in prop::collection::vec(op_strategy(), 1..24)) {
        let mut panel = DockingPanel::new();
        let mut ids = vec![panel.add_pane(PaneProps::new("root"))];
        for op in ops {
            match op {
                Op::Insert { target, side } => {
                    let reference = ids[target % ids.len()];
                    let id = panel.add_pane(PaneProps::new("p"));
                    panel.insert_relative(id, reference, Side::ALL[side]).expect("insert");
                    ids.push(id);
                }
                Op::Remove { target } => {
                    if ids.len() > 1 {
                        let id = ids.remove(target % ids.len());
                        panel.remove_pane(id).expect("remove");
                    }
                }
            }
            assert_symmetric(&panel)?;
            prop_assert_eq!(panel.len(), ids.len());
        }
    }

    #[test]
    fn logical_neighbors_skip_collapsed_pane(
        splits in splits_strategy(8),
        victim in any::<usize>(),
    ) {
        let (mut panel, ids) = guillotine(&splits);
        prop_assume!(ids.len() > 1);
        let victim = ids[victim % ids.len()];
        panel.collapse(victim, Side::Bottom).expect("collapse");

        for &id in &ids {
            if id == victim {
                continue;
            }
            for side in Side::ALL {
                let logical = panel.logical_neighbors(id, side).expect("neighbors");
                prop_assert!(!logical.contains(&victim), "{id}/{side} still sees {victim}");
            }
        }
    }

    #[test]
    fn stretchable_row_respects_floor(count in 1usize..7, extra in 0.0f64..600.0, height in 75.0f64..500.0) {
        let mut panel = DockingPanel::new();
        let mut ids: Vec<PaneId> = Vec::new();
        for _ in 0..count {
            let id = panel.add_pane(PaneProps::new("p"));
            if let Some(&prev) = ids.last() {
                panel.insert_to_right_of(id, prev).expect("insert");
            }
            ids.push(id);
        }
        let width = 75.0 * count as f64 + extra;
        panel.arrange(Size::new(width, height));

        let share = width / count as f64;
        let mut covered = 0.0;
        for &id in &ids {
            let rect = panel.rect(id).expect("rect");
            prop_assert!(rect.width >= 75.0 - TOLERANCE);
            prop_assert!((rect.width - share).abs() <= TOLERANCE);
            prop_assert!((rect.height - height).abs() <= TOLERANCE);
            prop_assert!((rect.x - covered).abs() <= TOLERANCE);
            covered += rect.width;
        }
        prop_assert!((covered - width).abs() <= TOLERANCE);
    }

    #[test]
    fn overflowing_column_keeps_effective_floor(count in 2usize..7, height in 40.0f64..140.0) {
        let mut panel = DockingPanel::new();
        let mut ids: Vec<PaneId> = Vec::new();
        for _ in 0..count {
            let id = panel.add_pane(PaneProps::new("p"));
            if let Some(&prev) = ids.last() {
                panel.insert_below(id, prev).expect("insert");
            }
            ids.push(id);
        }
        let floor = panel.effective_minimum(Size::new(200.0, height)).height;
        prop_assert!(floor <= 75.0);
        panel.arrange(Size::new(200.0, height));
        for &id in &ids {
            let rect = panel.rect(id).expect("rect");
            prop_assert!(rect.height >= floor - TOLERANCE);
        }
    }

    #[test]
    fn insert_then_remove_round_trips(
        count in 1usize..6,
        vertical in any::<bool>(),
        target in any::<usize>(),
        side in 0usize..4,
    ) {
        let mut panel = DockingPanel::new();
        let mut ids: Vec<PaneId> = Vec::new();
        for _ in 0..count {
            let id = panel.add_pane(PaneProps::new("p"));
            if let Some(&prev) = ids.last() {
                let grow = if vertical { Side::Bottom } else { Side::Right };
                panel.insert_relative(id, prev, grow).expect("insert");
            }
            ids.push(id);
        }
        let before = adjacency(&panel);

        let reference = ids[target % ids.len()];
        let extra = panel.add_pane(PaneProps::new("extra"));
        panel.insert_relative(extra, reference, Side::ALL[side]).expect("insert");
        panel.remove_pane(extra).expect("remove");

        prop_assert_eq!(adjacency(&panel), before);
    }

    #[test]
    fn silos_are_disjoint(splits in splits_strategy(8)) {
        let (mut panel, _) = guillotine(&splits);
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let silos = panel.silos(axis).to_vec();
            for (i, first) in silos.iter().enumerate() {
                prop_assert!(!first.is_empty());
                for second in &silos[i + 1..] {
                    for member in first.iter() {
                        prop_assert!(
                            !second.contains(member),
                            "{member} in two {axis:?} silos"
                        );
                    }
                }
            }
        }
    }
}

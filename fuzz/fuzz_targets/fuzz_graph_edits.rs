#![no_main]

use arbitrary::Arbitrary;
use dockweave_layout::{DockingPanel, PaneId, PaneProps, Side};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Edit {
    Insert { target: u8, side: u8 },
    DockAtEdge { side: u8 },
    Remove { target: u8 },
    Splitter { target: u8, side: u8, delta: i8 },
}

fn side(raw: u8) -> Side {
    Side::ALL[usize::from(raw % 4)]
}

fn pick(ids: &[PaneId], raw: u8) -> PaneId {
    ids[usize::from(raw) % ids.len()]
}

fuzz_target!(|edits: Vec<Edit>| {
    let mut panel = DockingPanel::new();
    let mut ids = vec![panel.add_pane(PaneProps::new("root"))];

    for edit in edits.into_iter().take(64) {
        match edit {
            Edit::Insert { target, side: raw } => {
                let reference = pick(&ids, target);
                let id = panel.add_pane(PaneProps::new("pane"));
                panel.insert_relative(id, reference, side(raw)).expect("insert next to known pane");
                ids.push(id);
            }
            Edit::DockAtEdge { side: raw } => {
                let id = panel.add_pane(PaneProps::new("edge").docked(side(raw)));
                ids.push(id);
            }
            Edit::Remove { target } => {
                if ids.len() > 1 {
                    let id = ids.remove(usize::from(target) % ids.len());
                    panel.remove_pane(id).expect("remove known pane");
                }
            }
            Edit::Splitter { target, side: raw, delta } => {
                let id = pick(&ids, target);
                panel.splitter_moved(id, side(raw), f64::from(delta)).expect("known pane");
            }
        }

        // Physical adjacency stays symmetric and self-free.
        for &id in panel.ids() {
            for s in Side::ALL {
                for &peer in panel.graph().physical_neighbors(id, s) {
                    assert_ne!(peer, id);
                    assert!(panel.graph().physical_neighbors(peer, s.opposite()).contains(&id));
                }
            }
        }
    }
});

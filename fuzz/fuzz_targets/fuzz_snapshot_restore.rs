#![no_main]

use dockweave_layout::{DockConfig, DockSite, DockSnapshot, FromRecords, Side};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(snapshot) = DockSnapshot::from_json(text) else {
        return;
    };

    // A restored graph is symmetric and self-free.
    if let Ok(site) = DockSite::restore(&snapshot, DockConfig::default(), &mut FromRecords) {
        let root = site.root();
        assert_eq!(root.len(), snapshot.collections.len());
        assert_eq!(site.floating().len(), snapshot.floating.len());
        for &id in root.ids() {
            for side in Side::ALL {
                for &peer in root.graph().physical_neighbors(id, side) {
                    assert_ne!(peer, id);
                    assert!(root.graph().physical_neighbors(peer, side.opposite()).contains(&id));
                }
            }
        }
    }

    // Re-serializing a parsed snapshot must succeed.
    let json = snapshot.to_json().expect("serialize parsed snapshot");
    let _ = DockSnapshot::from_json(&json);
});

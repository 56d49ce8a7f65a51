#![no_main]

use dockweave_layout::DockConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Anything the loaders accept must also pass validation.
    if let Ok(config) = DockConfig::from_toml_str(text) {
        assert!(config.validate().is_empty(), "accepted invalid TOML config");
    }
    if let Ok(config) = DockConfig::from_json_str(text) {
        assert!(config.validate().is_empty(), "accepted invalid JSON config");
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use vitrine_core::GalleryConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = GalleryConfig::from_json(json) {
        // Anything accepted must also pass validation and yield a sane threshold.
        assert!(config.validate().is_ok());
        let threshold = config.swipe_threshold(1024.0);
        assert!(threshold.is_finite() && threshold >= 0.0);
    }
});

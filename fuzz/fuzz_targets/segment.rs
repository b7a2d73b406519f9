#![no_main]

use libfuzzer_sys::fuzz_target;
use md_slides::render::render_minimal;
use md_slides::{EffectiveConfig, SettingsLayer, merge_with_front_matter, segment_document};

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let seg = segment_document(&input);
    assert!(!seg.spans.is_empty());
    for span in &seg.spans {
        assert_eq!(&input[span.start..span.end], span.text);
        let _ = render_minimal(&span.text);
    }
    let _ = merge_with_front_matter(
        &EffectiveConfig::default(),
        &SettingsLayer::default(),
        seg.front_matter.as_ref().map(|fm| fm.raw.as_str()),
    );
});

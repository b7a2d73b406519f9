#![no_main]

use libfuzzer_sys::fuzz_target;
use md_slides::{Session, SettingsLayer};

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let mut mid = input.len() / 2;
    while !input.is_char_boundary(mid) {
        mid -= 1;
    }
    let (first, second) = input.split_at(mid);
    let mut session = Session::default();
    let settings = SettingsLayer::default();
    session.edit(first, &settings);
    session.next();
    session.edit(second, &settings);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.rendered().len(), snapshot.slide_count());
    assert!(snapshot.navigation().current_index() < snapshot.slide_count());
});

// Example: minimal usage and scroll-to helper.
use listwindow::{Align, EngineOptions, ScrollLocation, WindowEngine};

fn main() {
    let mut e = WindowEngine::new(EngineOptions::new(24).with_overscan(48));
    e.set_viewport_size(480);
    e.set_total_count(1_000_000);
    e.set_scroll_offset(123_456).expect("engine is ready");

    let items = e.items();
    println!("total_height={}", e.total_height());
    println!("range={:?}", e.current_range());
    println!("first_rendered={:?}", items.first());

    let target = e
        .scroll_to_index(ScrollLocation::new(999_999).with_align(Align::End))
        .expect("engine is ready");
    println!(
        "after scroll_to_index: offset={} at_bottom={}",
        target.offset,
        e.is_at_bottom()
    );
}

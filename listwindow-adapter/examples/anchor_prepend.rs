use listwindow::EngineOptions;
use listwindow_adapter::Controller;

fn main() {
    // Example: preserve visual scroll position across "prepend" (chat/timeline load older messages).
    //
    // Two flows are shown:
    // 1) `prepend_items`: the engine learns about the new items and compensates on the next frame
    // 2) anchors: capture (index + position) before a data change, re-apply with an index shift
    let mut c = Controller::new(EngineOptions::new(24));
    c.on_viewport_size(480);
    c.engine_mut().set_total_count(200);
    c.on_scroll(1210, 0).expect("engine is ready");

    println!(
        "before prepend: off={} range={:?}",
        c.engine().scroll_offset(),
        c.engine().current_range()
    );

    c.prepend_items(50).expect("engine is ready");
    if let Some(offset) = c.tick(16) {
        println!("frame 1: scroll container -> {offset}");
    }
    println!(
        "after prepend: off={} range={:?}",
        c.engine().scroll_offset(),
        c.engine().current_range()
    );

    let anchor = c
        .capture_first_visible_anchor()
        .expect("scrolled range must not be empty");
    println!("anchor={anchor:?}");

    // The dataset was replaced out of band: 10 more items in front, count adjusted directly.
    let count = c.engine().total_count();
    c.engine_mut().set_total_count(count + 10);
    let ok = c.apply_anchor(&anchor, 10).expect("engine is ready");
    println!(
        "after anchor: ok={ok} off={} range={:?}",
        c.engine().scroll_offset(),
        c.engine().current_range()
    );
}

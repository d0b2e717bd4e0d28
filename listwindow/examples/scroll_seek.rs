// Example: placeholders while the user drags the scrollbar.
use listwindow::{EngineOptions, ScrollSeekConfig, WindowEngine};

fn main() {
    let options = EngineOptions::new(32).with_scroll_seek(Some(ScrollSeekConfig::threshold(
        2_000, // px/s
        120,
    )));
    let mut e = WindowEngine::new(options);
    e.set_viewport_size(640);
    e.set_total_count(100_000);
    e.set_on_scrolling_change(Some(|s: &bool| println!("is_scrolling -> {s}")));

    let mut now = 0u64;
    for step in 0..10u64 {
        now += 16;
        e.apply_scroll_event(step * step * 4_000, now)
            .expect("engine is ready");
        println!(
            "t={now} v={}px/s phase={:?} placeholder={}",
            e.scroll_velocity(),
            e.phase(),
            e.window().placeholder
        );
    }

    for _ in 0..20 {
        now += 16;
        e.tick(now);
    }
    println!("settled: phase={:?} window={:?}", e.phase(), e.window());
}

// Example: estimates first, real sizes as items get laid out.
use listwindow::{EngineOptions, WindowEngine};

fn main() {
    let mut e = WindowEngine::new(EngineOptions::new(40));
    e.set_viewport_size(600);
    e.set_total_count(10_000);
    e.set_on_total_height_change(Some(|h: &u64| println!("total_height -> {h}")));

    // A real adapter measures what it rendered; here every third row wraps to two lines.
    let target = e.scroll_to_index(500).expect("engine is ready");
    println!("provisional target: {target:?}");

    for round in 0..3 {
        let range = e.current_range().expect("list is not empty");
        let sizes: Vec<(usize, u32)> = range
            .iter()
            .map(|i| (i, if i % 3 == 0 { 80 } else { 40 }))
            .collect();
        let changed = e.measure_many(sizes).expect("engine is ready");
        println!(
            "round {round}: measured {changed} rows, offset={} range={:?}",
            e.scroll_offset(),
            e.current_range()
        );
    }

    let confirmed = e.confirm_scroll(target.ticket).expect("engine is ready");
    println!("confirmed: {confirmed:?}");
    println!(
        "runs={} measured={}",
        e.size_model().run_count(),
        e.size_model().measured_count()
    );
}

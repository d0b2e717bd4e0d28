use crate::*;

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

fn expected_offset(sizes: &[u32], index: usize) -> u64 {
    sizes[..index].iter().map(|&s| s as u64).sum()
}

fn engine(count: usize, size: u32, viewport: u32) -> WindowEngine {
    let mut e = WindowEngine::new(EngineOptions::new(size));
    e.set_viewport_size(viewport);
    e.set_total_count(count);
    e
}

fn counter() -> (Arc<AtomicUsize>, impl Fn(&Window) + Send + Sync + 'static) {
    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);
    (hits, move |_: &Window| {
        h.fetch_add(1, Ordering::Relaxed);
    })
}

#[test]
fn first_window_covers_viewport_exactly() {
    let e = engine(1000, 50, 500);
    assert_eq!(e.phase(), EnginePhase::Ready);
    assert_eq!(e.current_range(), Some(ListRange::new(0, 9)));
    assert_eq!(e.total_height(), 50_000);
    assert!(!e.is_at_bottom());
}

#[test]
fn scrolled_window_starts_at_covering_item() {
    let mut e = engine(1000, 50, 500);
    e.set_scroll_offset(245).unwrap();
    assert_eq!(e.index_at_offset(245), Some(4));
    let range = e.current_range().unwrap();
    assert_eq!(range.start_index, 4);
    assert_eq!(range.end_index, 14);
}

#[test]
fn prepend_shifts_window_and_compensates_offset() {
    let mut e = engine(1000, 50, 300);
    e.set_scroll_offset(200).unwrap();
    assert_eq!(e.current_range(), Some(ListRange::new(4, 9)));

    e.adjust_for_prepend(20).unwrap();
    assert_eq!(e.total_count(), 1020);
    assert_eq!(e.current_range(), Some(ListRange::new(24, 29)));
    assert_eq!(e.scroll_offset(), 1200);

    let target = e.scroll_target().unwrap();
    assert_eq!(target.offset, 1200);
    assert_eq!(target.location, None);
    assert!(!target.provisional);
}

#[test]
fn prepend_keeps_measured_sizes_attached_to_items() {
    let mut e = engine(100, 50, 300);
    e.measure_item(3, 80).unwrap();
    e.adjust_for_prepend(5).unwrap();
    assert_eq!(e.item_size(8), Some(80));
    assert!(e.size_model().is_measured(8));
    assert!(!e.size_model().is_measured(3));
}

#[test]
fn empty_list_is_at_bottom() {
    let e = engine(0, 50, 500);
    assert_eq!(e.phase(), EnginePhase::Ready);
    assert_eq!(e.current_range(), None);
    assert!(e.window().is_empty());
    assert_eq!(e.total_height(), 0);
    assert!(e.is_at_bottom());
    assert!(e.items().is_empty());
}

#[test]
fn idle_engine_rejects_list_operations() {
    let mut e = WindowEngine::new(EngineOptions::new(20));
    assert_eq!(e.phase(), EnginePhase::Idle);
    assert_eq!(e.measure_item(0, 10), Err(EngineError::NotReady));
    assert_eq!(e.set_scroll_offset(10), Err(EngineError::NotReady));
    assert_eq!(e.apply_scroll_event(10, 0), Err(EngineError::NotReady));
    assert_eq!(e.scroll_to_index(3), Err(EngineError::NotReady));
    assert_eq!(e.adjust_for_prepend(3), Err(EngineError::NotReady));
    assert_eq!(e.confirm_scroll(1), Err(EngineError::NotReady));

    // Configuration is accepted while idle.
    e.set_viewport_size(100);
    e.set_overscan(10, 10);
    assert!(e.window().is_empty());

    e.set_total_count(10);
    assert!(e.is_ready());
    assert_eq!(e.current_range(), Some(ListRange::new(0, 5)));
}

#[test]
fn negative_total_count_is_rejected() {
    let mut e = engine(10, 20, 100);
    assert_eq!(e.try_set_total_count(-1), Err(EngineError::InvalidCount(-1)));
    assert_eq!(e.total_count(), 10);
    e.try_set_total_count(3).unwrap();
    assert_eq!(e.total_count(), 3);
    assert_eq!(e.current_range(), Some(ListRange::new(0, 2)));
}

#[test]
fn compute_range_stays_within_bounds() {
    let mut rng = Lcg::new(0xC0FFEE);
    for _ in 0..300 {
        let count = rng.gen_range_usize(0, 400);
        let mut sizes = SizeModel::new(rng.gen_range_u32(1, 60));
        sizes.set_len(count);
        for _ in 0..rng.gen_range_usize(0, 40) {
            if count > 0 {
                let i = rng.gen_range_usize(0, count);
                sizes.record_size(i, rng.gen_range_u32(0, 200));
            }
        }
        let input = RangeInput {
            scroll_offset: rng.gen_range_u64(0, sizes.total_height() + 500),
            viewport_size: rng.gen_range_u32(0, 800),
            overscan_top: rng.gen_range_u32(0, 200),
            overscan_bottom: rng.gen_range_u32(0, 200),
            top_item_count: if rng.gen_bool() {
                rng.gen_range_usize(0, 5)
            } else {
                0
            },
            initial_item_count: rng.gen_range_usize(0, 10),
        };
        match compute_range(&sizes, &input) {
            None => assert!(count == 0 || input.top_item_count >= count),
            Some(range) => {
                assert!(range.start_index <= range.end_index);
                assert!(range.end_index < count);
                assert!(range.start_index >= input.top_item_count.min(count));
            }
        }
    }
}

#[test]
fn index_at_inverts_offset_of_across_measurements() {
    let mut rng = Lcg::new(7);
    let count = 300;
    let mut expected = vec![25u32; count];
    let mut sizes = SizeModel::new(25);
    sizes.set_len(count);

    for round in 0..60 {
        let i = rng.gen_range_usize(0, count);
        let size = rng.gen_range_u32(1, 120);
        sizes.record_size(i, size);
        expected[i] = size;

        if round % 10 == 0 {
            for i in 0..count {
                let offset = sizes.offset_of(i);
                assert_eq!(offset, expected_offset(&expected, i));
                assert_eq!(sizes.index_at(offset), Some(i));
                assert_eq!(sizes.size_of(i), Some(expected[i]));
            }
        }
    }
    assert_eq!(sizes.total_height(), expected_offset(&expected, count));
    assert_eq!(sizes.offset_of(count + 10), sizes.total_height());
    assert_eq!(sizes.index_at(u64::MAX), Some(count - 1));
}

#[test]
fn size_model_merges_identical_runs() {
    let mut sizes = SizeModel::new(40);
    sizes.set_len(1_000_000);
    assert_eq!(sizes.run_count(), 1);
    assert_eq!(sizes.total_height(), 40_000_000);

    sizes.record_size(500, 90);
    assert_eq!(sizes.run_count(), 3);
    sizes.record_size(499, 90);
    sizes.record_size(501, 90);
    assert_eq!(sizes.run_count(), 3);
    assert_eq!(
        sizes.runs()[1],
        SizeRun {
            start_index: 499,
            len: 3,
            size: 90,
            measured: true,
        }
    );
    assert_eq!(sizes.measured_count(), 3);
    assert_eq!(sizes.total_height(), 40_000_000 + 3 * 50);
}

#[test]
fn size_model_reports_measurement_outcome() {
    let mut sizes = SizeModel::new(30);
    sizes.set_len(10);
    assert_eq!(sizes.record_size(10, 5), SizeChange::Ignored);
    assert_eq!(
        sizes.record_size(2, 45),
        SizeChange::Recorded { previous: 30 }
    );
    assert_eq!(sizes.record_size(2, 45), SizeChange::Unchanged);
    let change = sizes.record_size(2, 20);
    assert_eq!(change, SizeChange::Replaced { previous: 45 });
    assert_eq!(change.delta(20), -25);
    assert_eq!(sizes.total_height(), 9 * 30 + 20);
}

#[test]
fn size_model_evicts_oldest_measurements() {
    let mut sizes = SizeModel::new(10);
    sizes.set_len(100);
    sizes.set_max_measured(Some(2));
    sizes.record_size(5, 50);
    sizes.record_size(6, 60);
    sizes.record_size(7, 70);
    assert_eq!(sizes.measured_count(), 2);
    assert!(!sizes.is_measured(5));
    assert_eq!(sizes.size_of(5), Some(10));
    assert_eq!(sizes.size_of(7), Some(70));

    sizes.set_max_measured(Some(1));
    assert!(!sizes.is_measured(6));
    assert!(sizes.is_measured(7));
}

#[test]
fn size_model_resize_and_default_change() {
    let mut sizes = SizeModel::new(0);
    assert_eq!(sizes.default_size(), 1);
    sizes.set_default_size(10);
    sizes.set_len(20);
    sizes.record_size(15, 30);
    sizes.set_len(10);
    assert_eq!(sizes.len(), 10);
    assert_eq!(sizes.measured_count(), 0);
    sizes.set_len(20);
    assert!(!sizes.is_measured(15));
    assert_eq!(sizes.total_height(), 200);

    sizes.record_size(0, 3);
    assert!(sizes.set_default_size(5));
    assert_eq!(sizes.total_height(), 3 + 19 * 5);
    sizes.reset();
    assert_eq!(sizes.total_height(), 100);
    assert_eq!(sizes.run_count(), 1);
}

#[test]
fn prepend_then_scroll_to_shifted_index_keeps_anchor() {
    let mut rng = Lcg::new(42);
    for _ in 0..40 {
        let mut e = engine(10_000, 40, 600);
        for _ in 0..200 {
            let i = rng.gen_range_usize(0, 10_000);
            e.measure_item(i, rng.gen_range_u32(10, 120)).unwrap();
        }
        let s = rng.gen_range_u64(0, e.max_scroll_offset() / 2);
        e.set_scroll_offset(s).unwrap();
        let anchor = e.index_at_offset(s).unwrap();
        let rel = e.item_offset(anchor).unwrap() as i64 - s as i64;

        let k = rng.gen_range_usize(0, 500);
        e.adjust_for_prepend(k).unwrap();
        let rel_after = e.item_offset(anchor + k).unwrap() as i64 - e.scroll_offset() as i64;
        assert_eq!(rel_after, rel);

        e.scroll_to_index(anchor + k).unwrap();
        assert_eq!(e.scroll_offset(), e.item_offset(anchor + k).unwrap());
        assert_eq!(e.current_range().unwrap().start_index, anchor + k);
    }
}

#[test]
fn follow_output_keeps_last_item_in_window() {
    let mut rng = Lcg::new(3);
    let mut e = WindowEngine::new(EngineOptions::new(30).with_follow_output(true));
    e.set_viewport_size(300);
    e.set_total_count(5);
    assert!(e.is_at_bottom());

    let mut count = 5;
    for _ in 0..50 {
        count += rng.gen_range_usize(1, 50);
        e.set_total_count(count);
        assert_eq!(e.current_range().unwrap().end_index, count - 1);
        assert!(e.is_at_bottom());

        let range = e.current_range().unwrap();
        let batch: Vec<(usize, u32)> = range
            .iter()
            .map(|i| (i, rng.gen_range_u32(10, 90)))
            .collect();
        e.measure_many(batch).unwrap();
        assert!(e.is_at_bottom());
    }
}

#[test]
fn follow_output_ignores_growth_when_scrolled_up() {
    let mut e = WindowEngine::new(EngineOptions::new(30).with_follow_output(true));
    e.set_viewport_size(300);
    e.set_total_count(100);
    e.set_scroll_offset(0).unwrap();
    e.set_total_count(150);
    assert_eq!(e.scroll_offset(), 0);
    assert_eq!(e.current_range(), Some(ListRange::new(0, 9)));
    assert_eq!(e.pending_scroll(), None);
}

#[test]
fn scroll_seek_renders_placeholders_until_debounce() {
    let options = EngineOptions::new(50)
        .with_scroll_seek(Some(ScrollSeekConfig::threshold(1000, 100)))
        .with_is_scrolling_reset_delay_ms(150);
    let mut e = WindowEngine::new(options);
    e.set_viewport_size(500);
    e.set_total_count(10_000);

    e.apply_scroll_event(0, 0).unwrap();
    assert!(e.is_scrolling());
    assert!(!e.window().placeholder);

    e.apply_scroll_event(5000, 10).unwrap();
    assert_eq!(e.scroll_velocity(), 500_000);
    assert_eq!(e.phase(), EnginePhase::Seeking);
    assert!(e.window().placeholder);
    let items = e.items();
    assert!(!items.is_empty());
    assert!(items.iter().all(|item| item.placeholder));

    e.tick(50);
    assert!(e.window().placeholder);

    e.tick(200);
    assert_eq!(e.seek_phase(), SeekPhase::Idle);
    assert_eq!(e.phase(), EnginePhase::Ready);
    assert!(!e.is_scrolling());
    assert!(e.items().iter().all(|item| !item.placeholder));
}

#[test]
fn slow_samples_exit_seek_after_debounce() {
    let mut seek = ScrollSeekDetector::new(Some(ScrollSeekConfig::threshold(1000, 100)), 150);
    seek.sample(0, 0);
    assert_eq!(seek.sample(1000, 10), SeekPhase::Seeking);
    // Slow, but the debounce has not elapsed yet.
    assert_eq!(seek.sample(1001, 20), SeekPhase::Seeking);
    assert_eq!(seek.sample(1002, 80), SeekPhase::Seeking);
    // Fast again: the calm period restarts.
    assert_eq!(seek.sample(3000, 90), SeekPhase::Seeking);
    assert_eq!(seek.sample(3001, 100), SeekPhase::Seeking);
    assert_eq!(seek.sample(3002, 210), SeekPhase::Scrolling);
    assert_eq!(seek.tick(400), SeekPhase::Idle);
    assert_eq!(seek.velocity(), 0);
}

#[test]
fn scroll_to_unmeasured_index_converges_as_sizes_arrive() {
    let mut e = engine(100, 50, 200);
    let target = e.scroll_to_index(50).unwrap();
    assert_eq!(target.offset, 2500);
    assert!(target.provisional);
    assert_eq!(target.location, Some(ScrollLocation::new(50)));

    for i in 0..10 {
        e.measure_item(i, 100).unwrap();
    }
    assert_eq!(e.scroll_offset(), 3000);
    assert_eq!(e.scroll_target().unwrap().ticket, target.ticket);
    assert_eq!(e.scroll_target().unwrap().offset, 3000);

    // Still unmeasured: confirming keeps the request pending.
    let confirmed = e.confirm_scroll(target.ticket).unwrap().unwrap();
    assert!(confirmed.provisional);
    assert!(e.pending_scroll().is_some());

    e.measure_item(50, 70).unwrap();
    let confirmed = e.confirm_scroll(target.ticket).unwrap().unwrap();
    assert!(!confirmed.provisional);
    assert_eq!(confirmed.offset, 3000);
    assert_eq!(e.pending_scroll(), None);
    assert_eq!(e.confirm_scroll(target.ticket), Ok(None));
}

#[test]
fn newer_scroll_request_supersedes_older_one() {
    let mut e = engine(100, 50, 200);
    let first = e.scroll_to_index(10).unwrap();
    let second = e.scroll_to_index(20).unwrap();
    assert_ne!(first.ticket, second.ticket);
    assert_eq!(e.confirm_scroll(first.ticket), Ok(None));
    assert_eq!(e.pending_scroll().unwrap().ticket, second.ticket);
    assert_eq!(e.scroll_offset(), 1000);
}

#[test]
fn user_scroll_cancels_pending_request() {
    let mut e = engine(100, 50, 200);
    let target = e.scroll_to_index(50).unwrap();
    e.apply_scroll_event(target.offset, 0).unwrap();
    assert!(e.pending_scroll().is_some());
    e.apply_scroll_event(100, 16).unwrap();
    assert_eq!(e.pending_scroll(), None);
    e.measure_item(0, 300).unwrap();
    assert_eq!(e.scroll_offset(), 100);
}

#[test]
fn late_report_of_earlier_target_keeps_corrected_request() {
    let mut e = engine(100, 50, 200);
    let target = e.scroll_to_index(50).unwrap();
    assert_eq!(target.offset, 2500);
    for i in 0..5 {
        e.measure_item(i, 100).unwrap();
    }
    assert_eq!(e.scroll_offset(), 2750);

    // The container reports the first offset after the request was corrected.
    e.apply_scroll_event(2500, 16).unwrap();
    assert_eq!(e.pending_scroll().unwrap().ticket, target.ticket);
    assert_eq!(e.scroll_offset(), 2750);

    e.apply_scroll_event(2750, 32).unwrap();
    e.measure_item(50, 60).unwrap();
    let confirmed = e.confirm_scroll(target.ticket).unwrap().unwrap();
    assert_eq!(confirmed.offset, 2750);
    assert_eq!(e.item_offset(50), Some(2750));
    assert_eq!(e.pending_scroll(), None);
}

#[test]
fn programmatic_jump_does_not_enter_seek() {
    let options = EngineOptions::new(50)
        .with_scroll_seek(Some(ScrollSeekConfig::threshold(5000, 100)));
    let mut e = WindowEngine::new(options);
    e.set_viewport_size(500);
    e.set_total_count(10_000);

    e.apply_scroll_event(0, 0).unwrap();
    let target = e.scroll_to_index(2000).unwrap();
    assert_eq!(target.offset, 100_000);
    e.apply_scroll_event(100_000, 16).unwrap();
    assert_eq!(e.scroll_velocity(), 0);
    assert_ne!(e.phase(), EnginePhase::Seeking);
    assert!(!e.window().placeholder);

    // Velocity is measured again from the jump target.
    e.apply_scroll_event(100_100, 32).unwrap();
    assert_eq!(e.scroll_velocity(), 6250);
    assert_eq!(e.phase(), EnginePhase::Seeking);
}

#[test]
fn prepend_compensation_report_is_not_a_fast_scroll() {
    let options = EngineOptions::new(50)
        .with_scroll_seek(Some(ScrollSeekConfig::threshold(5000, 100)));
    let mut e = WindowEngine::new(options);
    e.set_viewport_size(500);
    e.set_total_count(1000);
    e.apply_scroll_event(200, 0).unwrap();

    e.adjust_for_prepend(100).unwrap();
    assert_eq!(e.scroll_offset(), 5200);
    e.apply_scroll_event(5200, 16).unwrap();
    assert!(!e.window().placeholder);
}

#[test]
fn scroll_to_index_on_empty_list_has_no_location() {
    let mut e = engine(0, 50, 500);
    let target = e.scroll_to_index(5).unwrap();
    assert_eq!(target.location, None);
    assert_eq!(target.offset, 0);
    assert!(!target.provisional);
    assert_eq!(e.pending_scroll(), None);
    assert_eq!(e.scroll_target(), Some(target));
}

#[test]
fn scroll_to_index_clamps_and_aligns() {
    let mut e = engine(100, 50, 200);
    let t = e.scroll_to_index(500).unwrap();
    assert_eq!(t.location.unwrap().index, 99);
    assert_eq!(t.offset, 4800);

    let t = e
        .scroll_to_index(ScrollLocation::new(10).with_align(Align::End))
        .unwrap();
    assert_eq!(t.offset, 550 - 200);
    let t = e
        .scroll_to_index(ScrollLocation::new(10).with_align(Align::Center))
        .unwrap();
    assert_eq!(t.offset, 525 - 100);
    let t = e
        .scroll_to_index(ScrollLocation::new(1).with_align(Align::End))
        .unwrap();
    assert_eq!(t.offset, 0);
}

#[test]
fn prepend_shifts_pending_request() {
    let mut e = engine(100, 50, 200);
    let target = e.scroll_to_index(40).unwrap();
    e.adjust_for_prepend(10).unwrap();
    let pending = e.pending_scroll().unwrap();
    assert_eq!(pending.ticket, target.ticket);
    assert_eq!(pending.location.index, 50);
    assert_eq!(pending.offset, 2500);
    assert_eq!(e.scroll_offset(), 2500);
}

#[test]
fn pinned_items_stay_outside_scrolled_range() {
    let mut e = WindowEngine::new(EngineOptions::new(50).with_top_item_count(2));
    e.set_viewport_size(500);
    e.set_total_count(100);
    assert_eq!(e.current_range(), Some(ListRange::new(2, 9)));
    assert_eq!(e.window().bounds(), Some(ListRange::new(0, 9)));

    e.set_scroll_offset(1000).unwrap();
    let indexes: Vec<usize> = e.items().iter().map(|i| i.index).collect();
    assert_eq!(&indexes[..3], &[0, 1, 22]);

    let t = e.scroll_to_index(10).unwrap();
    assert_eq!(t.offset, 400);
    assert_eq!(e.current_range().unwrap().start_index, 10);

    e.set_top_item_count(200);
    assert_eq!(e.current_range(), None);
    assert_eq!(e.window().top_item_count, 100);
}

#[test]
fn fixed_item_size_ignores_measurements() {
    let mut e = WindowEngine::new(EngineOptions::fixed(20));
    e.set_viewport_size(100);
    e.set_total_count(50);
    assert_eq!(e.measure_item(3, 80), Ok(SizeChange::Ignored));
    assert_eq!(e.total_height(), 1000);
    let t = e.scroll_to_index(10).unwrap();
    assert!(!t.provisional);
}

#[test]
fn zero_viewport_renders_initial_items() {
    let mut e = WindowEngine::new(EngineOptions::new(50).with_initial_item_count(5));
    e.set_total_count(100);
    assert_eq!(e.current_range(), Some(ListRange::new(0, 4)));
    e.set_initial_item_count(0);
    assert_eq!(e.current_range(), Some(ListRange::new(0, 0)));
}

#[test]
fn initial_top_most_item_index_scrolls_on_first_count() {
    let options = EngineOptions::new(50).with_initial_top_most_item_index(Some(30));
    let mut e = WindowEngine::new(options);
    e.set_viewport_size(500);
    e.set_total_count(100);
    assert_eq!(e.scroll_offset(), 1500);
    assert_eq!(e.current_range().unwrap().start_index, 30);

    e.set_total_count(200);
    assert_eq!(e.scroll_offset(), 1500);
}

#[test]
fn offsets_past_the_end_clamp_to_last_viewport() {
    let mut e = engine(100, 50, 500);
    e.set_scroll_offset(1_000_000).unwrap();
    assert_eq!(e.current_range(), Some(ListRange::new(90, 99)));
    assert!(e.is_at_bottom());
}

#[test]
fn window_changes_are_published_once_per_change() {
    let (hits, cb) = counter();
    let mut e = WindowEngine::new(EngineOptions::new(50));
    e.set_on_window_change(Some(cb));
    e.set_viewport_size(500);
    assert_eq!(hits.load(Ordering::Relaxed), 0);

    e.set_total_count(100);
    assert_eq!(hits.load(Ordering::Relaxed), 1);
    e.set_scroll_offset(10).unwrap();
    assert_eq!(hits.load(Ordering::Relaxed), 2);
    e.set_scroll_offset(20).unwrap();
    assert_eq!(hits.load(Ordering::Relaxed), 2);

    e.set_on_window_change(None::<fn(&Window)>);
    e.set_scroll_offset(2000).unwrap();
    assert_eq!(hits.load(Ordering::Relaxed), 2);
}

#[test]
fn batch_update_publishes_once() {
    let (hits, cb) = counter();
    let heights = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&heights);
    let mut e = WindowEngine::new(EngineOptions::new(50));
    e.set_on_window_change(Some(cb));
    e.set_on_total_height_change(Some(move |_: &u64| {
        h.fetch_add(1, Ordering::Relaxed);
    }));

    e.batch_update(|e| {
        e.set_total_count(100);
        e.set_viewport_size(500);
        e.set_scroll_offset(100).unwrap();
        e.measure_item(3, 10).unwrap();
    });
    assert_eq!(hits.load(Ordering::Relaxed), 1);
    assert_eq!(heights.load(Ordering::Relaxed), 1);
    assert_eq!(e.current_range(), Some(ListRange::new(2, 12)));
}

#[test]
fn at_bottom_notifications_use_threshold() {
    let flips = Arc::new(AtomicUsize::new(0));
    let f = Arc::clone(&flips);
    let mut e = WindowEngine::new(EngineOptions::new(50).with_at_bottom_threshold(10));
    e.set_on_at_bottom_change(Some(move |_: &bool| {
        f.fetch_add(1, Ordering::Relaxed);
    }));
    e.set_viewport_size(500);
    e.set_total_count(100);
    assert!(!e.is_at_bottom());
    assert_eq!(flips.load(Ordering::Relaxed), 1);

    e.set_scroll_offset(4490).unwrap();
    assert!(e.is_at_bottom());
    e.set_scroll_offset(4489).unwrap();
    assert!(!e.is_at_bottom());
    assert_eq!(flips.load(Ordering::Relaxed), 3);
}

#[test]
fn end_reached_fires_once_per_last_index() {
    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);
    let mut e = WindowEngine::new(EngineOptions::new(50));
    e.set_on_end_reached(Some(move |index: &usize| {
        assert_eq!(*index, 19);
        h.fetch_add(1, Ordering::Relaxed);
    }));
    e.set_viewport_size(500);
    e.set_total_count(20);
    assert_eq!(hits.load(Ordering::Relaxed), 0);

    e.set_scroll_offset(500).unwrap();
    assert_eq!(hits.load(Ordering::Relaxed), 1);
    e.set_scroll_offset(490).unwrap();
    e.set_scroll_offset(500).unwrap();
    assert_eq!(hits.load(Ordering::Relaxed), 1);
}

#[test]
fn grouped_list_maps_indexes_and_sticks_headers() {
    let groups = GroupIndexMapper::new(vec![2usize, 0, 3]);
    assert_eq!(groups.total_len(), 8);
    assert_eq!(groups.total_items(), 5);
    assert_eq!(groups.flat_to_grouped(3), Some(GroupedIndex::Header { group: 1 }));
    assert_eq!(
        groups.flat_to_grouped(6),
        Some(GroupedIndex::Item {
            group: 2,
            index_in_group: 1,
            item: 3,
        })
    );
    assert_eq!(groups.item_to_flat(2), Some(5));
    assert_eq!(groups.item_to_flat(5), None);
    assert_eq!(groups.header_of(7), Some(4));
    assert_eq!(groups.flat_to_grouped(8), None);

    let options = EngineOptions::new(10).with_group_counts(Some(vec![2, 3]));
    let mut e = WindowEngine::new(options);
    e.set_viewport_size(20);
    assert_eq!(e.total_count(), 7);
    assert_eq!(e.window().sticky_header, None);

    e.set_scroll_offset(45).unwrap();
    assert_eq!(e.current_range(), Some(ListRange::new(4, 6)));
    assert_eq!(e.window().sticky_header, Some(3));
    let indexes: Vec<usize> = e.items().iter().map(|i| i.index).collect();
    assert_eq!(indexes, vec![3, 4, 5, 6]);
    assert_eq!(
        e.item(4).unwrap().group,
        Some(GroupedIndex::Item {
            group: 1,
            index_in_group: 0,
            item: 2,
        })
    );

    // The count follows the groups.
    e.set_total_count(100);
    assert_eq!(e.total_count(), 7);
    e.adjust_for_prepend(3).unwrap();
    assert_eq!(e.total_count(), 7);

    let t = e.scroll_to_group(1, Align::Start).unwrap();
    assert_eq!(t.location.unwrap().index, 3);
    let t = e.scroll_to_group_item(1, Align::Start).unwrap();
    assert_eq!(t.location.unwrap().index, 2);

    e.set_group_counts(Some(vec![1, 1, 1, 1]));
    assert_eq!(e.total_count(), 8);
}

#[test]
fn reset_measurements_falls_back_to_default() {
    let mut e = engine(100, 20, 100);
    e.measure_many([(0, 40), (1, 40), (2, 40)]).unwrap();
    assert_eq!(e.total_height(), 2060);
    e.reset_measurements();
    assert_eq!(e.total_height(), 2000);
    assert_eq!(e.size_model().measured_count(), 0);

    e.set_default_item_size(30);
    assert_eq!(e.total_height(), 3000);
}

#[test]
fn max_measured_items_bounds_engine_cache() {
    let mut e = WindowEngine::new(EngineOptions::new(20).with_max_measured_items(Some(3)));
    e.set_total_count(100);
    let changed = e
        .measure_many((0..10).map(|i| (i, 25)))
        .unwrap();
    assert_eq!(changed, 10);
    assert_eq!(e.size_model().measured_count(), 3);
    assert_eq!(e.total_height(), 97 * 20 + 3 * 25);
}

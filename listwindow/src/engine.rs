use alloc::collections::VecDeque;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::signal::{Signal, Subscriber};
use crate::{
    Align, EngineError, EngineOptions, EnginePhase, GroupIndexMapper, ListItem, ListRange,
    RangeInput, ScrollLocation, ScrollSeekConfig, ScrollSeekDetector, ScrollTarget, SeekPhase,
    SizeChange, SizeModel, Window, compute_range,
};

const MAX_ISSUED_OFFSETS: usize = 16;

/// A scroll-to-index request waiting for confirmation.
///
/// Requests are two-phase: [`WindowEngine::scroll_to_index`] resolves an offset from the current
/// size model (possibly from estimates), and [`WindowEngine::confirm_scroll`] re-resolves it once
/// the adapter has painted and measured the target. Only the latest request can be confirmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingScroll {
    pub ticket: u64,
    /// The requested location, with the index clamped into the list.
    pub location: ScrollLocation,
    pub offset: u64,
    pub provisional: bool,
}

impl PendingScroll {
    pub fn target(&self) -> ScrollTarget {
        ScrollTarget {
            ticket: self.ticket,
            offset: self.offset,
            location: Some(self.location),
            provisional: self.provisional,
        }
    }
}

/// A headless windowing engine for very large lists.
///
/// The engine owns the size model, the scroll state and the derived render window. It holds no
/// UI objects: your adapter drives it with viewport sizes, scroll events and item measurements,
/// and reads back the published outputs (window, total height, at-bottom, scrolling state and
/// scroll targets), either by polling or through change callbacks.
///
/// Until the first total count arrives the engine is idle, and operations that depend on the list
/// contents return [`EngineError::NotReady`].
pub struct WindowEngine {
    options: EngineOptions,
    sizes: SizeModel,
    groups: Option<GroupIndexMapper>,
    seek: ScrollSeekDetector,

    total_count: Option<usize>,
    viewport_size: u32,
    scroll_offset: u64,

    pending_scroll: Option<PendingScroll>,
    next_ticket: u64,
    // Offsets handed out as scroll targets that the container has not reported back yet,
    // oldest first.
    issued_offsets: VecDeque<u64>,

    window: Signal<Window>,
    total_height: Signal<u64>,
    at_bottom: Signal<bool>,
    is_scrolling: Signal<bool>,
    scroll_target: Signal<Option<ScrollTarget>>,
    end_reached: Option<usize>,
    on_end_reached: Option<Subscriber<usize>>,

    batch_depth: usize,
    refresh_pending: bool,
}

impl WindowEngine {
    pub fn new(options: EngineOptions) -> Self {
        vdebug!(
            default_item_size = options.default_item_size,
            fixed_item_size = options.fixed_item_size,
            top_item_count = options.top_item_count,
            "WindowEngine::new"
        );
        let mut sizes = SizeModel::new(options.default_item_size);
        sizes.set_max_measured(options.max_measured_items);
        let seek = ScrollSeekDetector::new(
            options.scroll_seek.clone(),
            options.is_scrolling_reset_delay_ms,
        );
        let groups = options
            .group_counts
            .as_ref()
            .map(|counts| GroupIndexMapper::new(counts.clone()));

        let mut e = Self {
            options,
            sizes,
            groups,
            seek,
            total_count: None,
            viewport_size: 0,
            scroll_offset: 0,
            pending_scroll: None,
            next_ticket: 0,
            issued_offsets: VecDeque::new(),
            window: Signal::new(Window::default()),
            total_height: Signal::new(0),
            at_bottom: Signal::new(true),
            is_scrolling: Signal::new(false),
            scroll_target: Signal::new(None),
            end_reached: None,
            on_end_reached: None,
            batch_depth: 0,
            refresh_pending: false,
        };
        if let Some(len) = e.groups.as_ref().map(GroupIndexMapper::total_len) {
            e.apply_total_count(len);
        }
        e.refresh();
        e
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn phase(&self) -> EnginePhase {
        if self.total_count.is_none() {
            EnginePhase::Idle
        } else if self.seek.is_seeking() {
            EnginePhase::Seeking
        } else {
            EnginePhase::Ready
        }
    }

    pub fn is_ready(&self) -> bool {
        self.total_count.is_some()
    }

    fn ensure_ready(&self) -> Result<(), EngineError> {
        if self.total_count.is_none() {
            vdebug!("WindowEngine: rejecting operation while idle");
            return Err(EngineError::NotReady);
        }
        Ok(())
    }

    /// Batches multiple updates into a single round of change notifications.
    ///
    /// Every mutation inside `f` is applied in order; outputs are recomputed and published once
    /// when the outermost batch ends.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        self.batch_depth = self.batch_depth.saturating_add(1);
        f(self);
        debug_assert!(self.batch_depth > 0, "batch_depth underflow");
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth == 0 && core::mem::take(&mut self.refresh_pending) {
            self.publish();
        }
    }

    fn refresh(&mut self) {
        if self.batch_depth > 0 {
            self.refresh_pending = true;
            return;
        }
        self.publish();
    }

    fn publish(&mut self) {
        let window = self.compute_window();
        let total_height = self.sizes.total_height();
        let at_bottom = self.compute_at_bottom();
        let is_scrolling = self.seek.is_scrolling();

        self.total_height.publish(total_height);
        if self.window.publish(window) {
            vtrace!(window = ?window, "WindowEngine: window changed");
        }
        self.at_bottom.publish(at_bottom);
        self.is_scrolling.publish(is_scrolling);
        self.check_end_reached();
    }

    fn compute_window(&self) -> Window {
        let Some(count) = self.total_count else {
            return Window::default();
        };
        let range = compute_range(&self.sizes, &self.range_input());
        let sticky_header = match (&self.groups, range) {
            (Some(groups), Some(range)) => groups
                .header_of(range.start_index)
                .filter(|&header| header != range.start_index),
            _ => None,
        };
        Window {
            top_item_count: self.options.top_item_count.min(count),
            range,
            placeholder: self.seek.is_seeking() && range.is_some(),
            sticky_header,
        }
    }

    fn range_input(&self) -> RangeInput {
        RangeInput {
            scroll_offset: self.scroll_offset,
            viewport_size: self.viewport_size,
            overscan_top: self.options.overscan_top,
            overscan_bottom: self.options.overscan_bottom,
            top_item_count: self.options.top_item_count,
            initial_item_count: self.options.initial_item_count,
        }
    }

    fn compute_at_bottom(&self) -> bool {
        let bottom = self
            .scroll_offset
            .saturating_add(self.viewport_size as u64);
        bottom
            >= self
                .sizes
                .total_height()
                .saturating_sub(self.options.at_bottom_threshold)
    }

    fn check_end_reached(&mut self) {
        let count = self.total_count();
        let Some(bounds) = self.window.get().bounds() else {
            return;
        };
        let last = bounds.end_index;
        if last + 1 != count || self.end_reached == Some(last) {
            return;
        }
        vdebug!(index = last, "WindowEngine: end reached");
        self.end_reached = Some(last);
        if let Some(cb) = &self.on_end_reached {
            cb(&last);
        }
    }

    // --- Outputs ---------------------------------------------------------------------------

    /// The last published render window.
    pub fn window(&self) -> &Window {
        self.window.get()
    }

    /// The scrolled range of the last published window (pinned items excluded).
    pub fn current_range(&self) -> Option<ListRange> {
        self.window.get().range
    }

    pub fn total_count(&self) -> usize {
        self.total_count.unwrap_or(0)
    }

    pub fn total_height(&self) -> u64 {
        self.sizes.total_height()
    }

    pub fn is_at_bottom(&self) -> bool {
        *self.at_bottom.get()
    }

    pub fn is_scrolling(&self) -> bool {
        self.seek.is_scrolling()
    }

    pub fn seek_phase(&self) -> SeekPhase {
        self.seek.phase()
    }

    /// Last sampled scroll velocity, in pixels per second.
    pub fn scroll_velocity(&self) -> i64 {
        self.seek.velocity()
    }

    pub fn is_placeholder(&self, index: usize) -> bool {
        self.window.get().is_placeholder(index)
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn viewport_size(&self) -> u32 {
        self.viewport_size
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.sizes
            .total_height()
            .saturating_sub(self.viewport_size as u64)
    }

    pub fn pending_scroll(&self) -> Option<PendingScroll> {
        self.pending_scroll
    }

    /// The last published scroll target.
    pub fn scroll_target(&self) -> Option<ScrollTarget> {
        *self.scroll_target.get()
    }

    pub fn size_model(&self) -> &SizeModel {
        &self.sizes
    }

    pub fn groups(&self) -> Option<&GroupIndexMapper> {
        self.groups.as_ref()
    }

    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        self.sizes.index_at(offset)
    }

    pub fn item_offset(&self, index: usize) -> Option<u64> {
        (index < self.sizes.len()).then(|| self.sizes.offset_of(index))
    }

    pub fn item_size(&self, index: usize) -> Option<u32> {
        self.sizes.size_of(index)
    }

    pub fn item(&self, index: usize) -> Option<ListItem> {
        let size = self.sizes.size_of(index)?;
        Some(ListItem {
            index,
            offset: self.sizes.offset_of(index),
            size,
            measured: self.sizes.is_measured(index),
            placeholder: self.window.get().is_placeholder(index),
            group: self.groups.as_ref().and_then(|g| g.flat_to_grouped(index)),
        })
    }

    /// Iterates over the rendered items in ascending index order.
    pub fn for_each_item(&self, mut f: impl FnMut(ListItem)) {
        self.window.get().for_each_index(|index| {
            if let Some(item) = self.item(index) {
                f(item);
            }
        });
    }

    /// Collects the rendered items into `out` (clears `out` first).
    pub fn collect_items(&self, out: &mut Vec<ListItem>) {
        out.clear();
        self.for_each_item(|item| out.push(item));
    }

    pub fn items(&self) -> Vec<ListItem> {
        let mut out = Vec::new();
        self.collect_items(&mut out);
        out
    }

    // --- Subscriptions -----------------------------------------------------------------------

    pub fn set_on_window_change(&mut self, f: Option<impl Fn(&Window) + Send + Sync + 'static>) {
        self.window.subscribe(f.map(|f| Arc::new(f) as _));
    }

    pub fn set_on_total_height_change(
        &mut self,
        f: Option<impl Fn(&u64) + Send + Sync + 'static>,
    ) {
        self.total_height.subscribe(f.map(|f| Arc::new(f) as _));
    }

    pub fn set_on_at_bottom_change(&mut self, f: Option<impl Fn(&bool) + Send + Sync + 'static>) {
        self.at_bottom.subscribe(f.map(|f| Arc::new(f) as _));
    }

    pub fn set_on_scrolling_change(&mut self, f: Option<impl Fn(&bool) + Send + Sync + 'static>) {
        self.is_scrolling.subscribe(f.map(|f| Arc::new(f) as _));
    }

    /// Fired for every scroll offset the adapter must apply to its scroll container.
    pub fn set_on_scroll_target(
        &mut self,
        f: Option<impl Fn(&Option<ScrollTarget>) + Send + Sync + 'static>,
    ) {
        self.scroll_target.subscribe(f.map(|f| Arc::new(f) as _));
    }

    /// Fired with the last index when it enters the window (once per distinct index).
    pub fn set_on_end_reached(&mut self, f: Option<impl Fn(&usize) + Send + Sync + 'static>) {
        self.on_end_reached = f.map(|f| Arc::new(f) as _);
    }

    // --- Inputs ------------------------------------------------------------------------------

    pub fn set_total_count(&mut self, count: usize) {
        if self.groups.is_some() {
            vwarn!(count, "set_total_count: ignored, the count follows the group counts");
            return;
        }
        self.apply_total_count(count);
    }

    /// Same as [`Self::set_total_count`] for signed inputs; negative counts are rejected.
    pub fn try_set_total_count(&mut self, count: i64) -> Result<(), EngineError> {
        let Ok(n) = usize::try_from(count) else {
            vwarn!(count, "try_set_total_count: negative count");
            return Err(EngineError::InvalidCount(count));
        };
        self.set_total_count(n);
        Ok(())
    }

    fn apply_total_count(&mut self, count: usize) {
        let prev = self.total_count;
        if prev == Some(count) {
            return;
        }
        let was_at_bottom = self.compute_at_bottom();
        vdebug!(count, prev = ?prev, was_at_bottom, "set_total_count");

        self.batch_update(|e| {
            e.total_count = Some(count);
            e.sizes.set_len(count);
            match prev {
                None => {
                    if let Some(index) = e.options.initial_top_most_item_index {
                        if count > 0 {
                            e.request_scroll(ScrollLocation::new(index));
                        }
                    }
                }
                Some(prev) if count > prev && e.options.follow_output && was_at_bottom => {
                    e.request_scroll(ScrollLocation::new(count - 1).with_align(Align::End));
                }
                Some(_) => {}
            }
            e.reresolve_pending();
            e.refresh();
        });
    }

    pub fn set_viewport_size(&mut self, size: u32) {
        if self.viewport_size == size {
            return;
        }
        self.viewport_size = size;
        self.batch_update(|e| {
            e.reresolve_pending();
            e.refresh();
        });
    }

    /// Programmatic scroll offset update (no velocity sampling).
    pub fn set_scroll_offset(&mut self, offset: u64) -> Result<(), EngineError> {
        self.ensure_ready()?;
        if self.scroll_offset == offset {
            return Ok(());
        }
        self.move_scroll_offset(offset);
        self.refresh();
        Ok(())
    }

    /// Applies a scroll event from the UI (wheel, drag, keyboard): updates the offset and feeds
    /// the scrolling/seek detector.
    pub fn apply_scroll_event(&mut self, offset: u64, now_ms: u64) -> Result<(), EngineError> {
        self.ensure_ready()?;
        vtrace!(offset, now_ms, "apply_scroll_event");
        self.batch_update(|e| {
            if e.move_scroll_offset(offset) {
                e.seek.rebase(offset, now_ms);
            } else {
                e.seek.sample(offset, now_ms);
            }
            e.refresh();
        });
        Ok(())
    }

    /// Sets both viewport size and scroll offset in one update.
    pub fn set_viewport_and_scroll(
        &mut self,
        viewport_size: u32,
        scroll_offset: u64,
    ) -> Result<(), EngineError> {
        self.ensure_ready()?;
        let mut result = Ok(());
        self.batch_update(|e| {
            e.set_viewport_size(viewport_size);
            result = e.set_scroll_offset(scroll_offset);
        });
        result
    }

    /// Returns `true` when `offset` is the container catching up with a scroll target handed out
    /// earlier. Such reports neither move the engine nor cancel the pending request, which may
    /// have been re-resolved since.
    fn move_scroll_offset(&mut self, offset: u64) -> bool {
        if let Some(pos) = self.issued_offsets.iter().position(|&o| o == offset) {
            self.issued_offsets.drain(..=pos);
            vtrace!(offset, "scroll event reports an issued target");
            return true;
        }
        self.issued_offsets.clear();
        if self.pending_scroll.is_some_and(|p| p.offset != offset) {
            vtrace!(offset, "scroll moved away from the pending target; dropping it");
            self.pending_scroll = None;
        }
        self.scroll_offset = offset;
        false
    }

    fn publish_target(&mut self, target: ScrollTarget) {
        if self.issued_offsets.len() >= MAX_ISSUED_OFFSETS {
            self.issued_offsets.pop_front();
        }
        self.issued_offsets.push_back(target.offset);
        self.scroll_target.publish(Some(target));
    }

    /// Advances time-based state (scrolling reset, seek debounce).
    pub fn tick(&mut self, now_ms: u64) {
        self.seek.tick(now_ms);
        self.refresh();
    }

    pub fn measure_item(&mut self, index: usize, size: u32) -> Result<SizeChange, EngineError> {
        self.ensure_ready()?;
        if self.options.fixed_item_size {
            return Ok(SizeChange::Ignored);
        }
        let change = self.sizes.record_size(index, size);
        match change {
            SizeChange::Ignored => {
                vwarn!(
                    index,
                    count = self.total_count(),
                    "measure_item: out-of-range index"
                );
                return Ok(change);
            }
            SizeChange::Unchanged => return Ok(change),
            SizeChange::Replaced { .. } => {
                vdebug!(index, size, change = ?change, "measure_item: replacing a committed size");
            }
            SizeChange::Recorded { .. } => {
                vtrace!(index, size, "measure_item");
            }
        }
        self.batch_update(|e| {
            e.reresolve_pending();
            e.refresh();
        });
        Ok(change)
    }

    /// Records several measurements with a single round of notifications.
    ///
    /// Returns how many measurements changed the size model.
    pub fn measure_many(
        &mut self,
        measurements: impl IntoIterator<Item = (usize, u32)>,
    ) -> Result<usize, EngineError> {
        self.ensure_ready()?;
        let mut changed = 0usize;
        self.batch_update(|e| {
            for (index, size) in measurements {
                if let Ok(SizeChange::Recorded { .. } | SizeChange::Replaced { .. }) =
                    e.measure_item(index, size)
                {
                    changed += 1;
                }
            }
        });
        Ok(changed)
    }

    /// Requests a scroll to `location`.
    ///
    /// The index is clamped into the list. The returned target (also published to the
    /// scroll-target subscriber) is provisional when the item has not been measured yet: it is
    /// re-resolved automatically as measurements arrive, and [`Self::confirm_scroll`] settles
    /// it after the adapter has painted.
    pub fn scroll_to_index(
        &mut self,
        location: impl Into<ScrollLocation>,
    ) -> Result<ScrollTarget, EngineError> {
        self.ensure_ready()?;
        Ok(self.request_scroll(location.into()))
    }

    /// Scrolls to a group header (grouped lists). Without groups, `group` is a flat index.
    pub fn scroll_to_group(
        &mut self,
        group: usize,
        align: Align,
    ) -> Result<ScrollTarget, EngineError> {
        let index = match &self.groups {
            Some(groups) => groups
                .group_to_flat(group.min(groups.group_count().saturating_sub(1)))
                .unwrap_or(0),
            None => group,
        };
        self.scroll_to_index(ScrollLocation::new(index).with_align(align))
    }

    /// Scrolls to an item by its position across all groups (headers excluded). Without groups,
    /// `item` is a flat index.
    pub fn scroll_to_group_item(
        &mut self,
        item: usize,
        align: Align,
    ) -> Result<ScrollTarget, EngineError> {
        let index = match &self.groups {
            Some(groups) => groups
                .item_to_flat(item.min(groups.total_items().saturating_sub(1)))
                .unwrap_or(0),
            None => item,
        };
        self.scroll_to_index(ScrollLocation::new(index).with_align(align))
    }

    /// Second phase of a scroll-to-index request.
    ///
    /// Call this once the adapter has applied the target and laid out the items. Returns `None`
    /// when `ticket` is not the latest request (it was superseded or cancelled). Otherwise the
    /// target is re-resolved against the current measurements; it stays pending while the target
    /// item is still unmeasured.
    pub fn confirm_scroll(&mut self, ticket: u64) -> Result<Option<ScrollTarget>, EngineError> {
        self.ensure_ready()?;
        let Some(pending) = self.pending_scroll else {
            return Ok(None);
        };
        if pending.ticket != ticket {
            vtrace!(
                ticket,
                latest = pending.ticket,
                "confirm_scroll: stale ticket"
            );
            return Ok(None);
        }
        let next = self.resolved(pending);
        self.pending_scroll = next.provisional.then_some(next);
        self.apply_resolved(pending, next);
        Ok(Some(next.target()))
    }

    pub fn cancel_pending_scroll(&mut self) {
        self.pending_scroll = None;
    }

    /// Shifts every index right by `added` after items were inserted at the front.
    ///
    /// Size runs, the pending scroll request and the scroll offset move together in one update,
    /// so the same physical items stay on screen. The compensated offset is published as a scroll
    /// target (with `location: None`).
    pub fn adjust_for_prepend(&mut self, added: usize) -> Result<(), EngineError> {
        self.ensure_ready()?;
        if added == 0 {
            return Ok(());
        }
        if self.groups.is_some() {
            vwarn!(
                added,
                "adjust_for_prepend: ignored for grouped lists, update the group counts instead"
            );
            return Ok(());
        }
        vdebug!(added, "adjust_for_prepend");
        self.batch_update(|e| {
            e.sizes.prepend(added);
            let added_height = e.sizes.offset_of(added);
            e.total_count = Some(e.total_count() + added);
            e.scroll_offset = e.scroll_offset.saturating_add(added_height);
            if let Some(p) = e.pending_scroll.as_mut() {
                p.location.index += added;
                p.offset = p.offset.saturating_add(added_height);
            }
            e.next_ticket += 1;
            e.publish_target(ScrollTarget {
                ticket: e.next_ticket,
                offset: e.scroll_offset,
                location: None,
                provisional: false,
            });
            e.refresh();
        });
        Ok(())
    }

    fn request_scroll(&mut self, location: ScrollLocation) -> ScrollTarget {
        let count = self.total_count();
        if count == 0 {
            vdebug!(requested = location.index, "scroll_to_index: empty list");
            self.next_ticket += 1;
            self.pending_scroll = None;
            self.scroll_offset = 0;
            let target = ScrollTarget {
                ticket: self.next_ticket,
                offset: 0,
                location: None,
                provisional: false,
            };
            self.publish_target(target);
            self.refresh();
            return target;
        }
        let index = location.index.min(count.saturating_sub(1));
        if index != location.index {
            vdebug!(
                requested = location.index,
                index,
                count,
                "scroll_to_index: clamping index"
            );
        }
        let location = ScrollLocation { index, ..location };

        self.next_ticket += 1;
        let pending = PendingScroll {
            ticket: self.next_ticket,
            location,
            offset: self.resolve_offset(index, location.align),
            provisional: !self.is_settled(index),
        };
        if self.pending_scroll.replace(pending).is_some() {
            vtrace!(ticket = pending.ticket, "scroll_to_index: superseding pending request");
        }
        self.scroll_offset = pending.offset;

        let target = pending.target();
        self.publish_target(target);
        self.refresh();
        target
    }

    fn is_settled(&self, index: usize) -> bool {
        self.sizes.is_empty() || self.options.fixed_item_size || self.sizes.is_measured(index)
    }

    fn resolve_offset(&self, index: usize, align: Align) -> u64 {
        let count = self.sizes.len();
        if count == 0 {
            return 0;
        }
        let index = index.min(count - 1);
        let start = self.sizes.offset_of(index);
        let size = self.sizes.size_of(index).unwrap_or(0) as u64;
        let view = self.viewport_size as u64;

        let target = match align {
            Align::Start => {
                let top = self.options.top_item_count.min(count);
                let pinned = if index >= top {
                    self.sizes.offset_of(top)
                } else {
                    0
                };
                start.saturating_sub(pinned)
            }
            Align::Center => start.saturating_add(size / 2).saturating_sub(view / 2),
            Align::End => start.saturating_add(size).saturating_sub(view),
        };
        target.min(self.max_scroll_offset())
    }

    fn resolved(&self, pending: PendingScroll) -> PendingScroll {
        let index = pending
            .location
            .index
            .min(self.total_count().saturating_sub(1));
        PendingScroll {
            location: ScrollLocation {
                index,
                ..pending.location
            },
            offset: self.resolve_offset(index, pending.location.align),
            provisional: !self.is_settled(index),
            ..pending
        }
    }

    fn apply_resolved(&mut self, prev: PendingScroll, next: PendingScroll) {
        if next == prev && self.scroll_offset == next.offset {
            return;
        }
        self.scroll_offset = next.offset;
        self.publish_target(next.target());
        self.refresh();
    }

    fn reresolve_pending(&mut self) {
        let Some(pending) = self.pending_scroll else {
            return;
        };
        let next = self.resolved(pending);
        if next == pending {
            return;
        }
        vtrace!(
            ticket = next.ticket,
            offset = next.offset,
            provisional = next.provisional,
            "re-resolving pending scroll"
        );
        self.pending_scroll = Some(next);
        self.apply_resolved(pending, next);
    }

    // --- Configuration -----------------------------------------------------------------------

    pub fn set_top_item_count(&mut self, top_item_count: usize) {
        if self.options.top_item_count == top_item_count {
            return;
        }
        self.options.top_item_count = top_item_count;
        self.batch_update(|e| {
            e.reresolve_pending();
            e.refresh();
        });
    }

    pub fn set_overscan(&mut self, overscan_top: u32, overscan_bottom: u32) {
        self.options.overscan_top = overscan_top;
        self.options.overscan_bottom = overscan_bottom;
        self.refresh();
    }

    pub fn set_initial_item_count(&mut self, initial_item_count: usize) {
        self.options.initial_item_count = initial_item_count;
        self.refresh();
    }

    pub fn set_follow_output(&mut self, follow_output: bool) {
        self.options.follow_output = follow_output;
    }

    pub fn set_at_bottom_threshold(&mut self, threshold: u64) {
        self.options.at_bottom_threshold = threshold;
        self.refresh();
    }

    pub fn set_is_scrolling_reset_delay_ms(&mut self, delay_ms: u64) {
        self.options.is_scrolling_reset_delay_ms = delay_ms;
        self.seek.set_idle_delay_ms(delay_ms);
    }

    pub fn set_scroll_seek(&mut self, scroll_seek: Option<ScrollSeekConfig>) {
        self.options.scroll_seek = scroll_seek.clone();
        self.seek.set_config(scroll_seek);
        self.refresh();
    }

    pub fn set_default_item_size(&mut self, size: u32) {
        self.options.default_item_size = size;
        if !self.sizes.set_default_size(size) {
            return;
        }
        self.batch_update(|e| {
            e.reresolve_pending();
            e.refresh();
        });
    }

    pub fn set_max_measured_items(&mut self, max: Option<usize>) {
        self.options.max_measured_items = max;
        self.sizes.set_max_measured(max);
        self.batch_update(|e| {
            e.reresolve_pending();
            e.refresh();
        });
    }

    /// Switches to (or from) a grouped list. With `Some`, the total count becomes the number of
    /// headers plus items.
    pub fn set_group_counts(&mut self, counts: Option<Vec<usize>>) {
        self.options.group_counts = counts.clone();
        self.groups = counts.map(GroupIndexMapper::new);
        let len = self.groups.as_ref().map(GroupIndexMapper::total_len);
        vdebug!(len = ?len, "set_group_counts");
        self.batch_update(|e| {
            if let Some(len) = len {
                e.apply_total_count(len);
            }
            e.refresh();
        });
    }

    /// Drops every measurement; items fall back to the default size.
    pub fn reset_measurements(&mut self) {
        vdebug!(
            measured = self.sizes.measured_count(),
            "reset_measurements"
        );
        self.sizes.reset();
        self.batch_update(|e| {
            e.reresolve_pending();
            e.refresh();
        });
    }
}

impl core::fmt::Debug for WindowEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowEngine")
            .field("phase", &self.phase())
            .field("total_count", &self.total_count)
            .field("viewport_size", &self.viewport_size)
            .field("scroll_offset", &self.scroll_offset)
            .field("window", self.window.get())
            .field("pending_scroll", &self.pending_scroll)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

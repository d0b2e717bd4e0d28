use crate::{ListRange, SizeModel};

/// Inputs to [`compute_range`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeInput {
    pub scroll_offset: u64,
    pub viewport_size: u32,
    /// Extra pixels rendered above the viewport.
    pub overscan_top: u32,
    /// Extra pixels rendered below the viewport.
    pub overscan_bottom: u32,
    /// Pinned prefix, rendered separately; the returned range never includes it.
    pub top_item_count: usize,
    /// Items to render while the viewport has no size yet.
    pub initial_item_count: usize,
}

/// Computes the scrolled range to render.
///
/// - Returns `None` when there is nothing to scroll (no items, or every item is pinned).
/// - Offsets past the end are bottom-clamped: the range covers the last viewport worth of items.
/// - Pinned items cover the top of the viewport, so the scrolled region starts below them.
/// - The result covers `viewport_size + overscan_top + overscan_bottom` pixels unless clamped by
///   the list boundaries.
pub fn compute_range(sizes: &SizeModel, input: &RangeInput) -> Option<ListRange> {
    let count = sizes.len();
    let top = input.top_item_count.min(count);
    if top >= count {
        return None;
    }
    let last = count - 1;

    let view = input.viewport_size as u64;
    let total = sizes.total_height();
    let scroll = input.scroll_offset.min(total.saturating_sub(view));
    let top_height = sizes.offset_of(top);

    if view == 0 {
        let start = sizes.index_at(scroll.saturating_add(top_height))?.max(top);
        let len = input.initial_item_count.max(1);
        let end = start.saturating_add(len - 1).min(last);
        return Some(ListRange::new(start, end));
    }

    let start_px = scroll
        .saturating_add(top_height)
        .saturating_sub(input.overscan_top as u64);
    let end_px = scroll
        .saturating_add(view)
        .saturating_add(input.overscan_bottom as u64);

    let start = sizes.index_at(start_px)?.max(top);
    let end = sizes.index_at(end_px.saturating_sub(1))?.clamp(start, last);
    Some(ListRange::new(start, end))
}

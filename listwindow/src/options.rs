use alloc::vec::Vec;

use crate::ScrollSeekConfig;

/// Configuration for [`crate::WindowEngine`].
///
/// Everything except `default_item_size` is optional. Most fields also have a setter on the
/// engine, so adapters can forward prop changes without rebuilding it.
#[derive(Clone, Debug)]
pub struct EngineOptions {
    /// Size used for items that have not been measured yet.
    pub default_item_size: u32,
    /// When `true`, every item has exactly `default_item_size` and measurements are ignored.
    pub fixed_item_size: bool,

    /// Extra pixels rendered above the viewport.
    pub overscan_top: u32,
    /// Extra pixels rendered below the viewport.
    pub overscan_bottom: u32,

    /// Number of items pinned at the top of the viewport.
    pub top_item_count: usize,

    /// Items rendered before the viewport size is known (e.g. first paint / server rendering).
    pub initial_item_count: usize,

    /// Index scrolled to the top when the first total count arrives.
    pub initial_top_most_item_index: Option<usize>,

    /// Upper bound on measured items kept in the size model. Older measurements fall back to
    /// `default_item_size`.
    pub max_measured_items: Option<usize>,

    /// Keep the list scrolled to the bottom when items are appended while at the bottom.
    pub follow_output: bool,

    /// Distance from the end (in pixels) still considered "at bottom".
    pub at_bottom_threshold: u64,

    /// Delay without scroll samples before `is_scrolling` resets.
    pub is_scrolling_reset_delay_ms: u64,

    pub scroll_seek: Option<ScrollSeekConfig>,

    /// Item counts per group. When set, the total count is derived from it and every group
    /// gets a header slot in front of its items.
    pub group_counts: Option<Vec<usize>>,
}

impl EngineOptions {
    pub fn new(default_item_size: u32) -> Self {
        Self {
            default_item_size,
            fixed_item_size: false,
            overscan_top: 0,
            overscan_bottom: 0,
            top_item_count: 0,
            initial_item_count: 0,
            initial_top_most_item_index: None,
            max_measured_items: None,
            follow_output: false,
            at_bottom_threshold: 4,
            is_scrolling_reset_delay_ms: 150,
            scroll_seek: None,
            group_counts: None,
        }
    }

    /// Every item is `size` tall; measurements are ignored.
    pub fn fixed(size: u32) -> Self {
        Self::new(size).with_fixed_item_size(true)
    }

    pub fn with_fixed_item_size(mut self, fixed: bool) -> Self {
        self.fixed_item_size = fixed;
        self
    }

    /// Same overscan on both edges.
    pub fn with_overscan(mut self, overscan: u32) -> Self {
        self.overscan_top = overscan;
        self.overscan_bottom = overscan;
        self
    }

    pub fn with_overscan_edges(mut self, overscan_top: u32, overscan_bottom: u32) -> Self {
        self.overscan_top = overscan_top;
        self.overscan_bottom = overscan_bottom;
        self
    }

    pub fn with_top_item_count(mut self, top_item_count: usize) -> Self {
        self.top_item_count = top_item_count;
        self
    }

    pub fn with_initial_item_count(mut self, initial_item_count: usize) -> Self {
        self.initial_item_count = initial_item_count;
        self
    }

    pub fn with_initial_top_most_item_index(mut self, index: Option<usize>) -> Self {
        self.initial_top_most_item_index = index;
        self
    }

    pub fn with_max_measured_items(mut self, max: Option<usize>) -> Self {
        self.max_measured_items = max;
        self
    }

    pub fn with_follow_output(mut self, follow_output: bool) -> Self {
        self.follow_output = follow_output;
        self
    }

    pub fn with_at_bottom_threshold(mut self, threshold: u64) -> Self {
        self.at_bottom_threshold = threshold;
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }

    pub fn with_scroll_seek(mut self, scroll_seek: Option<ScrollSeekConfig>) -> Self {
        self.scroll_seek = scroll_seek;
        self
    }

    pub fn with_group_counts(mut self, group_counts: Option<Vec<usize>>) -> Self {
        self.group_counts = group_counts;
        self
    }
}

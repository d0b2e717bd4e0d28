use crate::GroupedIndex;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

/// An inclusive, non-empty index range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListRange {
    pub start_index: usize,
    pub end_index: usize, // inclusive
}

impl ListRange {
    pub fn new(start_index: usize, end_index: usize) -> Self {
        debug_assert!(
            start_index <= end_index,
            "ListRange: start must not exceed end (start={start_index}, end={end_index})"
        );
        Self {
            start_index,
            end_index: end_index.max(start_index),
        }
    }

    pub fn item_count(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start_index <= index && index <= self.end_index
    }

    pub fn iter(&self) -> core::ops::RangeInclusive<usize> {
        self.start_index..=self.end_index
    }

    pub fn shifted(self, by: usize) -> Self {
        Self {
            start_index: self.start_index.saturating_add(by),
            end_index: self.end_index.saturating_add(by),
        }
    }
}

/// The set of indexes an adapter has to render.
///
/// It is made of three parts, in ascending index order:
/// - the pinned prefix `0..top_item_count` (never placeholder-rendered)
/// - an optional sticky group header (grouped lists only)
/// - the scrolled `range`, which never re-includes pinned items
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    pub top_item_count: usize,
    pub range: Option<ListRange>,
    /// When `true`, items of `range` should be rendered as lightweight placeholders.
    pub placeholder: bool,
    /// Flat index of the header owning the first scrolled item, when that item is not a header.
    pub sticky_header: Option<usize>,
}

impl Window {
    pub fn is_empty(&self) -> bool {
        self.top_item_count == 0 && self.range.is_none()
    }

    /// The hull of all rendered indexes: `start_index` is widened to 0 when items are pinned.
    pub fn bounds(&self) -> Option<ListRange> {
        match (self.top_item_count, self.range) {
            (0, range) => range,
            (top, Some(range)) => Some(ListRange::new(0, range.end_index.max(top - 1))),
            (top, None) => Some(ListRange::new(0, top - 1)),
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.top_item_count
            || self.sticky_header == Some(index)
            || self.range.is_some_and(|r| r.contains(index))
    }

    pub fn is_placeholder(&self, index: usize) -> bool {
        self.placeholder
            && index >= self.top_item_count
            && self.sticky_header != Some(index)
            && self.range.is_some_and(|r| r.contains(index))
    }

    /// Emits every rendered index once, in ascending order.
    pub fn for_each_index(&self, mut f: impl FnMut(usize)) {
        for i in 0..self.top_item_count {
            f(i);
        }
        let mut next = self.top_item_count;
        if let Some(header) = self.sticky_header {
            if header >= next && self.range.is_none_or(|r| header < r.start_index) {
                f(header);
                next = header + 1;
            }
        }
        if let Some(range) = self.range {
            for i in range.start_index.max(next)..=range.end_index {
                f(i);
            }
        }
    }

    pub fn shifted(self, by: usize) -> Self {
        Self {
            range: self.range.map(|r| r.shifted(by)),
            sticky_header: self.sticky_header.map(|h| h.saturating_add(by)),
            ..self
        }
    }
}

/// A scroll-to-index request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollLocation {
    pub index: usize,
    pub align: Align,
}

impl ScrollLocation {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            align: Align::Start,
        }
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

impl From<usize> for ScrollLocation {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

/// A scroll offset the adapter should apply to its real scroll container.
///
/// Every request carries a fresh `ticket`, so two requests for the same offset are still
/// distinguishable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollTarget {
    pub ticket: u64,
    pub offset: u64,
    /// The (clamped) location this target resolves, or `None` for a compensation after a prepend.
    pub location: Option<ScrollLocation>,
    /// `true` while the target item has not been measured, i.e. the offset is an estimate.
    pub provisional: bool,
}

/// A rendered item, as handed to the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListItem {
    pub index: usize,
    /// Start offset in the scroll axis.
    pub offset: u64,
    pub size: u32,
    pub measured: bool,
    pub placeholder: bool,
    pub group: Option<GroupedIndex>,
}

impl ListItem {
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size as u64)
    }
}

/// A run of consecutive items sharing one size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeRun {
    pub start_index: usize,
    pub len: usize,
    pub size: u32,
    pub measured: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnginePhase {
    /// No total count has been set yet.
    Idle,
    /// Normal windowed rendering.
    Ready,
    /// Fast scrolling: the scrolled range is rendered with placeholders.
    Seeking,
}

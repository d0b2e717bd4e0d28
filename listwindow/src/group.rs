use alloc::vec::Vec;

/// A flat index resolved against group boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupedIndex {
    Header {
        group: usize,
    },
    Item {
        group: usize,
        /// Position of the item inside its group.
        index_in_group: usize,
        /// Position of the item across all groups (headers excluded).
        item: usize,
    },
}

impl GroupedIndex {
    pub fn group(&self) -> usize {
        match *self {
            Self::Header { group } | Self::Item { group, .. } => group,
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, Self::Header { .. })
    }
}

/// Maps between the flat index space (what the size model and ranges use) and groups.
///
/// Every group occupies `count + 1` flat slots: its header, then its items. Both directions are
/// monotonic and resolve in `O(log g)` via binary search over the group boundaries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupIndexMapper {
    counts: Vec<usize>,
    header_flat: Vec<usize>,
    item_start: Vec<usize>,
    total_len: usize,
    total_items: usize,
}

impl GroupIndexMapper {
    pub fn new(counts: impl Into<Vec<usize>>) -> Self {
        let counts = counts.into();
        let mut header_flat = Vec::with_capacity(counts.len());
        let mut item_start = Vec::with_capacity(counts.len());
        let mut flat = 0usize;
        let mut items = 0usize;
        for &count in &counts {
            header_flat.push(flat);
            item_start.push(items);
            flat = flat.saturating_add(count).saturating_add(1);
            items = items.saturating_add(count);
        }
        Self {
            counts,
            header_flat,
            item_start,
            total_len: flat,
            total_items: items,
        }
    }

    pub fn group_counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn group_count(&self) -> usize {
        self.counts.len()
    }

    /// Number of flat slots (headers + items).
    pub fn total_len(&self) -> usize {
        self.total_len
    }

    /// Number of items, headers excluded.
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn flat_to_grouped(&self, flat: usize) -> Option<GroupedIndex> {
        let group = self.group_of(flat)?;
        let header = self.header_flat[group];
        if flat == header {
            return Some(GroupedIndex::Header { group });
        }
        let index_in_group = flat - header - 1;
        Some(GroupedIndex::Item {
            group,
            index_in_group,
            item: self.item_start[group] + index_in_group,
        })
    }

    /// Flat index of a group's header.
    pub fn group_to_flat(&self, group: usize) -> Option<usize> {
        self.header_flat.get(group).copied()
    }

    /// Flat index of an item given its position across all groups.
    pub fn item_to_flat(&self, item: usize) -> Option<usize> {
        if item >= self.total_items {
            return None;
        }
        let group = self.item_start.partition_point(|&s| s <= item) - 1;
        Some(self.header_flat[group] + 1 + (item - self.item_start[group]))
    }

    pub fn group_of(&self, flat: usize) -> Option<usize> {
        if flat >= self.total_len {
            return None;
        }
        Some(self.header_flat.partition_point(|&h| h <= flat) - 1)
    }

    /// Flat index of the header owning `flat` (a header owns itself).
    pub fn header_of(&self, flat: usize) -> Option<usize> {
        self.group_of(flat).map(|g| self.header_flat[g])
    }
}

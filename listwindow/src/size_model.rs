use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::SizeRun;

type NodeId = usize;

/// One run of items sharing a size. Runs are kept in a treap ordered by position (implicit
/// keys), so inserting at the front or splitting in the middle never renumbers stored data.
#[derive(Clone, Debug)]
struct Node {
    len: usize,
    size: u32,
    measured: bool,
    priority: u64,
    left: Option<NodeId>,
    right: Option<NodeId>,

    // Subtree aggregates.
    items: usize,
    height: u64,
    measured_items: usize,
}

impl Node {
    fn run_height(&self) -> u64 {
        (self.len as u64).saturating_mul(self.size as u64)
    }
}

/// Outcome of [`SizeModel::record_size`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SizeChange {
    /// The index is out of range; nothing was recorded.
    Ignored,
    /// The item was already measured with this size.
    Unchanged,
    /// First measurement of the item.
    Recorded { previous: u32 },
    /// The item was measured before with a different size; the newest measurement wins.
    Replaced { previous: u32 },
}

impl SizeChange {
    /// Signed height change caused by the measurement.
    pub fn delta(&self, size: u32) -> i64 {
        match *self {
            Self::Ignored | Self::Unchanged => 0,
            Self::Recorded { previous } | Self::Replaced { previous } => {
                size as i64 - previous as i64
            }
        }
    }
}

/// Per-item sizes, stored as run-length compressed runs.
///
/// Unmeasured items use the default size. A uniform stretch of unmeasured items costs a single
/// run no matter how long it is; a measurement that differs from its surroundings splits the
/// run, and neighbouring runs that end up identical are merged back.
///
/// `offset_of`, `index_at`, `size_of` and `record_size` run in `O(log r)` where `r` is the
/// number of runs.
#[derive(Clone, Debug)]
pub struct SizeModel {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    default_size: u32,
    seed: u64,

    max_measured: Option<usize>,
    // Measured indexes, oldest first. Holds exactly the measured items.
    measured_order: VecDeque<usize>,
}

impl SizeModel {
    pub fn new(default_size: u32) -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            default_size: default_size.max(1),
            seed: 0x9E37_79B9_7F4A_7C15,
            max_measured: None,
            measured_order: VecDeque::new(),
        }
    }

    pub fn default_size(&self) -> u32 {
        self.default_size
    }

    /// Changes the size used for unmeasured items. Returns `true` if anything changed.
    ///
    /// A default of 0 is coerced to 1 so that offsets stay strictly increasing.
    pub fn set_default_size(&mut self, size: u32) -> bool {
        let size = size.max(1);
        if self.default_size == size {
            return false;
        }
        self.default_size = size;
        for node in self.nodes.iter_mut().filter(|n| !n.measured) {
            node.size = size;
        }
        self.refresh(self.root);
        true
    }

    pub fn len(&self) -> usize {
        self.items(self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn total_height(&self) -> u64 {
        self.height(self.root)
    }

    /// Number of items carrying a measured size.
    pub fn measured_count(&self) -> usize {
        self.measured_items(self.root)
    }

    pub fn max_measured(&self) -> Option<usize> {
        self.max_measured
    }

    /// Bounds the number of measured items kept. Oldest measurements revert to the default size
    /// first.
    pub fn set_max_measured(&mut self, max: Option<usize>) {
        self.max_measured = max;
        self.evict();
    }

    /// Grows (with unmeasured items) or truncates the model.
    pub fn set_len(&mut self, len: usize) {
        let cur = self.len();
        if len > cur {
            let run = self.alloc(len - cur, self.default_size, false);
            self.root = self.join(self.root, Some(run));
        } else if len < cur {
            let (keep, drop) = self.split(self.root, len);
            self.release(drop);
            self.root = keep;
            self.measured_order.retain(|&i| i < len);
        }
    }

    /// Inserts `count` unmeasured items at the front. Existing items shift right by `count`.
    pub fn prepend(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let run = self.alloc(count, self.default_size, false);
        self.root = self.join(Some(run), self.root);
        for index in self.measured_order.iter_mut() {
            *index += count;
        }
    }

    /// Drops every measurement. The length is kept.
    pub fn reset(&mut self) {
        let len = self.len();
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.measured_order.clear();
        if len > 0 {
            self.root = Some(self.alloc(len, self.default_size, false));
        }
    }

    pub fn record_size(&mut self, index: usize, size: u32) -> SizeChange {
        let Some((previous, was_measured)) = self.run_at(index) else {
            return SizeChange::Ignored;
        };
        if was_measured && previous == size {
            return SizeChange::Unchanged;
        }

        self.set_item(index, size, true);
        if was_measured {
            return SizeChange::Replaced { previous };
        }
        self.measured_order.push_back(index);
        self.evict();
        SizeChange::Recorded { previous }
    }

    pub fn size_of(&self, index: usize) -> Option<u32> {
        self.run_at(index).map(|(size, _)| size)
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.run_at(index).is_some_and(|(_, measured)| measured)
    }

    /// Start offset of `index`. Indexes past the end are clamped, so `offset_of(len())` is the
    /// total height.
    pub fn offset_of(&self, index: usize) -> u64 {
        let mut index = index.min(self.len());
        let mut acc = 0u64;
        let mut t = self.root;
        while let Some(id) = t {
            let n = &self.nodes[id];
            let left_items = self.items(n.left);
            if index < left_items {
                t = n.left;
                continue;
            }
            let within = index - left_items;
            let left_height = self.height(n.left);
            if within < n.len {
                return acc
                    .saturating_add(left_height)
                    .saturating_add((within as u64).saturating_mul(n.size as u64));
            }
            acc = acc
                .saturating_add(left_height)
                .saturating_add(n.run_height());
            index = within - n.len;
            t = n.right;
        }
        acc
    }

    /// The item covering `offset`. Offsets past the end map to the last item; `None` when empty.
    ///
    /// Zero-sized items never cover any offset.
    pub fn index_at(&self, offset: u64) -> Option<usize> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        if offset >= self.total_height() {
            return Some(len - 1);
        }

        let mut off = offset;
        let mut base = 0usize;
        let mut t = self.root;
        while let Some(id) = t {
            let n = &self.nodes[id];
            let left_height = self.height(n.left);
            if off < left_height {
                t = n.left;
                continue;
            }
            let in_run = off - left_height;
            let left_items = self.items(n.left);
            let run_height = n.run_height();
            if in_run < run_height {
                let within = (in_run / n.size as u64) as usize;
                return Some(base + left_items + within);
            }
            off = in_run - run_height;
            base += left_items + n.len;
            t = n.right;
        }
        Some(len - 1)
    }

    /// Iterates over runs in index order.
    pub fn for_each_run(&self, mut f: impl FnMut(SizeRun)) {
        let mut stack: Vec<NodeId> = Vec::new();
        let mut t = self.root;
        let mut start_index = 0usize;
        loop {
            while let Some(id) = t {
                stack.push(id);
                t = self.nodes[id].left;
            }
            let Some(id) = stack.pop() else {
                break;
            };
            let n = &self.nodes[id];
            f(SizeRun {
                start_index,
                len: n.len,
                size: n.size,
                measured: n.measured,
            });
            start_index += n.len;
            t = n.right;
        }
    }

    pub fn runs(&self) -> Vec<SizeRun> {
        let mut out = Vec::new();
        self.for_each_run(|r| out.push(r));
        out
    }

    pub fn run_count(&self) -> usize {
        let mut n = 0usize;
        self.for_each_run(|_| n += 1);
        n
    }

    fn run_at(&self, index: usize) -> Option<(u32, bool)> {
        let mut index = index;
        let mut t = self.root;
        while let Some(id) = t {
            let n = &self.nodes[id];
            let left_items = self.items(n.left);
            if index < left_items {
                t = n.left;
            } else if index < left_items + n.len {
                return Some((n.size, n.measured));
            } else {
                index -= left_items + n.len;
                t = n.right;
            }
        }
        None
    }

    fn set_item(&mut self, index: usize, size: u32, measured: bool) {
        let (left, rest) = self.split(self.root, index);
        let (old, right) = self.split(rest, 1);
        self.release(old);
        let item = self.alloc(1, size, measured);
        let left = self.join(left, Some(item));
        self.root = self.join(left, right);
    }

    fn evict(&mut self) {
        let Some(max) = self.max_measured else {
            return;
        };
        while self.measured_count() > max {
            let Some(index) = self.measured_order.pop_front() else {
                break;
            };
            vtrace!(index, max, "SizeModel: evicting measurement");
            let default = self.default_size;
            self.set_item(index, default, false);
        }
    }

    fn next_priority(&mut self) -> u64 {
        // xorshift64
        let mut x = self.seed;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.seed = x;
        x
    }

    fn alloc(&mut self, len: usize, size: u32, measured: bool) -> NodeId {
        let priority = self.next_priority();
        let node = Node {
            len,
            size,
            measured,
            priority,
            left: None,
            right: None,
            items: len,
            height: (len as u64).saturating_mul(size as u64),
            measured_items: if measured { len } else { 0 },
        };
        if let Some(id) = self.free.pop() {
            self.nodes[id] = node;
            id
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    fn release(&mut self, t: Option<NodeId>) {
        let mut stack: Vec<NodeId> = t.into_iter().collect();
        while let Some(id) = stack.pop() {
            let n = &self.nodes[id];
            stack.extend(n.left);
            stack.extend(n.right);
            self.free.push(id);
        }
    }

    fn items(&self, t: Option<NodeId>) -> usize {
        t.map_or(0, |id| self.nodes[id].items)
    }

    fn height(&self, t: Option<NodeId>) -> u64 {
        t.map_or(0, |id| self.nodes[id].height)
    }

    fn measured_items(&self, t: Option<NodeId>) -> usize {
        t.map_or(0, |id| self.nodes[id].measured_items)
    }

    fn update(&mut self, id: NodeId) {
        let (left, right) = (self.nodes[id].left, self.nodes[id].right);
        let items = self.items(left) + self.nodes[id].len + self.items(right);
        let height = self
            .height(left)
            .saturating_add(self.nodes[id].run_height())
            .saturating_add(self.height(right));
        let own_measured = if self.nodes[id].measured {
            self.nodes[id].len
        } else {
            0
        };
        let measured_items = self.measured_items(left) + own_measured + self.measured_items(right);

        let n = &mut self.nodes[id];
        n.items = items;
        n.height = height;
        n.measured_items = measured_items;
    }

    /// Recomputes aggregates of a whole subtree (post-order).
    fn refresh(&mut self, t: Option<NodeId>) {
        let Some(id) = t else {
            return;
        };
        let (left, right) = (self.nodes[id].left, self.nodes[id].right);
        self.refresh(left);
        self.refresh(right);
        self.update(id);
    }

    fn merge(&mut self, a: Option<NodeId>, b: Option<NodeId>) -> Option<NodeId> {
        match (a, b) {
            (None, t) | (t, None) => t,
            (Some(a), Some(b)) => {
                if self.nodes[a].priority > self.nodes[b].priority {
                    let right = self.nodes[a].right;
                    let merged = self.merge(right, Some(b));
                    self.nodes[a].right = merged;
                    self.update(a);
                    Some(a)
                } else {
                    let left = self.nodes[b].left;
                    let merged = self.merge(Some(a), left);
                    self.nodes[b].left = merged;
                    self.update(b);
                    Some(b)
                }
            }
        }
    }

    /// Splits `t` into the first `k` items and the rest, cutting a run in two if needed.
    fn split(&mut self, t: Option<NodeId>, k: usize) -> (Option<NodeId>, Option<NodeId>) {
        let Some(id) = t else {
            return (None, None);
        };
        let left = self.nodes[id].left;
        let right = self.nodes[id].right;
        let left_items = self.items(left);
        let len = self.nodes[id].len;

        if k <= left_items {
            let (l, r) = self.split(left, k);
            self.nodes[id].left = r;
            self.update(id);
            (l, Some(id))
        } else if k >= left_items + len {
            let (l, r) = self.split(right, k - left_items - len);
            self.nodes[id].right = l;
            self.update(id);
            (Some(id), r)
        } else {
            let head = k - left_items;
            let (size, measured) = (self.nodes[id].size, self.nodes[id].measured);
            let tail = self.alloc(len - head, size, measured);
            self.nodes[id].len = head;
            self.nodes[id].right = None;
            self.update(id);
            let rest = self.merge(Some(tail), right);
            (Some(id), rest)
        }
    }

    fn first_run(&self, t: Option<NodeId>) -> Option<NodeId> {
        let mut id = t?;
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        Some(id)
    }

    fn last_run(&self, t: Option<NodeId>) -> Option<NodeId> {
        let mut id = t?;
        while let Some(right) = self.nodes[id].right {
            id = right;
        }
        Some(id)
    }

    /// Concatenates two trees, merging the runs at the seam when they are identical.
    fn join(&mut self, a: Option<NodeId>, b: Option<NodeId>) -> Option<NodeId> {
        let (Some(last), Some(first)) = (self.last_run(a), self.first_run(b)) else {
            return self.merge(a, b);
        };
        let (l, f) = (&self.nodes[last], &self.nodes[first]);
        if l.size != f.size || l.measured != f.measured {
            return self.merge(a, b);
        }

        let (last_len, first_len, size, measured) = (l.len, f.len, l.size, l.measured);
        let a_items = self.items(a);
        let (head, a_last) = self.split(a, a_items - last_len);
        let (b_first, tail) = self.split(b, first_len);
        self.release(a_last);
        self.release(b_first);
        let run = self.alloc(last_len + first_len, size, measured);
        let head = self.merge(head, Some(run));
        self.merge(head, tail)
    }
}

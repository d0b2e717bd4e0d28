use alloc::vec::Vec;

use listwindow::{
    EngineError, EngineOptions, ScrollLocation, ScrollTarget, SizeChange, WindowEngine,
};

use crate::{ScrollAnchor, apply_anchor, capture_anchor_at, capture_first_visible_anchor};

/// Work postponed to the next frame, once the current data has been painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FrameTask {
    Prepend(usize),
    RemainScrollPosition { top: usize, added: usize },
}

/// A framework-neutral controller that wraps a [`WindowEngine`] and provides common adapter
/// workflows (deferred list mutations, two-phase scrolling, anchoring).
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_viewport_size` / `on_scroll` / `on_measure` when UI events occur
/// - `tick(now_ms)` once per frame
///
/// The offset returned by `tick()` is the one the real scroll container must adopt.
#[derive(Debug)]
pub struct Controller {
    engine: WindowEngine,
    deferred: Vec<FrameTask>,
    // Ticket of the scroll request issued before the last painted frame.
    confirm_ticket: Option<u64>,
    // Last offset known to be applied by the scroll container.
    applied_offset: u64,
}

impl Controller {
    pub fn new(options: EngineOptions) -> Self {
        Self::from_engine(WindowEngine::new(options))
    }

    pub fn from_engine(engine: WindowEngine) -> Self {
        let applied_offset = engine.scroll_offset();
        Self {
            engine,
            deferred: Vec::new(),
            confirm_ticket: None,
            applied_offset,
        }
    }

    pub fn engine(&self) -> &WindowEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut WindowEngine {
        &mut self.engine
    }

    pub fn into_engine(self) -> WindowEngine {
        self.engine
    }

    /// Number of operations waiting for the next frame.
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    pub fn on_viewport_size(&mut self, viewport_size: u32) {
        self.engine.set_viewport_size(viewport_size);
    }

    /// Call this when the UI reports a scroll offset change (e.g. user wheel/drag).
    pub fn on_scroll(&mut self, scroll_offset: u64, now_ms: u64) -> Result<(), EngineError> {
        self.engine.apply_scroll_event(scroll_offset, now_ms)?;
        self.applied_offset = scroll_offset;
        Ok(())
    }

    pub fn on_measure(&mut self, index: usize, size: u32) -> Result<SizeChange, EngineError> {
        self.engine.measure_item(index, size)
    }

    /// Requests a scroll; the offset is handed out by the next `tick()`, and the request is
    /// confirmed one frame later.
    pub fn scroll_to_index(
        &mut self,
        location: impl Into<ScrollLocation>,
    ) -> Result<ScrollTarget, EngineError> {
        self.engine.scroll_to_index(location)
    }

    /// Inserts `count` items at the front on the next frame, keeping the top item in place.
    pub fn prepend_items(&mut self, count: usize) -> Result<(), EngineError> {
        if !self.engine.is_ready() {
            return Err(EngineError::NotReady);
        }
        if count > 0 {
            self.deferred.push(FrameTask::Prepend(count));
        }
        Ok(())
    }

    /// Appends `count` items at the end.
    pub fn append_items(&mut self, count: usize) -> Result<(), EngineError> {
        if !self.engine.is_ready() {
            return Err(EngineError::NotReady);
        }
        let total = self.engine.total_count().saturating_add(count);
        self.engine.set_total_count(total);
        Ok(())
    }

    /// Same as [`Self::prepend_items`], but applied immediately.
    pub fn adjust_for_prepended_items(&mut self, count: usize) -> Result<(), EngineError> {
        self.engine.adjust_for_prepend(count)
    }

    /// After the data grew by `added` items in front of `top` without going through the engine,
    /// scrolls the old top item (now at `top + added`) back to the start on the next frame.
    pub fn remain_scroll_position(&mut self, top: usize, added: usize) -> Result<(), EngineError> {
        if !self.engine.is_ready() {
            return Err(EngineError::NotReady);
        }
        self.deferred
            .push(FrameTask::RemainScrollPosition { top, added });
        Ok(())
    }

    /// Advances the controller by one frame.
    ///
    /// - confirms the scroll request handed out on the previous frame
    /// - runs the operations deferred to this frame
    /// - advances the engine's timers (scrolling reset, seek debounce)
    ///
    /// Returns the offset the scroll container must adopt, if it changed.
    pub fn tick(&mut self, now_ms: u64) -> Option<u64> {
        if let Some(ticket) = self.confirm_ticket.take() {
            if let Err(_err) = self.engine.confirm_scroll(ticket) {
                awarn!(ticket, error = %_err, "Controller: confirm_scroll failed");
            }
        }

        for task in core::mem::take(&mut self.deferred) {
            adebug!(task = ?task, "Controller: running deferred task");
            let result = match task {
                FrameTask::Prepend(count) => self.engine.adjust_for_prepend(count),
                FrameTask::RemainScrollPosition { top, added } => self
                    .engine
                    .scroll_to_index(top.saturating_add(added))
                    .map(|_| ()),
            };
            if let Err(_err) = result {
                awarn!(task = ?task, error = %_err, "Controller: dropping deferred task");
            }
        }

        self.engine.tick(now_ms);
        self.confirm_ticket = self.engine.pending_scroll().map(|p| p.ticket);

        let offset = self.engine.scroll_offset();
        if offset == self.applied_offset {
            return None;
        }
        self.applied_offset = offset;
        Some(offset)
    }

    pub fn capture_first_visible_anchor(&self) -> Option<ScrollAnchor> {
        capture_first_visible_anchor(&self.engine)
    }

    /// Captures an anchor for the item at a given position in the viewport.
    pub fn capture_anchor_at(&self, y: u64) -> Option<ScrollAnchor> {
        capture_anchor_at(&self.engine, y)
    }

    /// Applies a previously captured anchor; `shift` items were inserted in front of it.
    pub fn apply_anchor(&mut self, anchor: &ScrollAnchor, shift: usize) -> Result<bool, EngineError> {
        apply_anchor(&mut self.engine, anchor, shift)
    }
}

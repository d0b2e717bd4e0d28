use listwindow::{EngineError, WindowEngine};

/// A scroll anchor that can be used to preserve visual position across data changes.
///
/// Typical use cases:
/// - chat/timeline "prepend" (load older messages above) without content jumping
/// - swapping the dataset behind the engine while the viewport stays on the same item
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAnchor {
    pub index: usize,
    /// Where the anchor item starts, relative to the top of the viewport. Negative when the item
    /// is partially scrolled out.
    pub offset_in_viewport: i64,
}

/// Captures an anchor for the item under the given position of the viewport.
///
/// For example, `y = 0` anchors the item at the top edge of the viewport.
pub fn capture_anchor_at(engine: &WindowEngine, y: u64) -> Option<ScrollAnchor> {
    engine.current_range()?;
    let scroll = engine.scroll_offset();
    let index = engine.index_at_offset(scroll.saturating_add(y))?;
    let start = engine.item_offset(index)?;
    Some(ScrollAnchor {
        index,
        offset_in_viewport: start as i64 - scroll as i64,
    })
}

/// Captures an anchor for the first scrolled item, right below the pinned top items.
///
/// Returns `None` if the engine is idle or nothing is scrolled.
pub fn capture_first_visible_anchor(engine: &WindowEngine) -> Option<ScrollAnchor> {
    let pinned = engine
        .size_model()
        .offset_of(engine.window().top_item_count);
    capture_anchor_at(engine, pinned)
}

/// Applies a previously captured anchor by adjusting the scroll offset.
///
/// `shift` is the number of items inserted in front of the anchor since it was captured.
///
/// Returns `Ok(false)` when the shifted index is no longer part of the list.
pub fn apply_anchor(
    engine: &mut WindowEngine,
    anchor: &ScrollAnchor,
    shift: usize,
) -> Result<bool, EngineError> {
    if !engine.is_ready() {
        return Err(EngineError::NotReady);
    }
    let Some(start) = engine.item_offset(anchor.index.saturating_add(shift)) else {
        return Ok(false);
    };
    let target = (start as i64).saturating_sub(anchor.offset_in_viewport).max(0) as u64;
    engine.set_scroll_offset(target)?;
    Ok(true)
}

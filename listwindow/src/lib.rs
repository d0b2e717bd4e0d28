//! A headless windowing engine for very large lists, in the spirit of react-virtuoso.
//!
//! For adapter-level utilities (frame-deferred tasks, scroll anchoring), see the
//! `listwindow-adapter` crate.
//!
//! The engine keeps a run-length encoded size model (estimated sizes for items nobody has
//! measured yet, real sizes for items that were rendered), and turns a scroll offset plus a
//! viewport size into the window of items to render. It also handles the parts of list
//! virtualization that depend on the size model changing under your feet:
//!
//! - two-phase scroll-to-index requests that converge as measurements arrive
//! - prepending items without moving the visible content
//! - following the output when items are appended at the bottom
//! - pinned top items, grouped lists with sticky headers
//! - placeholder ("scroll seek") rendering during fast scrolling
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - the total item count
//! - viewport size and scroll offset (with timestamps for velocity-based features)
//! - item measurements, once items are laid out
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod engine;
mod error;
mod group;
mod options;
mod range;
mod scroll_seek;
mod signal;
mod size_model;
mod types;

#[cfg(test)]
mod tests;

pub use engine::{PendingScroll, WindowEngine};
pub use error::EngineError;
pub use group::{GroupIndexMapper, GroupedIndex};
pub use options::EngineOptions;
pub use range::{RangeInput, compute_range};
pub use scroll_seek::{ScrollSeekConfig, ScrollSeekDetector, SeekPhase, VelocityPredicate};
pub use signal::{Signal, Subscriber};
pub use size_model::{SizeChange, SizeModel};
pub use types::{
    Align, EnginePhase, ListItem, ListRange, ScrollLocation, ScrollTarget, SizeRun, Window,
};

//! Adapter utilities for the `listwindow` crate.
//!
//! The `listwindow` crate is UI-agnostic and focuses on the windowing math and state. This crate
//! provides small, framework-neutral helpers commonly needed by adapters:
//!
//! - A frame-driven [`Controller`] (deferred prepends, two-phase scroll confirmation)
//! - Scroll anchoring (e.g. prepend in chat/timelines without visual jumps)
//!
//! This crate is intentionally framework-agnostic (no ratatui/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod controller;


pub use anchor::{ScrollAnchor, apply_anchor, capture_anchor_at, capture_first_visible_anchor};
pub use controller::Controller;

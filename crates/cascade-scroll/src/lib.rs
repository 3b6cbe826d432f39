//! # Cascade scroll
//!
//! The control half of the cascade engine: an external scheduler calls the
//! [`FlowScrollController`] once per frame, which asks the layout algorithm
//! in `cascade-core` to extend the visible window, diffs the old and new
//! layout info to fire scroll/reach/index events, and adopts the new info
//! as current state.
//!
//! Gesture deltas arrive tagged with a [`ScrollSource`]; edge effects
//! decide whether boundary-crossing deltas are rejected outright or damped
//! by overscroll friction and later spring-backed. The state machine is
//! `Idle → Dragging → (Idle | Flinging → Idle | Bouncing → Idle)`.
//!
//! ```rust
//! use cascade_core::*;
//! use cascade_scroll::*;
//!
//! let config = FlowConfig {
//!     tracks: TracksTemplate::Count(2),
//!     ..FlowConfig::default()
//! };
//! let ctx = LayoutContext::new(1.0, Size::new(400.0, 600.0));
//! let mut items = ItemArena::from_extents(&vec![120.0; 50]);
//!
//! let mut controller = FlowScrollController::new(config);
//! controller.run_layout_pass(&mut items, &ctx);
//!
//! controller.begin_drag();
//! controller.drag_by(-200.0);
//! controller.run_layout_pass(&mut items, &ctx);
//! assert!(!controller.info().item_start);
//! ```

pub mod controller;
pub mod events;
pub mod physics;
pub mod tests;

pub use controller::{
    FlowScrollController, LAST_ITEM, OverScroll, RelayoutFlags, ScrollPhase, ScrollSource,
};
pub use events::{HandlerId, ScrollEvents};
pub use physics::{Fling, SpringBack, overscroll_friction};

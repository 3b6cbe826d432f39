//! # Cascade core
//!
//! The layout half of a virtualized masonry ("waterfall") scrolling engine:
//! an unbounded sequence of variable-size items is packed into N parallel
//! tracks, and only the currently visible index window is kept measured.
//!
//! Three pieces cooperate:
//!
//! - [`FlowLayoutInfo`]: placed-item geometry per track, plus the realized
//!   `[start_index, end_index]` window and boundary flags.
//! - [`FlowLayoutAlgorithm`]: one placement pass per frame, extending the
//!   previous frame's info until the viewport is covered.
//! - [`ItemSource`]: the seam to the host's scene tree; items are measured
//!   and placed through it, never held as pointers.
//!
//! ```rust
//! use cascade_core::*;
//!
//! let config = FlowConfig {
//!     tracks: "1fr 1fr".parse().unwrap(),
//!     ..FlowConfig::default()
//! };
//! let ctx = LayoutContext::new(1.0, Size::new(400.0, 600.0));
//! let mut items = ItemArena::from_extents(&[100.0, 50.0, 120.0, 30.0]);
//!
//! let algorithm = FlowLayoutAlgorithm::for_config(&config);
//! let info = algorithm.measure(FlowLayoutInfo::new(2), &mut items, &config, &ctx);
//! assert_eq!(info.cross_index_of(0), Some(0));
//! assert_eq!(info.cross_index_of(1), Some(1));
//! ```
//!
//! The companion `cascade-scroll` crate owns the per-frame control flow:
//! gesture deltas, edge effects, events, and jump/restore orchestration.

pub mod algorithm;
pub mod axis;
pub mod config;
pub mod geometry;
pub mod info;
pub mod measure;
pub mod restore;

pub use algorithm::FlowLayoutAlgorithm;
pub use axis::Axis;
pub use config::{EdgeEffect, FlowConfig, LayoutContext, TemplateError, TracksTemplate};
pub use geometry::{Rect, Size, Vec2};
pub use info::{FlowLayoutInfo, ItemSpan, Slot, Track};
pub use measure::{ItemArena, ItemNode, ItemSource, NodeKey};
pub use restore::RestoreState;

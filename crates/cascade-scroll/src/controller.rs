//! The scroll controller: owns the layout info, arbitrates gesture deltas
//! against edge effects, runs fling/spring physics, and emits scroll events
//! from the per-frame layout diff.
//!
//! All state transitions happen on the UI thread inside the frame pass; the
//! controller exclusively owns its [`FlowLayoutInfo`] and adopts a fresh one
//! after every layout pass (replace-on-write, never aliased).

use bitflags::bitflags;
use web_time::Instant;

use cascade_core::{
    EdgeEffect, FlowConfig, FlowLayoutAlgorithm, FlowLayoutInfo, ItemSource, LayoutContext, Rect,
    RestoreState,
};

use crate::events::ScrollEvents;
use crate::physics::{FLING_MIN_VELOCITY, Fling, SpringBack, overscroll_friction};

/// Sentinel accepted by [`FlowScrollController::request_jump_to`]; resolves
/// to the last item in the dataset.
pub const LAST_ITEM: usize = usize::MAX;

/// Origin of a scroll delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollSource {
    /// Direct finger/pointer drag.
    Drag,
    /// Inertial continuation after a drag release.
    Fling,
    /// Spring-back animation returning an overscrolled offset to bounds.
    Spring,
    /// Programmatic navigation.
    Jump,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollPhase {
    #[default]
    Idle,
    Dragging,
    Flinging,
    Bouncing,
}

bitflags! {
    /// Pending work the host scheduler should pick up before the next frame.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct RelayoutFlags: u8 {
        const LAYOUT = 1;
        const JUMP = 1 << 1;
    }
}

/// Portions of a hypothetical delta that would land past the content
/// bounds, used by a nested-scroll coordinator to split deltas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OverScroll {
    pub start: f32,
    pub end: f32,
}

pub struct FlowScrollController {
    info: FlowLayoutInfo,
    config: FlowConfig,
    events: ScrollEvents,
    phase: ScrollPhase,
    fling: Option<Fling>,
    spring: Option<SpringBack>,
    dirty: RelayoutFlags,
    stop_pending: bool,
    scrollable: bool,
    last_frame: Instant,
}

impl FlowScrollController {
    pub fn new(config: FlowConfig) -> Self {
        Self {
            info: FlowLayoutInfo::new(config.tracks.track_count()),
            config,
            events: ScrollEvents::new(),
            phase: ScrollPhase::Idle,
            fling: None,
            spring: None,
            dirty: RelayoutFlags::empty(),
            stop_pending: false,
            scrollable: false,
            last_frame: Instant::now(),
        }
    }

    pub fn info(&self) -> &FlowLayoutInfo {
        &self.info
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    pub fn events(&mut self) -> &mut ScrollEvents {
        &mut self.events
    }

    /// Pending relayout work, cleared on read.
    pub fn take_dirty(&mut self) -> RelayoutFlags {
        std::mem::take(&mut self.dirty)
    }

    /// Applies a main-axis scroll delta. Returns whether any state changed:
    /// a delta pushing past a reached boundary is rejected outright unless
    /// the spring edge effect is active, in which case direct-drag deltas
    /// are scaled down by the overscroll friction.
    pub fn apply_scroll_delta(&mut self, delta: f32, source: ScrollSource) -> bool {
        let mut delta = delta;
        if self.config.reverse && source != ScrollSource::Spring {
            delta = -delta;
        }

        if self.config.edge_effect != EdgeEffect::Spring {
            if self.info.item_start && delta > 0.0 {
                return false;
            }
            if self.info.offset_end && delta < 0.0 {
                return false;
            }
        } else if source == ScrollSource::Drag {
            let over = self.resulting_overscroll(delta);
            let viewport = self.info.last_main_size;
            if over > 0.0 && viewport > 0.0 {
                delta *= overscroll_friction(over / viewport);
            }
        }

        self.info.prev_offset = self.info.current_offset;
        self.info.current_offset += delta;
        self.dirty.insert(RelayoutFlags::LAYOUT);
        self.events.fire_offset(self.info.current_offset);
        true
    }

    /// How far past the nearest bound the offset would sit after `delta`.
    fn resulting_overscroll(&self, delta: f32) -> f32 {
        let next = self.info.current_offset + delta;
        if next > 0.0 {
            return next;
        }
        let min_offset = self.min_offset();
        if self.info.item_end && next < min_offset {
            return min_offset - next;
        }
        0.0
    }

    fn min_offset(&self) -> f32 {
        (self.info.last_main_size - self.info.content_main_extent()).min(0.0)
    }

    /// Content that exactly fits the viewport is still reported scrollable
    /// when bounce is always enabled, so edge feedback can play.
    pub fn is_scrollable(&self) -> bool {
        !(self.info.item_start && self.info.offset_end) || self.config.always_bounce
    }

    /// Splits a hypothetical delta into the portions consumed as overscroll
    /// at the start (only once index 0 is realized first) and at the end
    /// (only once the dataset end is placed), by clamped interval
    /// arithmetic against the current offset and content extent.
    pub fn overscroll_offset(&self, delta: f32) -> OverScroll {
        let mut result = OverScroll::default();
        let info = &self.info;
        if info.start_index == 0 {
            let start_pos = info.current_offset;
            let new_start = start_pos + delta;
            if start_pos > 0.0 && new_start > 0.0 {
                result.start = delta;
            } else if new_start > 0.0 {
                result.start = new_start;
            } else if start_pos > 0.0 {
                result.start = -start_pos;
            }
        }
        if info.item_end {
            let main = info.last_main_size;
            let end_pos = info.current_offset + info.content_main_extent();
            let new_end = end_pos + delta;
            if end_pos < main && new_end < main {
                result.end = delta;
            } else if new_end < main {
                result.end = new_end - main;
            } else if end_pos < main {
                result.end = main - end_pos;
            }
        }
        result
    }

    /// Runs one layout pass and adopts its result, firing the frame diff.
    pub fn run_layout_pass(&mut self, source: &mut dyn ItemSource, ctx: &LayoutContext) {
        let algorithm = FlowLayoutAlgorithm::for_config(&self.config);
        let new_info = algorithm.measure(self.info.clone(), source, &self.config, ctx);
        self.dirty = RelayoutFlags::empty();
        self.on_layout_pass_complete(new_info);
    }

    /// The per-frame diff hook: compares the adopted info against the fresh
    /// one, fires events in a fixed order, then adopts the new info.
    pub fn on_layout_pass_complete(&mut self, mut new_info: FlowLayoutInfo) {
        let old = &self.info;

        if self.events.has_scroll_handlers() {
            let delta = old.prev_offset - new_info.current_offset;
            self.events.fire_scroll(delta);
        }
        if (old.start_index, old.end_index) != (new_info.start_index, new_info.end_index) {
            self.events
                .fire_index_changed(new_info.start_index, new_info.end_index);
        }
        if new_info.item_start && !old.item_start {
            self.events.fire_reach_start();
        }
        if new_info.offset_end && !old.offset_end {
            self.events.fire_reach_end();
        }
        if self.stop_pending {
            self.stop_pending = false;
            self.events.fire_scroll_stop();
        }

        new_info.stored_offset = new_info.current_offset;
        self.info = new_info;
        self.info.update_start_index();
        self.scrollable = self.is_scrollable();
    }

    /// Stages a jump so the next layout pass re-anchors on `index`.
    /// Accepts [`LAST_ITEM`] as "the last item". Any in-flight animation is
    /// stopped first; the controller returns to `Idle` immediately.
    pub fn request_jump_to(&mut self, index: usize) {
        self.stop_animations();
        let target = if index == LAST_ITEM {
            self.info.children_count.saturating_sub(1)
        } else {
            index
        };
        log::debug!("jump requested to item {target}");
        self.info.jump_index = Some(target);
        self.dirty.insert(RelayoutFlags::JUMP | RelayoutFlags::LAYOUT);
    }

    pub fn serialize_restore_state(&self, ctx: &LayoutContext) -> RestoreState {
        RestoreState::new(
            self.info.start_index,
            ctx.px_to_vp(self.info.stored_offset) as f64,
        )
    }

    pub fn restore_state_json(&self, ctx: &LayoutContext) -> String {
        self.serialize_restore_state(ctx).to_json()
    }

    /// Applies persisted state: the next layout pass jumps to `begin_index`
    /// and adopts the stored offset, converted back to device pixels.
    pub fn restore(&mut self, state: RestoreState, ctx: &LayoutContext) {
        self.stop_animations();
        self.info.jump_index = Some(state.begin_index);
        self.info.restore_offset = Some(ctx.vp_to_px(state.offset as f32));
        self.dirty.insert(RelayoutFlags::JUMP | RelayoutFlags::LAYOUT);
    }

    pub fn restore_from_json(&mut self, json: &str, ctx: &LayoutContext) {
        self.restore(RestoreState::from_json(json), ctx);
    }

    /// Viewport-space rect of a materialized item; [`Rect::EMPTY`] outside
    /// the realized window.
    pub fn item_rect(&self, index: usize) -> Rect {
        let info = &self.info;
        if let (Some(fi), Some(span)) = (info.footer_index, info.footer_span) {
            if index == fi {
                let cross_full = info
                    .track_slots
                    .last()
                    .map_or(0.0, |&(pos, size)| pos + size);
                return info.project(span, (0.0, cross_full), self.config.axis, self.config.reverse);
            }
        }
        if index < info.start_index || index > info.end_index {
            return Rect::EMPTY;
        }
        let Some(track) = info.cross_index_of(index) else {
            return Rect::EMPTY;
        };
        let Some(&span) = info.tracks[track].get(&index) else {
            return Rect::EMPTY;
        };
        let Some(&cross) = info.track_slots.get(track) else {
            return Rect::EMPTY;
        };
        info.project(span, cross, self.config.axis, self.config.reverse)
    }

    // ----- gesture surface -------------------------------------------------

    pub fn begin_drag(&mut self) {
        self.stop_animations();
        self.phase = ScrollPhase::Dragging;
        self.last_frame = Instant::now();
    }

    pub fn drag_by(&mut self, delta: f32) -> bool {
        // A drag delta always takes over from an in-flight animation.
        self.fling = None;
        self.spring = None;
        self.phase = ScrollPhase::Dragging;
        self.apply_scroll_delta(delta, ScrollSource::Drag)
    }

    /// Drag release with residual velocity in px/s. Starts a fling, a
    /// spring-back when released while overscrolled, or settles to idle.
    pub fn end_drag(&mut self, velocity: f32) {
        if self.config.edge_effect == EdgeEffect::Spring {
            if let Some(bound) = self.out_of_bounds_target() {
                self.spring = Some(SpringBack::new(bound));
                self.phase = ScrollPhase::Bouncing;
                return;
            }
        }
        if velocity.abs() > FLING_MIN_VELOCITY {
            self.fling = Some(Fling::new(velocity));
            self.phase = ScrollPhase::Flinging;
            self.last_frame = Instant::now();
        } else {
            self.finish_scroll();
        }
    }

    /// Advances any in-flight animation one frame using wall time. Returns
    /// whether the controller still wants frames.
    pub fn animation_frame(&mut self) -> bool {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.step(dt)
    }

    /// Advances the animation state machine by `dt` seconds. Public so
    /// hosts with their own frame clock can drive it deterministically.
    pub fn step(&mut self, dt: f32) -> bool {
        match self.phase {
            ScrollPhase::Flinging => {
                let Some(mut fling) = self.fling.take() else {
                    self.phase = ScrollPhase::Idle;
                    return false;
                };
                match fling.tick(dt) {
                    None => {
                        self.finish_scroll();
                        false
                    }
                    Some(delta) => {
                        if !self.apply_scroll_delta(delta, ScrollSource::Fling) {
                            // Boundary with a non-spring edge effect.
                            self.finish_scroll();
                            return false;
                        }
                        if self.config.edge_effect == EdgeEffect::Spring {
                            if let Some(bound) = self.out_of_bounds_target() {
                                self.spring = Some(SpringBack::new(bound));
                                self.phase = ScrollPhase::Bouncing;
                                return true;
                            }
                        }
                        self.fling = Some(fling);
                        true
                    }
                }
            }
            ScrollPhase::Bouncing => {
                let Some(mut spring) = self.spring.take() else {
                    self.phase = ScrollPhase::Idle;
                    return false;
                };
                let current = self.info.current_offset;
                match spring.tick(current, dt) {
                    None => {
                        // Snap the residual so the offset lands on the bound.
                        self.apply_scroll_delta(spring.target() - current, ScrollSource::Spring);
                        self.finish_scroll();
                        false
                    }
                    Some(delta) => {
                        self.apply_scroll_delta(delta, ScrollSource::Spring);
                        self.spring = Some(spring);
                        true
                    }
                }
            }
            _ => false,
        }
    }

    /// The stop handle: cancels any in-flight animation and flags a
    /// scroll-stop for the next layout pass.
    pub fn stop_animations(&mut self) {
        self.fling = None;
        self.spring = None;
        if self.phase != ScrollPhase::Idle {
            self.phase = ScrollPhase::Idle;
            self.stop_pending = true;
        }
    }

    fn finish_scroll(&mut self) {
        self.fling = None;
        self.spring = None;
        self.phase = ScrollPhase::Idle;
        self.stop_pending = true;
    }

    /// The bound to spring back to, when the offset sits past one.
    fn out_of_bounds_target(&self) -> Option<f32> {
        if self.info.current_offset > 0.0 && self.info.start_index == 0 {
            return Some(0.0);
        }
        let min_offset = self.min_offset();
        if self.info.item_end && self.info.current_offset < min_offset {
            return Some(min_offset);
        }
        None
    }
}

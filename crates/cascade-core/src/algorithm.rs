//! Per-pass placement: fills the viewport window from the previous frame's
//! [`FlowLayoutInfo`] and returns the updated one.
//!
//! Placement is strictly sequential: item `n` can only be placed once items
//! `0..n` are, so the cached geometry is always a full prefix of the
//! dataset. Scrolling backward therefore never re-derives placement; it is
//! served from the retained cache until a data mutation clears it.

use smallvec::smallvec;

use crate::{EdgeEffect, FlowConfig, FlowLayoutInfo, ItemSource, ItemSpan, LayoutContext, Track};

pub struct FlowLayoutAlgorithm {
    /// When false, the pass never reports more trailing or leading space
    /// than the content actually has. When true, extra space is left in
    /// place for bounce rendering.
    pub can_overscroll: bool,
}

impl FlowLayoutAlgorithm {
    pub fn new(can_overscroll: bool) -> Self {
        Self { can_overscroll }
    }

    pub fn for_config(config: &FlowConfig) -> Self {
        Self::new(config.edge_effect == EdgeEffect::Spring || config.always_bounce)
    }

    /// Runs one layout pass. Takes the previous frame's info by value and
    /// returns the new one; the caller adopts it via the scroll controller.
    pub fn measure(
        &self,
        mut info: FlowLayoutInfo,
        source: &mut dyn ItemSource,
        config: &FlowConfig,
        ctx: &LayoutContext,
    ) -> FlowLayoutInfo {
        let viewport_main = config.axis.main(ctx.viewport);
        let viewport_cross = config.axis.cross(ctx.viewport);
        info.last_main_size = viewport_main;
        info.children_count = source.item_count();

        // Track widths drive item measurement, so a changed template or
        // cross extent invalidates all cached geometry.
        let slots = config.tracks.resolve(viewport_cross, config.cross_gap);
        if slots.len() != info.tracks.len() {
            info.tracks = smallvec![Track::new(); slots.len()];
        }
        if slots != info.track_slots {
            // Staged navigation survives the geometry invalidation; it is
            // consumed below, after placement restarts from the new slots.
            let jump = info.jump_index.take();
            let restore = info.restore_offset.take();
            info.reset();
            info.jump_index = jump;
            info.restore_offset = restore;
            info.track_slots = slots;
        }

        if info.children_count == 0 {
            info.reset();
            info.current_offset = 0.0;
            info.item_start = true;
            info.item_end = true;
            info.offset_end = true;
            return info;
        }

        let content_count = if config.footer {
            info.footer_index = Some(info.children_count - 1);
            info.children_count - 1
        } else {
            info.footer_index = None;
            info.children_count
        };

        // Guard against a dataset that shrank without an explicit reset.
        if let Some(max_placed) = Self::max_placed(&info) {
            if max_placed >= content_count {
                if content_count == 0 {
                    info.reset();
                    info.footer_index = config.footer.then(|| info.children_count - 1);
                } else {
                    info.clear_cache_after(content_count - 1);
                }
            }
        }

        if let Some(jump) = info.jump_index.take() {
            let target = jump.min(content_count.saturating_sub(1));
            log::debug!("consuming jump to item {target}");
            self.fill_to(&mut info, source, config, ctx, target, content_count);
            if let Some(offset) = info.restore_offset.take() {
                info.current_offset = offset;
            } else if let Some(track) = info.cross_index_of(target) {
                info.current_offset = -info.main_start(track, target);
            }
            info.prev_offset = info.current_offset;
        }

        if !self.can_overscroll && info.current_offset > 0.0 {
            info.current_offset = 0.0;
        }

        // Fill forward until every track covers the viewport end or the
        // dataset runs out.
        let mut next = Self::max_placed(&info).map_or(0, |m| m + 1);
        while next < content_count && !info.is_all_cross_reach_end(viewport_main) {
            Self::place_item(&mut info, source, config, ctx, next);
            next += 1;
        }
        info.item_end = next >= content_count;

        if info.item_end {
            if let Some(fi) = info.footer_index {
                let extent = config.clamp_extent(source.measure(fi, viewport_cross, ctx));
                let content_end = info.max_main_extent();
                let offset = if content_end > 0.0 {
                    content_end + config.main_gap
                } else {
                    0.0
                };
                info.footer_span = Some(ItemSpan::new(offset, extent));
            }
        } else {
            info.footer_span = None;
        }

        let content = info.content_main_extent();
        if !self.can_overscroll && info.item_end {
            let min_offset = (viewport_main - content).min(0.0);
            if info.current_offset < min_offset {
                info.current_offset = min_offset;
            }
        }

        info.item_start = info.current_offset >= 0.0;
        info.offset_end = info.item_end && info.current_offset + content <= viewport_main;

        info.update_start_index();
        info.update_end_index(viewport_main);
        self.place_back(&info, source, config, viewport_cross);

        log::trace!(
            "layout pass: window {}..={} offset {:.1} content {:.1} item_end {}",
            info.start_index,
            info.end_index,
            info.current_offset,
            content,
            info.item_end
        );
        info
    }

    fn max_placed(info: &FlowLayoutInfo) -> Option<usize> {
        info.tracks
            .iter()
            .filter_map(|t| t.keys().next_back().copied())
            .max()
    }

    /// Places item `index` into the slot chosen by the greedy balance rule.
    fn place_item(
        info: &mut FlowLayoutInfo,
        source: &mut dyn ItemSource,
        config: &FlowConfig,
        ctx: &LayoutContext,
        index: usize,
    ) {
        let slot = info.next_slot();
        let cross = info.track_slots.get(slot.track).map_or(0.0, |s| s.1);
        let extent = config.clamp_extent(source.measure(index, cross, ctx));
        let offset = match slot.last_item {
            Some(last) => info.tracks[slot.track][&last].end() + config.main_gap,
            None => 0.0,
        };
        info.tracks[slot.track].insert(index, ItemSpan::new(offset, extent));
    }

    /// Extends placement to `target` regardless of viewport coverage. Used
    /// when a jump discards the incremental continuation.
    fn fill_to(
        &self,
        info: &mut FlowLayoutInfo,
        source: &mut dyn ItemSource,
        config: &FlowConfig,
        ctx: &LayoutContext,
        target: usize,
        content_count: usize,
    ) {
        let target = target.min(content_count.saturating_sub(1));
        let mut next = Self::max_placed(info).map_or(0, |m| m + 1);
        while next <= target && next < content_count {
            Self::place_item(info, source, config, ctx, next);
            next += 1;
        }
    }

    /// Writes resolved rects for the realized window back to the source.
    fn place_back(
        &self,
        info: &FlowLayoutInfo,
        source: &mut dyn ItemSource,
        config: &FlowConfig,
        viewport_cross: f32,
    ) {
        let window = info.start_index..=info.end_index;
        for (ti, track) in info.tracks.iter().enumerate() {
            let Some(&cross) = info.track_slots.get(ti) else {
                continue;
            };
            for (&item, &span) in track.range(window.clone()) {
                source.place(item, info.project(span, cross, config.axis, config.reverse));
            }
        }
        if let (Some(fi), Some(span)) = (info.footer_index, info.footer_span) {
            source.place(
                fi,
                info.project(span, (0.0, viewport_cross), config.axis, config.reverse),
            );
        }
    }
}

//! Placed-item geometry for a cascade ("waterfall") layout.
//!
//! Each track owns an ordered map from item index to its main-axis span.
//! Ordering is by item index, not by offset: consecutive indices interleave
//! across tracks, so a `BTreeMap` keyed by index is the natural shape. The
//! aggregate [`FlowLayoutInfo`] is rebuilt incrementally by the layout
//! algorithm each frame and adopted wholesale by the scroll controller; no
//! other component holds a live reference into it between frames.

use std::collections::BTreeMap;

use smallvec::{SmallVec, smallvec};

use crate::{Axis, Rect};

/// Main-axis span of one placed item inside its track.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ItemSpan {
    /// Leading edge, relative to the content origin.
    pub offset: f32,
    /// Main-axis length.
    pub extent: f32,
}

impl ItemSpan {
    pub fn new(offset: f32, extent: f32) -> Self {
        Self { offset, extent }
    }

    pub fn end(&self) -> f32 {
        self.offset + self.extent
    }
}

/// One column (or row) of the masonry layout.
pub type Track = BTreeMap<usize, ItemSpan>;

/// Placement target chosen by the greedy balance rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub track: usize,
    /// Index of the track's current last item; `None` for an empty track.
    pub last_item: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct FlowLayoutInfo {
    pub tracks: SmallVec<[Track; 4]>,
    /// Resolved `(cross position, cross size)` per track, written by the
    /// layout pass and read back when projecting item rects.
    pub track_slots: Vec<(f32, f32)>,
    /// Signed main-axis offset of the content relative to the viewport
    /// origin. Zero means the first item sits at the viewport start;
    /// scrolling forward drives it negative.
    pub current_offset: f32,
    /// `current_offset` from the immediately preceding frame.
    pub prev_offset: f32,
    /// Main-axis extent of the viewport at the last layout pass.
    pub last_main_size: f32,
    /// Realized (measured) item window, inclusive on both ends.
    pub start_index: usize,
    pub end_index: usize,
    /// Pending jump target; consumed and cleared by the next layout pass.
    pub jump_index: Option<usize>,
    /// Index of the trailing full-width footer item, when configured.
    pub footer_index: Option<usize>,
    /// Geometry of the placed footer, spanning the full cross axis.
    pub footer_span: Option<ItemSpan>,
    /// First item's leading edge is at or after the viewport start.
    pub item_start: bool,
    /// Trailing content has reached the viewport end.
    pub offset_end: bool,
    /// Every track has been populated to the end of the dataset.
    pub item_end: bool,
    /// Offset staged for serialization.
    pub stored_offset: f32,
    /// Offset staged by a restore, consumed by the next layout pass.
    pub restore_offset: Option<f32>,
    /// Total dataset size, footer included.
    pub children_count: usize,
}

impl FlowLayoutInfo {
    pub fn new(track_count: usize) -> Self {
        Self {
            tracks: smallvec![Track::new(); track_count.max(1)],
            ..Default::default()
        }
    }

    /// The track holding `item`, or `None` when the item is virtualized out
    /// or not yet placed.
    pub fn cross_index_of(&self, item: usize) -> Option<usize> {
        self.tracks.iter().position(|t| t.contains_key(&item))
    }

    /// Greedy placement target for the next item: the first empty track wins
    /// immediately, otherwise the track with the smallest accumulated end.
    /// The strict `<` scan makes the lowest track index win ties, which keeps
    /// the max height difference between tracks bounded by the tallest
    /// single item.
    pub fn next_slot(&self) -> Slot {
        let mut best: Option<(usize, usize, f32)> = None;
        for (i, track) in self.tracks.iter().enumerate() {
            match track.last_key_value() {
                None => {
                    return Slot {
                        track: i,
                        last_item: None,
                    };
                }
                Some((&item, span)) => {
                    let end = span.end();
                    if best.is_none_or(|(_, _, b)| end < b) {
                        best = Some((i, item, end));
                    }
                }
            }
        }
        match best {
            Some((track, item, _)) => Slot {
                track,
                last_item: Some(item),
            },
            None => Slot {
                track: 0,
                last_item: None,
            },
        }
    }

    /// Main-axis extent of `item` in `track`; `0.0` when absent.
    pub fn main_extent(&self, track: usize, item: usize) -> f32 {
        self.tracks
            .get(track)
            .and_then(|t| t.get(&item))
            .map_or(0.0, |s| s.extent)
    }

    /// Leading edge of `item` in `track`; `0.0` when absent.
    pub fn main_start(&self, track: usize, item: usize) -> f32 {
        self.tracks
            .get(track)
            .and_then(|t| t.get(&item))
            .map_or(0.0, |s| s.offset)
    }

    /// Total main-axis length of the placed content (max across tracks),
    /// footer excluded.
    pub fn max_main_extent(&self) -> f32 {
        self.tracks
            .iter()
            .filter_map(|t| t.last_key_value().map(|(_, s)| s.end()))
            .fold(0.0, f32::max)
    }

    /// Content length including the trailing footer, when placed.
    pub fn content_main_extent(&self) -> f32 {
        match self.footer_span {
            Some(span) => self.max_main_extent().max(span.end()),
            None => self.max_main_extent(),
        }
    }

    /// Largest item index whose trailing edge, shifted by `offset`, is still
    /// past the viewport start in any track. Decides how far forward layout
    /// must extend for a hypothetical additional scroll of `offset`.
    pub fn end_index_by_offset(&self, offset: f32) -> Option<usize> {
        let mut result: Option<usize> = None;
        for track in &self.tracks {
            for (&item, span) in track.iter().rev() {
                if span.end() + offset > 0.0 {
                    result = Some(result.map_or(item, |r| r.max(item)));
                    break;
                }
            }
        }
        result
    }

    /// True only when every track is populated and its last item's trailing
    /// edge, shifted by the current offset, covers the viewport end. The
    /// layout pass stops generating items once this holds.
    pub fn is_all_cross_reach_end(&self, viewport_main: f32) -> bool {
        !self.tracks.is_empty()
            && self.tracks.iter().all(|t| {
                t.last_key_value()
                    .is_some_and(|(_, span)| span.end() + self.current_offset >= viewport_main)
            })
    }

    /// Recomputes `start_index`: the minimum item index across tracks whose
    /// trailing edge is still at or past the viewport start. Short-circuits
    /// while the recorded start item still straddles the boundary.
    pub fn update_start_index(&mut self) {
        if let Some(track) = self.cross_index_of(self.start_index) {
            if let Some(span) = self.tracks[track].get(&self.start_index) {
                let still_first = span.end() + self.current_offset >= 0.0
                    && span.offset + self.current_offset < 0.0;
                if still_first {
                    return;
                }
            }
        }
        let mut candidate: Option<usize> = None;
        for track in &self.tracks {
            // Spans within a track ascend with item index, so the first hit
            // is that track's minimum.
            for (&item, span) in track.iter() {
                if span.end() + self.current_offset >= 0.0 {
                    candidate = Some(candidate.map_or(item, |c| c.min(item)));
                    break;
                }
            }
        }
        if let Some(idx) = candidate {
            self.start_index = idx;
        }
    }

    /// Recomputes `end_index`: the largest placed index whose leading edge
    /// is still before the viewport end.
    pub fn update_end_index(&mut self, viewport_main: f32) {
        let mut candidate: Option<usize> = None;
        for track in &self.tracks {
            for (&item, span) in track.iter().rev() {
                if span.offset + self.current_offset < viewport_main {
                    candidate = Some(candidate.map_or(item, |c| c.max(item)));
                    break;
                }
            }
        }
        if let Some(idx) = candidate {
            self.end_index = idx;
        }
    }

    /// Erases cached geometry for every item index greater than `index`.
    /// Idempotent; entries at or below `index` are untouched.
    pub fn clear_cache_after(&mut self, index: usize) {
        for track in &mut self.tracks {
            track.split_off(&(index + 1));
        }
        self.end_index = self.end_index.min(index);
        // Trailing state is stale until the next pass re-derives it.
        self.item_end = false;
        self.offset_end = false;
        self.footer_span = None;
    }

    pub fn cross_count(&self) -> usize {
        self.tracks.len()
    }

    /// Deepest per-track count of items inside the realized window.
    pub fn main_count(&self) -> usize {
        if self.tracks.iter().all(|t| t.is_empty()) {
            return 0;
        }
        self.tracks
            .iter()
            .map(|t| t.range(self.start_index..=self.end_index).count())
            .max()
            .unwrap_or(0)
    }

    /// Clears all cached geometry and flags. Used on full dataset
    /// replacement; the scroll offset survives.
    pub fn reset(&mut self) {
        for track in &mut self.tracks {
            track.clear();
        }
        self.start_index = 0;
        self.end_index = 0;
        self.jump_index = None;
        self.footer_index = None;
        self.footer_span = None;
        self.item_start = false;
        self.offset_end = false;
        self.item_end = false;
    }

    /// Projects a placed span into viewport space using the given track's
    /// cross `(position, size)` slot.
    pub fn project(&self, span: ItemSpan, cross: (f32, f32), axis: Axis, reverse: bool) -> Rect {
        let main = if reverse {
            self.last_main_size - (span.offset + self.current_offset) - span.extent
        } else {
            span.offset + self.current_offset
        };
        axis.pack_rect(main, span.extent, cross.0, cross.1)
    }

    /// Invalidates geometry from `index` onward. A mutation that only
    /// affects not-yet-materialized items is a no-op; `index == end_index`
    /// still invalidates, since the window end item is materialized.
    pub fn reset_from(&mut self, index: usize) {
        let has_items = self.tracks.iter().any(|t| !t.is_empty());
        if !has_items || index > self.end_index {
            return;
        }
        if index == 0 {
            self.reset();
        } else {
            self.clear_cache_after(index - 1);
        }
    }
}

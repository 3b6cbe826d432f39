//! Layout configuration consumed (not owned) by the engine.
//!
//! The cross axis is divided between tracks by a [`TracksTemplate`], either a
//! plain track count or a weighted `"1fr 2fr 1fr"` template string. Density
//! and viewport metrics travel in a [`LayoutContext`] value that callers
//! thread through every measure pass instead of ambient globals.

use std::str::FromStr;

use crate::{Axis, Size};

/// Behavior when the scroll position is dragged past the content bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeEffect {
    /// Deltas past a reached boundary are rejected outright.
    #[default]
    None,
    /// Deltas are rejected; the host may render a fade glow instead.
    Fade,
    /// Overscroll is allowed with friction and springs back to bounds.
    Spring,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("empty tracks template")]
    Empty,
    #[error("bad template piece `{0}`, expected an integer or `<n>fr`")]
    BadPiece(String),
}

/// How many tracks the cross axis holds and how wide each one is.
#[derive(Clone, Debug, PartialEq)]
pub enum TracksTemplate {
    /// `n` equally sized tracks.
    Count(usize),
    /// One track per weight, sized proportionally.
    Weighted(Vec<f32>),
}

impl Default for TracksTemplate {
    fn default() -> Self {
        TracksTemplate::Count(1)
    }
}

impl TracksTemplate {
    pub fn track_count(&self) -> usize {
        match self {
            TracksTemplate::Count(n) => (*n).max(1),
            TracksTemplate::Weighted(w) => w.len().max(1),
        }
    }

    /// Splits `available_cross` into per-track `(position, size)` slots with
    /// `gap` between neighbours. Weights are normalized; leftover rounding
    /// space goes to the leading tracks.
    pub fn resolve(&self, available_cross: f32, gap: f32) -> Vec<(f32, f32)> {
        let count = self.track_count();
        let gap = gap.max(0.0);
        let available = (available_cross - gap * (count.saturating_sub(1)) as f32).max(0.0);

        let weights: Vec<f32> = match self {
            TracksTemplate::Count(_) => vec![1.0; count],
            TracksTemplate::Weighted(w) => w.iter().map(|v| v.max(0.0)).collect(),
        };
        let total: f32 = weights.iter().sum();
        let total = if total > 0.0 { total } else { count as f32 };

        let mut slots = Vec::with_capacity(count);
        let mut cursor = 0.0;
        for w in &weights {
            let size = available * (w / total);
            slots.push((cursor, size));
            cursor += size + gap;
        }
        slots
    }
}

impl FromStr for TracksTemplate {
    type Err = TemplateError;

    /// Parses either a bare track count (`"3"`) or a space separated list of
    /// fraction units (`"1fr 2fr 1fr"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TemplateError::Empty);
        }
        if let Ok(count) = s.parse::<usize>() {
            if count == 0 {
                return Err(TemplateError::BadPiece(s.to_string()));
            }
            return Ok(TracksTemplate::Count(count));
        }
        let mut weights = Vec::new();
        for piece in s.split_whitespace() {
            let weight = piece
                .strip_suffix("fr")
                .and_then(|n| n.parse::<f32>().ok())
                .filter(|w| *w > 0.0)
                .ok_or_else(|| TemplateError::BadPiece(piece.to_string()))?;
            weights.push(weight);
        }
        Ok(TracksTemplate::Weighted(weights))
    }
}

/// Static layout configuration for one cascade element.
#[derive(Clone, Debug)]
pub struct FlowConfig {
    pub axis: Axis,
    pub tracks: TracksTemplate,
    /// Gap between items within a track, px.
    pub main_gap: f32,
    /// Gap between tracks, px.
    pub cross_gap: f32,
    /// Clamp applied to measured item main extents, px.
    pub item_extent_min: Option<f32>,
    pub item_extent_max: Option<f32>,
    /// Layout direction reversed along the main axis.
    pub reverse: bool,
    pub edge_effect: EdgeEffect,
    /// Report content scrollable even when it fits the viewport, so edge
    /// feedback can still play.
    pub always_bounce: bool,
    /// The last child is a full-width trailing footer, not a track item.
    pub footer: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Vertical,
            tracks: TracksTemplate::default(),
            main_gap: 0.0,
            cross_gap: 0.0,
            item_extent_min: None,
            item_extent_max: None,
            reverse: false,
            edge_effect: EdgeEffect::None,
            always_bounce: false,
            footer: false,
        }
    }
}

impl FlowConfig {
    pub fn clamp_extent(&self, extent: f32) -> f32 {
        let mut e = extent.max(0.0);
        if let Some(max) = self.item_extent_max {
            e = e.min(max);
        }
        if let Some(min) = self.item_extent_min {
            e = e.max(min);
        }
        e
    }
}

/// Density and viewport metrics threaded through measure calls.
#[derive(Clone, Copy, Debug)]
pub struct LayoutContext {
    /// px per density-independent unit (vp).
    pub density: f32,
    pub viewport: Size,
}

impl LayoutContext {
    pub fn new(density: f32, viewport: Size) -> Self {
        Self {
            density: if density > 0.0 { density } else { 1.0 },
            viewport,
        }
    }

    pub fn px_to_vp(&self, px: f32) -> f32 {
        px / self.density
    }

    pub fn vp_to_px(&self, vp: f32) -> f32 {
        vp * self.density
    }
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self {
            density: 1.0,
            viewport: Size::default(),
        }
    }
}

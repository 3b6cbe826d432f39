use crate::{Rect, Size};

/// Scroll axis of a cascade layout. Items accumulate length along the main
/// axis; tracks sit side by side along the cross axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

impl Axis {
    pub fn main(&self, size: Size) -> f32 {
        match self {
            Axis::Vertical => size.height,
            Axis::Horizontal => size.width,
        }
    }

    pub fn cross(&self, size: Size) -> f32 {
        match self {
            Axis::Vertical => size.width,
            Axis::Horizontal => size.height,
        }
    }

    pub fn pack_size(&self, main: f32, cross: f32) -> Size {
        match self {
            Axis::Vertical => Size {
                width: cross,
                height: main,
            },
            Axis::Horizontal => Size {
                width: main,
                height: cross,
            },
        }
    }

    pub fn pack_rect(&self, main_start: f32, main_extent: f32, cross_start: f32, cross_extent: f32) -> Rect {
        match self {
            Axis::Vertical => Rect::new(cross_start, main_start, cross_extent, main_extent),
            Axis::Horizontal => Rect::new(main_start, cross_start, main_extent, cross_extent),
        }
    }
}

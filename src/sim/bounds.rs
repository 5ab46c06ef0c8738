//! Visible-area bounds
//!
//! Screen geometry arrives only after the first layout, so bounds start out
//! unknown. Unknown bounds are treated as infinite: nothing is ever out of view.

use glam::Vec2;

/// Width/height of the visible area, if known
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    size: Option<Vec2>,
}

impl Bounds {
    pub const UNKNOWN: Bounds = Bounds { size: None };

    /// Zero, negative or NaN sizes leave the bounds unknown
    pub fn new(width: f32, height: f32) -> Self {
        if width > 0.0 && height > 0.0 {
            Self {
                size: Some(Vec2::new(width, height)),
            }
        } else {
            Self::UNKNOWN
        }
    }

    pub fn is_known(&self) -> bool {
        self.size.is_some()
    }

    pub fn size(&self) -> Option<Vec2> {
        self.size
    }

    /// True if `pos` lies outside `[-radius, bound + radius]` on either axis
    pub fn is_out_of_view(&self, pos: Vec2, radius: f32) -> bool {
        let Some(size) = self.size else {
            return false;
        };
        pos.x < -radius || pos.x > size.x + radius || pos.y < -radius || pos.y > size.y + radius
    }
}

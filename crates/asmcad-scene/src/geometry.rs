//! Integer screen geometry
//!
//! Points are [`IVec2`] in window pixels, y pointing down.

use glam::IVec2;

/// Axis-aligned integer rectangle anchored at its upper-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub origin: IVec2,
    pub size: IVec2,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: IVec2::ZERO,
        size: IVec2::ZERO,
    };

    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            origin: IVec2::new(x, y),
            size: IVec2::new(w, h),
        }
    }

    pub fn from_origin_size(origin: IVec2, size: IVec2) -> Self {
        Self { origin, size }
    }

    pub fn left(&self) -> i32 {
        self.origin.x
    }

    pub fn top(&self) -> i32 {
        self.origin.y
    }

    pub fn right(&self) -> i32 {
        self.origin.x + self.size.x
    }

    pub fn bottom(&self) -> i32 {
        self.origin.y + self.size.y
    }

    /// Hit test. All four edges count as inside.
    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Whether the two rectangles share any area or edge
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }
}

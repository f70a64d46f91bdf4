//! Axis-aligned collision rectangles

use glam::IVec2;

/// An axis-aligned box in pixel units.
///
/// As stored on an agent the box is an offset plus a size, relative to the
/// agent's world position. [`Rect::translated`] produces the world-space copy
/// used for overlap tests; the stored box itself is never moved by a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left edge (or x offset from the owner's position)
    pub x: i32,
    /// Top edge (or y offset from the owner's position)
    pub y: i32,
    /// Width in pixels
    pub w: i32,
    /// Height in pixels
    pub h: i32,
}

impl Rect {
    /// Create a new rectangle
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// A copy of this rectangle shifted by `pos`
    #[must_use]
    pub const fn translated(self, pos: IVec2) -> Self {
        Self {
            x: self.x + pos.x,
            y: self.y + pos.y,
            w: self.w,
            h: self.h,
        }
    }

    /// Left edge
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Right edge (exclusive)
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Top edge
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Bottom edge (exclusive)
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Strict overlap test. Touching edges do not count, and zero-area
    /// rectangles never intersect anything.
    #[must_use]
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

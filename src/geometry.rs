// =============================================================================
// GEOMETRY.RS — Screen-space primitives for window placement
//
// Everything the placement code needs to reason about windows on screen:
// - Integer pixel points (glam's IVec2) and sizes
// - Rectangles with bounds / centring helpers
// - Axis clamping with the "clamp low first, then high" rule windows use
// =============================================================================

use serde::Deserialize;

/// Integer screen position in pixels, y pointing down.
pub type Point = glam::IVec2;

/// Width × height in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}

impl Default for Size {
    /// 32×32, the size every bubble sprite is assumed to have when the real
    /// bitmap is unavailable.
    fn default() -> Self {
        Self { w: 32, h: 32 }
    }
}

/// Axis-aligned rectangle: top-left origin plus size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self { x: origin.x, y: origin.y, w: size.w, h: size.h }
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// True when the whole rectangle lies inside `bounds`.
    pub fn fits_within(&self, bounds: Size) -> bool {
        self.x >= 0 && self.y >= 0 && self.right() <= bounds.w && self.bottom() <= bounds.h
    }

    /// Same rectangle grown (or shrunk, for negative values) on each side.
    pub fn offset(&self, dx: i32, dy: i32, dw: i32, dh: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy, w: self.w + dw, h: self.h + dh }
    }
}

/// Clamp `value` into `[0, max]`.
///
/// The lower bound is applied first, so when `max` is negative (an item wider
/// than the screen) the result is `max`, not `0`. Window code relies on this
/// ordering to keep right-edge alignment for oversized windows.
#[inline]
pub fn clamp_axis(value: i32, max: i32) -> i32 {
    value.max(0).min(max)
}

/// Top-left origin that centres `inner` inside `outer`.
///
/// Uses integer division per axis, the way host windows are centred.
#[inline]
pub fn centered_origin(outer: Size, inner: Size) -> Point {
    Point::new((outer.w - inner.w) / 2, (outer.h - inner.h) / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_axis_inside_range_is_identity() {
        assert_eq!(clamp_axis(10, 100), 10);
    }

    #[test]
    fn clamp_axis_negative_goes_to_zero() {
        assert_eq!(clamp_axis(-5, 100), 0);
    }

    #[test]
    fn clamp_axis_past_max_goes_to_max() {
        assert_eq!(clamp_axis(150, 100), 100);
    }

    #[test]
    fn clamp_axis_negative_max_wins() {
        // Oversized item: upper bound applied last.
        assert_eq!(clamp_axis(10, -20), -20);
    }

    #[test]
    fn centered_origin_uses_integer_halves() {
        let p = centered_origin(Size::new(544, 416), Size::new(101, 51));
        assert_eq!(p, Point::new(221, 182));
    }

    #[test]
    fn rect_fits_within_bounds() {
        let bounds = Size::new(100, 100);
        assert!(Rect::new(0, 0, 100, 100).fits_within(bounds));
        assert!(!Rect::new(1, 0, 100, 100).fits_within(bounds));
        assert!(!Rect::new(0, -1, 10, 10).fits_within(bounds));
    }
}

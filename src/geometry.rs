//! Axis-aligned rectangles used for zones, obstacles and vehicle footprints.
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Extent along x.
    pub width: f32,
    /// Extent along y.
    pub height: f32,
}

impl Rect {
    /// Rectangle with top-left corner `(x, y)`.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle from its centre point and size.
    ///
    /// # Examples
    /// ```
    /// use haulage::geometry::Rect;
    /// let r = Rect::from_center(glam::Vec2::new(10.0, 10.0), 4.0, 2.0);
    /// assert_eq!(r, Rect::new(8.0, 9.0, 4.0, 2.0));
    /// ```
    #[must_use]
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// `true` when either extent is non-positive or any field is not finite.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let finite = self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite();
        !finite || self.width <= 0.0 || self.height <= 0.0
    }

    /// Strict overlap test: rectangles that merely share an edge do not
    /// overlap.
    ///
    /// # Examples
    /// ```
    /// use haulage::geometry::Rect;
    /// let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    /// assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
    /// assert!(!a.overlaps(&Rect::new(10.0, 0.0, 5.0, 5.0)));
    /// ```
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// `true` when `point` lies inside or on the edge.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// `true` when `other` lies entirely inside `self` (edges included).
    #[must_use]
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Axis-aligned bounds of a `width`×`height` box centred on `center` and
    /// rotated by `rotation` radians.
    #[must_use]
    pub fn rotated_bounds(center: Vec2, width: f32, height: f32, rotation: f32) -> Self {
        let (sin, cos) = rotation.sin_cos();
        let extent_x = (width * cos).abs() + (height * sin).abs();
        let extent_y = (width * sin).abs() + (height * cos).abs();
        Self::from_center(center, extent_x, extent_y)
    }

    /// Clamps `point` into the rectangle.
    #[must_use]
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            crate::math::clamp(point.x, self.x, self.right()),
            crate::math::clamp(point.y, self.y, self.bottom()),
        )
    }

    /// Smallest translation that moves `self` out of `other`.
    ///
    /// Resolves along the axis of least penetration. Returns `Vec2::ZERO` when
    /// the rectangles do not overlap.
    #[must_use]
    pub fn separation_from(&self, other: &Self) -> Vec2 {
        if !self.overlaps(other) {
            return Vec2::ZERO;
        }
        let push_left = other.x - self.right();
        let push_right = other.right() - self.x;
        let push_up = other.y - self.bottom();
        let push_down = other.bottom() - self.y;

        let horizontal = if push_right < -push_left {
            push_right
        } else {
            push_left
        };
        let vertical = if push_down < -push_up {
            push_down
        } else {
            push_up
        };

        if horizontal.abs() < vertical.abs() {
            Vec2::new(horizontal, 0.0)
        } else {
            Vec2::new(0.0, vertical)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::f32::consts::FRAC_PI_2;

    #[rstest]
    #[case(Rect::new(0.0, 0.0, 5.0, 5.0), true)]
    #[case(Rect::new(-5.0, -5.0, 5.0, 5.0), false)]
    #[case(Rect::new(9.9, 9.9, 1.0, 1.0), true)]
    #[case(Rect::new(20.0, 0.0, 1.0, 1.0), false)]
    fn overlap_cases(#[case] other: Rect, #[case] expected: bool) {
        let zone = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(zone.overlaps(&other), expected);
        assert_eq!(other.overlaps(&zone), expected);
    }

    #[rstest]
    fn rotated_bounds_swap_extents_at_right_angle() {
        let bounds = Rect::rotated_bounds(Vec2::ZERO, 64.0, 32.0, FRAC_PI_2);
        assert_relative_eq!(bounds.width, 32.0, epsilon = 1e-3);
        assert_relative_eq!(bounds.height, 64.0, epsilon = 1e-3);
        assert_relative_eq!(bounds.center().x, 0.0, epsilon = 1e-3);
    }

    #[rstest]
    fn separation_uses_shallowest_axis() {
        let obstacle = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mover = Rect::new(95.0, 40.0, 20.0, 20.0);
        let push = mover.separation_from(&obstacle);
        assert_relative_eq!(push.x, 5.0);
        assert_relative_eq!(push.y, 0.0);

        let moved = Rect::new(mover.x + push.x, mover.y, mover.width, mover.height);
        assert!(!moved.overlaps(&obstacle));
    }

    #[rstest]
    fn separation_is_zero_when_apart() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(5.0, 5.0, 1.0, 1.0);
        assert_eq!(a.separation_from(&b), Vec2::ZERO);
    }

    #[rstest]
    #[case(Rect::new(0.0, 0.0, 0.0, 5.0))]
    #[case(Rect::new(0.0, 0.0, 5.0, -1.0))]
    #[case(Rect::new(f32::NAN, 0.0, 5.0, 5.0))]
    fn degenerate_rects(#[case] rect: Rect) {
        assert!(rect.is_degenerate());
    }
}

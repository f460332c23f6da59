//! 2D vectors and axis-aligned rectangles in display coordinates.

use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A 2D point or size.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
pub struct Vec2 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
}

impl Vec2 {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);
    /// `(1, 1)`.
    pub const ONE: Self = Self::new(1.0, 1.0);
    /// Sentinel used for "no valid position" (e.g. mouse outside the display).
    pub const INVALID: Self = Self::new(-f32::MAX, -f32::MAX);

    /// Creates a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Both components set to `v`.
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v)
    }

    /// Squared length.
    #[inline]
    #[must_use]
    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Dot product.
    #[inline]
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Component-wise minimum.
    #[inline]
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise maximum.
    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Component-wise clamp.
    #[inline]
    #[must_use]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        Self::new(self.x.max(min.x).min(max.x), self.y.max(min.y).min(max.y))
    }

    /// Component-wise product.
    #[inline]
    #[must_use]
    pub fn mul_elem(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }

    /// Rounds both components down.
    #[inline]
    #[must_use]
    pub fn floor(self) -> Self {
        Self::new(self.x.floor(), self.y.floor())
    }

    /// Linear interpolation towards `other`.
    #[inline]
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    /// Per-axis linear interpolation towards `other`.
    #[inline]
    #[must_use]
    pub fn lerp_xy(self, other: Self, t: Self) -> Self {
        Self::new(self.x + (other.x - self.x) * t.x, self.y + (other.y - self.y) * t.y)
    }

    /// Returns true unless this is [`Vec2::INVALID`]-like.
    #[inline]
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.x >= -256_000.0 && self.y >= -256_000.0
    }

    /// Returns the component on the given axis (0 = x, 1 = y).
    #[inline]
    #[must_use]
    pub fn axis(self, axis: usize) -> f32 {
        if axis == 0 {
            self.x
        } else {
            self.y
        }
    }

    /// Mutable access to the component on the given axis.
    #[inline]
    pub fn axis_mut(&mut self, axis: usize) -> &mut f32 {
        if axis == 0 {
            &mut self.x
        } else {
            &mut self.y
        }
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from(v: [f32; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from(v: (f32, f32)) -> Self {
        Self::new(v.0, v.1)
    }
}

impl From<Vec2> for [f32; 2] {
    fn from(v: Vec2) -> Self {
        [v.x, v.y]
    }
}

impl Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl MulAssign<f32> for Vec2 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Div<f32> for Vec2 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// An axis-aligned rectangle stored as `min` (top-left) and `max`
/// (bottom-right) corners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub min: Vec2,
    /// Bottom-right corner.
    pub max: Vec2,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self {
        min: Vec2::ZERO,
        max: Vec2::ZERO,
    };

    /// An inverted rect that becomes the bounds of whatever is added to it.
    pub const EMPTY: Self = Self {
        min: Vec2::new(f32::MAX, f32::MAX),
        max: Vec2::new(-f32::MAX, -f32::MAX),
    };

    /// Creates a rectangle from its corners.
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates a rectangle from corner coordinates.
    #[must_use]
    pub const fn from_coords(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(Vec2::new(x1, y1), Vec2::new(x2, y2))
    }

    /// Creates a rectangle from position and size.
    #[must_use]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos, pos + size)
    }

    /// Width.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Size as a vector.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Center point.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Top-right corner.
    #[inline]
    #[must_use]
    pub fn top_right(&self) -> Vec2 {
        Vec2::new(self.max.x, self.min.y)
    }

    /// Bottom-left corner.
    #[inline]
    #[must_use]
    pub fn bottom_left(&self) -> Vec2 {
        Vec2::new(self.min.x, self.max.y)
    }

    /// Returns true if the point is inside (max edges exclusive).
    #[inline]
    #[must_use]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.y >= self.min.y && p.x < self.max.x && p.y < self.max.y
    }

    /// Returns true if `other` lies entirely inside this rectangle.
    #[inline]
    #[must_use]
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    /// Returns true if two rectangles overlap.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        other.min.y < self.max.y
            && other.max.y > self.min.y
            && other.min.x < self.max.x
            && other.max.x > self.min.x
    }

    /// Grows the rectangle to include a point.
    #[inline]
    pub fn add_point(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Grows the rectangle to include another rectangle.
    #[inline]
    pub fn add_rect(&mut self, other: &Self) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Clips this rectangle against `clip`, collapsing to an empty rect
    /// rather than inverting when there is no overlap.
    #[inline]
    pub fn clip_with(&mut self, clip: &Self) {
        self.min = self.min.max(clip.min);
        self.max = self.max.min(clip.max);
        self.max = self.max.max(self.min);
    }

    /// Returns the intersection, or `None` if they don't overlap.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.overlaps(other) {
            return None;
        }
        let mut r = *self;
        r.clip_with(other);
        Some(r)
    }

    /// Expands the rectangle by the given amount on all sides.
    #[must_use]
    pub fn expand(&self, amount: f32) -> Self {
        self.expand_xy(Vec2::splat(amount))
    }

    /// Expands the rectangle by different amounts per axis.
    #[must_use]
    pub fn expand_xy(&self, amount: Vec2) -> Self {
        Self::new(self.min - amount, self.max + amount)
    }

    /// Shrinks the rectangle by the given amount on all sides.
    #[must_use]
    pub fn shrink(&self, amount: f32) -> Self {
        self.expand(-amount)
    }

    /// Moves the rectangle.
    #[must_use]
    pub fn translate(&self, delta: Vec2) -> Self {
        Self::new(self.min + delta, self.max + delta)
    }

    /// Rounds both corners down to whole pixels.
    #[must_use]
    pub fn floor(&self) -> Self {
        Self::new(self.min.floor(), self.max.floor())
    }

    /// Returns true if `min` is past `max` on either axis.
    #[inline]
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Returns true if the rectangle covers no area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Corner coordinates packed as `[x1, y1, x2, y2]` for renderers.
    #[must_use]
    pub fn to_array(&self) -> [f32; 4] {
        [self.min.x, self.min.y, self.max.x, self.max.y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::from_pos_size(Vec2::new(10.0, 20.0), Vec2::new(100.0, 50.0));

        assert!(rect.contains(Vec2::new(50.0, 30.0)));
        assert!(!rect.contains(Vec2::new(5.0, 30.0)));
        assert!(!rect.contains(Vec2::new(50.0, 80.0)));
        // Max edge is exclusive.
        assert!(!rect.contains(Vec2::new(110.0, 30.0)));
    }

    #[test]
    fn test_clip_with_never_inverts() {
        let mut a = Rect::from_coords(0.0, 0.0, 10.0, 10.0);
        a.clip_with(&Rect::from_coords(20.0, 20.0, 30.0, 30.0));

        assert!(!a.is_inverted());
        assert!(a.is_empty());
    }

    #[test]
    fn test_intersection() {
        let a = Rect::from_coords(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_coords(5.0, 5.0, 15.0, 15.0);

        assert_eq!(a.intersection(&b), Some(Rect::from_coords(5.0, 5.0, 10.0, 10.0)));
        assert_eq!(a.intersection(&Rect::from_coords(10.0, 0.0, 12.0, 5.0)), None);
    }

    #[test]
    fn test_empty_rect_accumulates() {
        let mut r = Rect::EMPTY;
        r.add_point(Vec2::new(3.0, 4.0));
        r.add_point(Vec2::new(-1.0, 8.0));

        assert_eq!(r, Rect::from_coords(-1.0, 4.0, 3.0, 8.0));
    }

    #[test]
    fn test_lerp_xy_picks_corners() {
        let a = Vec2::new(10.0, 10.0);
        let b = Vec2::new(30.0, 50.0);

        assert_eq!(a.lerp_xy(b, Vec2::new(1.0, 0.0)), Vec2::new(30.0, 10.0));
        assert_eq!(a.lerp_xy(b, Vec2::new(0.5, 1.0)), Vec2::new(20.0, 50.0));
    }
}

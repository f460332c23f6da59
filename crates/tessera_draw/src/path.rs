//! Path building. Points accumulate in the list's transient path buffer
//! until a stroke or fill consumes them.

use tessera_core::color::PackedColor;
use tessera_core::Vec2;

use crate::list::{Corners, DrawList};

/// Recursion cap for adaptive bezier subdivision.
const BEZIER_MAX_LEVEL: u32 = 10;

impl DrawList {
    /// Points accumulated so far.
    #[must_use]
    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    /// Discards the current path.
    #[inline]
    pub fn path_clear(&mut self) {
        self.path.clear();
    }

    /// Appends a point.
    #[inline]
    pub fn path_line_to(&mut self, pos: Vec2) {
        self.path.push(pos);
    }

    /// Appends a point unless it repeats the last one.
    #[inline]
    pub fn path_line_to_merge_duplicate(&mut self, pos: Vec2) {
        if self.path.last() != Some(&pos) {
            self.path.push(pos);
        }
    }

    /// Strokes the path and clears it.
    pub fn path_stroke(&mut self, col: PackedColor, closed: bool, thickness: f32) {
        let points = std::mem::take(&mut self.path);
        self.add_polyline(&points, col, closed, thickness);
        self.path = points;
        self.path.clear();
    }

    /// Fills the path (which must be convex) and clears it.
    pub fn path_fill_convex(&mut self, col: PackedColor) {
        let points = std::mem::take(&mut self.path);
        self.add_convex_poly_filled(&points, col);
        self.path = points;
        self.path.clear();
    }

    /// Appends a circular arc between two angles (radians) in
    /// `num_segments` steps, both ends included.
    pub fn path_arc_to(&mut self, centre: Vec2, radius: f32, a_min: f32, a_max: f32, num_segments: u32) {
        if radius == 0.0 || num_segments == 0 {
            self.path.push(centre);
            return;
        }
        self.path.reserve(num_segments as usize + 1);
        #[allow(clippy::cast_precision_loss)]
        for i in 0..=num_segments {
            let a = a_min + (i as f32 / num_segments as f32) * (a_max - a_min);
            self.path.push(Vec2::new(centre.x + a.cos() * radius, centre.y + a.sin() * radius));
        }
    }

    /// Appends an arc using the precomputed 12-step circle, from step
    /// `a_min_of_12` to `a_max_of_12` inclusive (0 = +x axis, 3 = +y axis).
    pub fn path_arc_to_fast(&mut self, centre: Vec2, radius: f32, a_min_of_12: u32, a_max_of_12: u32) {
        if radius == 0.0 || a_min_of_12 > a_max_of_12 {
            self.path.push(centre);
            return;
        }
        self.path.reserve((a_max_of_12 - a_min_of_12 + 1) as usize);
        for a in a_min_of_12..=a_max_of_12 {
            let c = self.shared.circle_vtx12[(a % 12) as usize];
            self.path.push(Vec2::new(centre.x + c.x * radius, centre.y + c.y * radius));
        }
    }

    /// Appends a cubic bezier from the last path point. With
    /// `num_segments == 0` the curve is subdivided adaptively until flat
    /// within the shared tessellation tolerance.
    ///
    /// # Panics
    ///
    /// Panics if the path is empty.
    pub fn path_bezier_curve_to(&mut self, p2: Vec2, p3: Vec2, p4: Vec2, num_segments: u32) {
        let Some(&p1) = self.path.last() else {
            panic!("path_bezier_curve_to requires a starting point");
        };
        if num_segments == 0 {
            let tol = self.shared.curve_tessellation_tol;
            bezier_casteljau(&mut self.path, p1, p2, p3, p4, tol, 0);
            return;
        }
        #[allow(clippy::cast_precision_loss)]
        let t_step = 1.0 / num_segments as f32;
        for i_step in 1..=num_segments {
            #[allow(clippy::cast_precision_loss)]
            let t = t_step * i_step as f32;
            self.path.push(bezier_point(p1, p2, p3, p4, t));
        }
    }

    /// Appends a rectangle outline, rounding the corners selected by
    /// `corners`. The radius is clamped so opposite arcs never overlap.
    pub fn path_rect(&mut self, a: Vec2, b: Vec2, rounding: f32, corners: Corners) {
        let half_x = corners.contains(Corners::TOP) || corners.contains(Corners::BOT);
        let half_y = corners.contains(Corners::LEFT) || corners.contains(Corners::RIGHT);
        let mut rounding = rounding.min((b.x - a.x).abs() * if half_x { 0.5 } else { 1.0 } - 1.0);
        rounding = rounding.min((b.y - a.y).abs() * if half_y { 0.5 } else { 1.0 } - 1.0);

        if rounding <= 0.0 || corners.is_empty() {
            self.path_line_to(a);
            self.path_line_to(Vec2::new(b.x, a.y));
            self.path_line_to(b);
            self.path_line_to(Vec2::new(a.x, b.y));
            return;
        }

        let r = |c: Corners| if corners.contains(c) { rounding } else { 0.0 };
        let tl = r(Corners::TOP_LEFT);
        let tr = r(Corners::TOP_RIGHT);
        let br = r(Corners::BOT_RIGHT);
        let bl = r(Corners::BOT_LEFT);
        self.path_arc_to_fast(Vec2::new(a.x + tl, a.y + tl), tl, 6, 9);
        self.path_arc_to_fast(Vec2::new(b.x - tr, a.y + tr), tr, 9, 12);
        self.path_arc_to_fast(Vec2::new(b.x - br, b.y - br), br, 0, 3);
        self.path_arc_to_fast(Vec2::new(a.x + bl, b.y - bl), bl, 3, 6);
    }
}

/// Evaluates a cubic bezier at `t`.
fn bezier_point(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    let w1 = u * u * u;
    let w2 = 3.0 * u * u * t;
    let w3 = 3.0 * u * t * t;
    let w4 = t * t * t;
    Vec2::new(
        w1 * p1.x + w2 * p2.x + w3 * p3.x + w4 * p4.x,
        w1 * p1.y + w2 * p2.y + w3 * p3.y + w4 * p4.y,
    )
}

/// De Casteljau subdivision. Emits the end point of every segment that is
/// flat within `tess_tol`; the start point is assumed to be on the path.
fn bezier_casteljau(path: &mut Vec<Vec2>, p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2, tess_tol: f32, level: u32) {
    let dx = p4.x - p1.x;
    let dy = p4.y - p1.y;
    let d2 = ((p2.x - p4.x) * dy - (p2.y - p4.y) * dx).abs();
    let d3 = ((p3.x - p4.x) * dy - (p3.y - p4.y) * dx).abs();

    if (d2 + d3) * (d2 + d3) < tess_tol * (dx * dx + dy * dy) {
        path.push(p4);
    } else if level < BEZIER_MAX_LEVEL {
        let p12 = (p1 + p2) * 0.5;
        let p23 = (p2 + p3) * 0.5;
        let p34 = (p3 + p4) * 0.5;
        let p123 = (p12 + p23) * 0.5;
        let p234 = (p23 + p34) * 0.5;
        let p1234 = (p123 + p234) * 0.5;
        bezier_casteljau(path, p1, p12, p123, p1234, tess_tol, level + 1);
        bezier_casteljau(path, p1234, p234, p34, p4, tess_tol, level + 1);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::shared::DrawListSharedData;

    fn list() -> DrawList {
        DrawList::new(Arc::new(DrawListSharedData::new()))
    }

    #[test]
    fn test_square_rect_path() {
        let mut list = list();
        list.path_rect(Vec2::ZERO, Vec2::new(10.0, 10.0), 0.0, Corners::ALL);
        assert_eq!(list.path().len(), 4);
    }

    #[test]
    fn test_rounded_rect_path_has_four_arcs() {
        let mut list = list();
        list.path_rect(Vec2::ZERO, Vec2::new(40.0, 40.0), 5.0, Corners::ALL);
        assert_eq!(list.path().len(), 16);
    }

    #[test]
    fn test_partial_rounding_collapses_square_corners() {
        let mut list = list();
        list.path_rect(Vec2::ZERO, Vec2::new(40.0, 40.0), 5.0, Corners::TOP);
        // Two 4-point arcs plus two single corner points.
        assert_eq!(list.path().len(), 10);
    }

    #[test]
    fn test_arc_endpoints() {
        let mut list = list();
        list.path_arc_to(Vec2::ZERO, 10.0, 0.0, std::f32::consts::FRAC_PI_2, 8);
        let path = list.path();
        assert_eq!(path.len(), 9);
        assert!((path[0].x - 10.0).abs() < 1e-4);
        assert!((path[8].y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_adaptive_bezier_ends_at_target() {
        let mut list = list();
        list.path_line_to(Vec2::ZERO);
        list.path_bezier_curve_to(Vec2::new(0.0, 100.0), Vec2::new(100.0, 100.0), Vec2::new(100.0, 0.0), 0);

        let path = list.path();
        assert!(path.len() > 4);
        assert_eq!(*path.last().unwrap(), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_fixed_bezier_segment_count() {
        let mut list = list();
        list.path_line_to(Vec2::ZERO);
        list.path_bezier_curve_to(Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0), Vec2::new(10.0, 0.0), 6);
        assert_eq!(list.path().len(), 7);
    }

    #[test]
    fn test_stroke_consumes_path() {
        let mut list = list();
        list.path_line_to(Vec2::ZERO);
        list.path_line_to(Vec2::new(10.0, 0.0));
        list.path_stroke(0xFFFF_FFFF, false, 1.0);
        assert!(list.path().is_empty());
        assert!(list.invariants_hold());
    }
}

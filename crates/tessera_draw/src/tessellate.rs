//! Polyline stroking and convex polygon filling.
//!
//! Anti-aliasing works by feathering: every edge gets an extra strip of
//! vertices one pixel outward whose color has zero alpha, so the rasterizer
//! blends the silhouette without multisampling. Per-vertex offsets come from
//! the average of the two adjacent edge normals, scaled by `1 / |avg|^2` to
//! approximate a miter, clamped so sharp angles don't spike.

use tessera_core::color::{self, PackedColor};
use tessera_core::Vec2;

use crate::list::{DrawList, DrawListFlags};
use crate::vertex::DrawIdx;

/// Width of the feathered fringe, in pixels.
const AA_SIZE: f32 = 1.0;

/// Upper bound on the miter scale factor.
const MITER_LIMIT: f32 = 100.0;

/// Unit normal of `b - a`, or zero for a degenerate edge.
#[inline]
fn edge_normal(a: Vec2, b: Vec2) -> Vec2 {
    let diff = b - a;
    let d2 = diff.length_sq();
    let inv_len = if d2 > 0.0 { 1.0 / d2.sqrt() } else { 1.0 };
    let d = diff * inv_len;
    Vec2::new(d.y, -d.x)
}

/// Averaged normal at a joint, scaled to approximate a miter.
#[inline]
fn miter(n0: Vec2, n1: Vec2) -> Vec2 {
    let mut dm = (n0 + n1) * 0.5;
    let dmr2 = dm.length_sq();
    if dmr2 > 0.000_001 {
        let scale = (1.0 / dmr2).min(MITER_LIMIT);
        dm *= scale;
    }
    dm
}

#[inline]
fn to_idx(v: usize) -> DrawIdx {
    DrawIdx::try_from(v).unwrap_or(DrawIdx::MAX)
}

impl DrawList {
    /// Strokes a polyline. `closed` joins the last point back to the first.
    pub fn add_polyline(&mut self, points: &[Vec2], col: PackedColor, closed: bool, thickness: f32) {
        let points_count = points.len();
        if points_count < 2 || Self::skip_color(col) {
            return;
        }
        if self.flags.contains(DrawListFlags::ANTI_ALIASED_LINES) {
            self.stroke_anti_aliased(points, col, closed, thickness);
        } else {
            self.stroke_hard(points, col, closed, thickness);
        }
    }

    fn stroke_hard(&mut self, points: &[Vec2], col: PackedColor, closed: bool, thickness: f32) {
        let points_count = points.len();
        let count = if closed { points_count } else { points_count - 1 };
        let uv = self.shared.tex_uv_white_pixel;

        // One independent quad per segment; edges are not shared.
        self.prim_reserve(count * 6, count * 4);
        for i1 in 0..count {
            let i2 = if i1 + 1 == points_count { 0 } else { i1 + 1 };
            let p1 = points[i1];
            let p2 = points[i2];
            let diff = p2 - p1;
            let d2 = diff.length_sq();
            let diff = if d2 > 0.0 { diff * (1.0 / d2.sqrt()) } else { diff };
            let dx = diff.x * (thickness * 0.5);
            let dy = diff.y * (thickness * 0.5);

            let idx = self.vtx_current_idx;
            self.write_vtx(Vec2::new(p1.x + dy, p1.y - dx), uv, col);
            self.write_vtx(Vec2::new(p2.x + dy, p2.y - dx), uv, col);
            self.write_vtx(Vec2::new(p2.x - dy, p2.y + dx), uv, col);
            self.write_vtx(Vec2::new(p1.x - dy, p1.y + dx), uv, col);
            self.write_tri(idx, idx + 1, idx + 2);
            self.write_tri(idx, idx + 2, idx + 3);
            self.vtx_current_idx += 4;
        }
    }

    #[allow(clippy::too_many_lines)]
    fn stroke_anti_aliased(&mut self, points: &[Vec2], col: PackedColor, closed: bool, thickness: f32) {
        let points_count = points.len();
        let count = if closed { points_count } else { points_count - 1 };
        let thick_line = thickness > 1.0;
        let col_trans = color::transparent(col);
        let uv = self.shared.tex_uv_white_pixel;

        let idx_count = if thick_line { count * 18 } else { count * 12 };
        let vtx_count = if thick_line { points_count * 4 } else { points_count * 3 };
        self.prim_reserve(idx_count, vtx_count);

        // Scratch layout: [normals; points_count][offset points; points_count * stride]
        let stride = if thick_line { 4 } else { 2 };
        let mut temp = std::mem::take(&mut self.scratch);
        temp.clear();
        temp.resize(points_count * (1 + stride), Vec2::ZERO);
        let (normals, temp_points) = temp.split_at_mut(points_count);

        for i1 in 0..count {
            let i2 = if i1 + 1 == points_count { 0 } else { i1 + 1 };
            normals[i1] = edge_normal(points[i1], points[i2]);
        }
        if !closed {
            normals[points_count - 1] = normals[points_count - 2];
        }

        let base = self.vtx_current_idx;
        let last = points_count - 1;

        if thick_line {
            let half_inner = (thickness - AA_SIZE) * 0.5;
            if !closed {
                for &(pi, ti) in &[(0usize, 0usize), (last, last * 4)] {
                    let n = normals[pi];
                    temp_points[ti] = points[pi] + n * (half_inner + AA_SIZE);
                    temp_points[ti + 1] = points[pi] + n * half_inner;
                    temp_points[ti + 2] = points[pi] - n * half_inner;
                    temp_points[ti + 3] = points[pi] - n * (half_inner + AA_SIZE);
                }
            }

            let mut idx1 = base;
            for i1 in 0..count {
                let i2 = if i1 + 1 == points_count { 0 } else { i1 + 1 };
                let idx2 = if i1 + 1 == points_count { base } else { idx1 + 4 };

                let dm = miter(normals[i1], normals[i2]);
                let dm_out = dm * (half_inner + AA_SIZE);
                let dm_in = dm * half_inner;
                temp_points[i2 * 4] = points[i2] + dm_out;
                temp_points[i2 * 4 + 1] = points[i2] + dm_in;
                temp_points[i2 * 4 + 2] = points[i2] - dm_in;
                temp_points[i2 * 4 + 3] = points[i2] - dm_out;

                // Core strip, then outer and inner fringes.
                self.write_tri(idx2 + 1, idx1 + 1, idx1 + 2);
                self.write_tri(idx1 + 2, idx2 + 2, idx2 + 1);
                self.write_tri(idx2 + 1, idx1 + 1, idx1);
                self.write_tri(idx1, idx2, idx2 + 1);
                self.write_tri(idx2 + 2, idx1 + 2, idx1 + 3);
                self.write_tri(idx1 + 3, idx2 + 3, idx2 + 2);
                idx1 = idx2;
            }

            for i in 0..points_count {
                self.write_vtx(temp_points[i * 4], uv, col_trans);
                self.write_vtx(temp_points[i * 4 + 1], uv, col);
                self.write_vtx(temp_points[i * 4 + 2], uv, col);
                self.write_vtx(temp_points[i * 4 + 3], uv, col_trans);
            }
        } else {
            if !closed {
                temp_points[0] = points[0] + normals[0] * AA_SIZE;
                temp_points[1] = points[0] - normals[0] * AA_SIZE;
                temp_points[last * 2] = points[last] + normals[last] * AA_SIZE;
                temp_points[last * 2 + 1] = points[last] - normals[last] * AA_SIZE;
            }

            let mut idx1 = base;
            for i1 in 0..count {
                let i2 = if i1 + 1 == points_count { 0 } else { i1 + 1 };
                let idx2 = if i1 + 1 == points_count { base } else { idx1 + 3 };

                let dm = miter(normals[i1], normals[i2]) * AA_SIZE;
                temp_points[i2 * 2] = points[i2] + dm;
                temp_points[i2 * 2 + 1] = points[i2] - dm;

                self.write_tri(idx2, idx1, idx1 + 2);
                self.write_tri(idx1 + 2, idx2 + 2, idx2);
                self.write_tri(idx2 + 1, idx1 + 1, idx1);
                self.write_tri(idx1, idx2, idx2 + 1);
                idx1 = idx2;
            }

            for i in 0..points_count {
                self.write_vtx(points[i], uv, col);
                self.write_vtx(temp_points[i * 2], uv, col_trans);
                self.write_vtx(temp_points[i * 2 + 1], uv, col_trans);
            }
        }

        self.vtx_current_idx += u32::try_from(vtx_count).unwrap_or(u32::MAX);
        self.scratch = temp;
    }

    /// Fills a convex polygon. Points should wind clockwise in screen space
    /// for the fringe to face outward.
    pub fn add_convex_poly_filled(&mut self, points: &[Vec2], col: PackedColor) {
        let points_count = points.len();
        if points_count < 3 || Self::skip_color(col) {
            return;
        }
        let uv = self.shared.tex_uv_white_pixel;

        if !self.flags.contains(DrawListFlags::ANTI_ALIASED_FILL) {
            self.prim_reserve((points_count - 2) * 3, points_count);
            let base = self.vtx_current_idx;
            for &p in points {
                self.write_vtx(p, uv, col);
            }
            for i in 2..points_count {
                self.write_tri(base, base + to_idx(i - 1), base + to_idx(i));
            }
            self.vtx_current_idx += to_idx(points_count);
            return;
        }

        let col_trans = color::transparent(col);
        let idx_count = (points_count - 2) * 3 + points_count * 6;
        let vtx_count = points_count * 2;
        self.prim_reserve(idx_count, vtx_count);

        let inner = self.vtx_current_idx;
        let outer = inner + 1;

        // Interior fan over the inner ring (even vertices).
        for i in 2..points_count {
            self.write_tri(inner, inner + (to_idx(i - 1) << 1), inner + (to_idx(i) << 1));
        }

        let mut normals = std::mem::take(&mut self.scratch);
        normals.clear();
        normals.resize(points_count, Vec2::ZERO);
        let mut i0 = points_count - 1;
        for i1 in 0..points_count {
            normals[i0] = edge_normal(points[i0], points[i1]);
            i0 = i1;
        }

        let mut i0 = points_count - 1;
        for i1 in 0..points_count {
            let dm = miter(normals[i0], normals[i1]) * (AA_SIZE * 0.5);
            self.write_vtx(points[i1] - dm, uv, col);
            self.write_vtx(points[i1] + dm, uv, col_trans);

            let (a, b) = (to_idx(i1) << 1, to_idx(i0) << 1);
            self.write_tri(inner + a, inner + b, outer + b);
            self.write_tri(outer + b, outer + a, inner + a);
            i0 = i1;
        }

        self.vtx_current_idx += to_idx(vtx_count);
        self.scratch = normals;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::shared::DrawListSharedData;

    const WHITE: PackedColor = color::COL32_WHITE;

    fn list(flags: DrawListFlags) -> DrawList {
        let mut list = DrawList::new(Arc::new(DrawListSharedData::new()));
        list.flags = flags;
        list
    }

    fn square() -> [Vec2; 4] {
        [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_hard_stroke_is_one_quad_per_segment() {
        let mut list = list(DrawListFlags::empty());
        list.add_polyline(&square(), WHITE, true, 1.0);

        assert_eq!(list.vtx_buffer.len(), 16);
        assert_eq!(list.idx_buffer.len(), 24);
        assert!(list.invariants_hold());
    }

    #[test]
    fn test_thin_aa_stroke_counts() {
        let mut list = list(DrawListFlags::ANTI_ALIASED_LINES);
        list.add_polyline(&square(), WHITE, false, 1.0);

        // 3 vertices per point, 12 indices per segment.
        assert_eq!(list.vtx_buffer.len(), 12);
        assert_eq!(list.idx_buffer.len(), 36);
        assert!(list.invariants_hold());
    }

    #[test]
    fn test_thick_aa_stroke_counts() {
        let mut list = list(DrawListFlags::ANTI_ALIASED_LINES);
        list.add_polyline(&square(), WHITE, true, 4.0);

        // 4 vertices per point, 18 indices per segment.
        assert_eq!(list.vtx_buffer.len(), 16);
        assert_eq!(list.idx_buffer.len(), 72);
        assert!(list.invariants_hold());
    }

    #[test]
    fn test_aa_stroke_fringe_is_transparent() {
        let mut list = list(DrawListFlags::ANTI_ALIASED_LINES);
        list.add_polyline(&[Vec2::ZERO, Vec2::new(10.0, 0.0)], WHITE, false, 1.0);

        assert_eq!(list.vtx_buffer[0].col, WHITE);
        assert!(color::is_invisible(list.vtx_buffer[1].col));
        assert!(color::is_invisible(list.vtx_buffer[2].col));
        // Fringe sits one pixel either side of the line.
        assert!((list.vtx_buffer[1].pos[1].abs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sharp_angle_miter_is_clamped() {
        let mut list = list(DrawListFlags::ANTI_ALIASED_LINES);
        // Nearly folding back on itself.
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), Vec2::new(0.0, 0.01)];
        list.add_polyline(&pts, WHITE, false, 1.0);

        for v in &list.vtx_buffer {
            let p = v.position();
            assert!(p.x.abs() < 300.0 && p.y.abs() < 300.0, "spike at {p:?}");
        }
    }

    #[test]
    fn test_convex_fill_counts() {
        let mut aa = list(DrawListFlags::ANTI_ALIASED_FILL);
        aa.add_convex_poly_filled(&square(), WHITE);
        assert_eq!(aa.vtx_buffer.len(), 8);
        assert_eq!(aa.idx_buffer.len(), 6 + 24);
        assert!(aa.invariants_hold());

        let mut hard = list(DrawListFlags::empty());
        hard.add_convex_poly_filled(&square(), WHITE);
        assert_eq!(hard.vtx_buffer.len(), 4);
        assert_eq!(hard.idx_buffer.len(), 6);
        assert!(hard.invariants_hold());
    }

    #[test]
    fn test_fill_fringe_faces_outward() {
        let mut list = list(DrawListFlags::ANTI_ALIASED_FILL);
        list.add_convex_poly_filled(&square(), WHITE);

        // Vertex 1 is the outer fringe of the top-left corner.
        let outer = list.vtx_buffer[1].position();
        assert!(outer.x < 0.0 && outer.y < 0.0);
        let inner = list.vtx_buffer[0].position();
        assert!(inner.x > 0.0 && inner.y > 0.0);
    }

    #[test]
    fn test_degenerate_inputs_emit_nothing() {
        let mut list = list(DrawListFlags::all());
        list.add_polyline(&[Vec2::ZERO], WHITE, false, 1.0);
        list.add_convex_poly_filled(&[Vec2::ZERO, Vec2::ONE], WHITE);
        list.add_polyline(&square(), color::transparent(WHITE), true, 1.0);

        assert!(list.vtx_buffer.is_empty());
        assert!(list.invariants_hold());
    }
}

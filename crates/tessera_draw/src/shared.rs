//! Data shared by every draw list of a context.

use std::f32::consts::PI;

use tessera_core::{Rect, Vec2};

use crate::list::DrawListFlags;

/// Default maximum error (in pixels) when flattening bezier curves.
pub const DEFAULT_CURVE_TESSELLATION_TOL: f32 = 1.25;

/// Read-mostly state every list needs while tessellating. The context
/// rebuilds it when the display size or atlas changes and hands out an
/// `Arc` to each list at the start of the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawListSharedData {
    /// UV of a fully opaque texel in the font atlas, used for solid fills.
    pub tex_uv_white_pixel: Vec2,
    /// Clip rect used when nothing is pushed.
    pub clip_rect_fullscreen: Rect,
    /// Maximum bezier flattening error.
    pub curve_tessellation_tol: f32,
    /// Flags applied by [`DrawList::reset_for_new_frame`](crate::DrawList::reset_for_new_frame).
    pub initial_flags: DrawListFlags,
    /// Unit circle sampled at 12 steps, for `path_arc_to_fast`.
    pub circle_vtx12: [Vec2; 12],
}

impl DrawListSharedData {
    /// Creates shared data with the default tolerance and anti-aliasing on.
    #[must_use]
    pub fn new() -> Self {
        let mut circle_vtx12 = [Vec2::ZERO; 12];
        for (i, v) in circle_vtx12.iter_mut().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let a = (i as f32 * 2.0 * PI) / 12.0;
            *v = Vec2::new(a.cos(), a.sin());
        }
        Self {
            tex_uv_white_pixel: Vec2::ZERO,
            clip_rect_fullscreen: Rect::from_coords(-8192.0, -8192.0, 8192.0, 8192.0),
            curve_tessellation_tol: DEFAULT_CURVE_TESSELLATION_TOL,
            initial_flags: DrawListFlags::ANTI_ALIASED_LINES | DrawListFlags::ANTI_ALIASED_FILL,
            circle_vtx12,
        }
    }
}

impl Default for DrawListSharedData {
    fn default() -> Self {
        Self::new()
    }
}

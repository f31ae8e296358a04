use crate::conv::rgb_to_display;
use crate::{RL_LINES, RL_TRIANGLES};
use lumis_scene::SceneContainer;
use raylib::ffi;
use raylib::prelude::RaylibDraw3D;

/// How patch colors are chosen for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShadeMode {
    /// One color per patch.
    Flat,
    /// Corner colors averaged with the neighbors sharing the corner.
    #[default]
    Smooth,
    /// Surface albedo only, for checking geometry.
    Albedo,
}

impl ShadeMode {
    pub fn next(self) -> Self {
        match self {
            ShadeMode::Flat => ShadeMode::Smooth,
            ShadeMode::Smooth => ShadeMode::Albedo,
            ShadeMode::Albedo => ShadeMode::Flat,
        }
    }
}

/// Draws every patch with its current shade. Call inside a 3D mode.
pub fn draw_radiosity(_d: &mut impl RaylibDraw3D, scene: &SceneContainer, exposure: f32, mode: ShadeMode) {
    unsafe {
        ffi::rlBegin(RL_TRIANGLES);
        for (i, patch) in scene.patches().enumerate() {
            let corners = match mode {
                ShadeMode::Flat => [patch.shade_value(); 4],
                ShadeMode::Smooth => scene
                    .smooth_shade(i)
                    .unwrap_or([patch.shade_value(); 4]),
                ShadeMode::Albedo => [patch.albedo; 4],
            };
            let exposure = if mode == ShadeMode::Albedo { 1.0 } else { exposure };
            let colors = corners.map(|c| rgb_to_display(c, exposure));
            let verts = patch.corners();
            for k in [0usize, 1, 2, 0, 2, 3] {
                let c = colors[k];
                let v = verts[k];
                ffi::rlColor4ub(c.r, c.g, c.b, c.a);
                ffi::rlVertex3f(v.x, v.y, v.z);
            }
        }
        ffi::rlEnd();
    }
}

/// Patch edges, useful after subdivision.
pub fn draw_patch_outlines(_d: &mut impl RaylibDraw3D, scene: &SceneContainer, color: ffi::Color) {
    unsafe {
        ffi::rlBegin(RL_LINES);
        ffi::rlColor4ub(color.r, color.g, color.b, color.a);
        for patch in scene.patches() {
            let corners = patch.corners();
            for k in 0..4 {
                let a = corners[k];
                let b = corners[(k + 1) % 4];
                ffi::rlVertex3f(a.x, a.y, a.z);
                ffi::rlVertex3f(b.x, b.y, b.z);
            }
        }
        ffi::rlEnd();
    }
}

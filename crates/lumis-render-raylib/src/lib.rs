//! Raylib-backed hemicube rasterizer and radiosity display drawing.
// Unsafe is required for rlgl immediate-mode calls and render texture read-back.

mod draw;
mod gpu;

pub use draw::{ShadeMode, draw_patch_outlines, draw_radiosity};
pub use gpu::{RaylibRasterError, RaylibRasterizer};

pub mod conv {
    use lumis_geom::Vec3;

    pub fn vec3_to_rl(v: Vec3) -> raylib::prelude::Vector3 {
        raylib::prelude::Vector3::new(v.x, v.y, v.z)
    }

    /// Maps linear radiance to an 8-bit display color: exposure, clamp, gamma 2.2.
    pub fn rgb_to_display(c: Vec3, exposure: f32) -> raylib::ffi::Color {
        let map = |v: f32| {
            let v = (v * exposure).clamp(0.0, 1.0).powf(1.0 / 2.2);
            (v * 255.0).round() as u8
        };
        raylib::ffi::Color {
            r: map(c.x),
            g: map(c.y),
            b: map(c.z),
            a: 255,
        }
    }

}

// rlgl enums, fixed by the OpenGL values raylib forwards.
pub(crate) const RL_TRIANGLES: i32 = 0x0004;
pub(crate) const RL_LINES: i32 = 0x0001;
pub(crate) const RL_MODELVIEW: i32 = 0x1700;
pub(crate) const RL_PROJECTION: i32 = 0x1701;

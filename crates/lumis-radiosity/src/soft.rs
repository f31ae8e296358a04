//! CPU reference rasterizer writing identity colors into an emulated RGB10A2 target.

use crate::image::IdImage;
use crate::raster::Rasterizer;
use lumis_codec::ColorFormat;
use lumis_geom::Vec3;
use lumis_hemicube::{HemicubeCamera, Rect};
use lumis_scene::SceneGeometry;
use thiserror::Error;

// Largest target edge accepted by `begin`.
const MAX_TARGET_EDGE: u32 = 16_384;

#[derive(Error, Debug)]
pub enum SoftRasterError {
    #[error("render target {width}x{height} is empty or too large")]
    TargetSize { width: u32, height: u32 },

    #[error("render_view called before begin")]
    NotStarted,

    #[error("{colors} identity colors supplied for {patches} patches")]
    ColorCount { colors: usize, patches: usize },
}

/// Depth-tested, back-face culled triangle rasterizer sampling pixel centres.
///
/// Depth is stored as 1/z, so the clear value 0 is infinitely far.
#[derive(Debug)]
pub struct SoftwareRasterizer {
    format: ColorFormat,
    width: u32,
    height: u32,
    started: bool,
    color: Vec<u32>,
    depth: Vec<f32>,
}

impl Default for SoftwareRasterizer {
    fn default() -> Self {
        Self::new(ColorFormat::RGB10A2)
    }
}

impl SoftwareRasterizer {
    pub fn new(format: ColorFormat) -> Self {
        Self {
            format,
            width: 0,
            height: 0,
            started: false,
            color: Vec::new(),
            depth: Vec::new(),
        }
    }

    fn draw_triangle(&mut self, tri: [Vec3; 3], camera: &HemicubeCamera, viewport: &Rect, clip: &Rect, word: u32) {
        // Back faces point away from the eye.
        let normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]);
        if normal.dot(camera.eye - tri[0]) <= 0.0 {
            return;
        }
        let view = tri.map(|p| camera.to_view(p));
        let poly = clip_near(&view, camera.near);
        if poly.len() < 3 {
            return;
        }
        let projected: Vec<(f32, f32, f32)> = poly
            .iter()
            .map(|&v| {
                let (px, py, z) = camera.project(v, viewport);
                (px, py, 1.0 / z)
            })
            .collect();
        for k in 1..projected.len() - 1 {
            self.fill([projected[0], projected[k], projected[k + 1]], clip, word);
        }
    }

    fn fill(&mut self, v: [(f32, f32, f32); 3], clip: &Rect, word: u32) {
        let edge = |a: (f32, f32, f32), b: (f32, f32, f32), x: f32, y: f32| {
            (b.0 - a.0) * (y - a.1) - (b.1 - a.1) * (x - a.0)
        };
        let area = edge(v[0], v[1], v[2].0, v[2].1);
        if area == 0.0 || !area.is_finite() {
            return;
        }
        let sign = area.signum();
        let inv_area = 1.0 / area;

        let min_x = v.iter().map(|p| p.0).fold(f32::INFINITY, f32::min).floor() as i32;
        let max_x = v.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max).ceil() as i32;
        let min_y = v.iter().map(|p| p.1).fold(f32::INFINITY, f32::min).floor() as i32;
        let max_y = v.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max).ceil() as i32;
        let x0 = min_x.max(clip.x);
        let x1 = max_x.min(clip.right() - 1);
        let y0 = min_y.max(clip.y);
        let y1 = max_y.min(clip.bottom() - 1);

        for y in y0..=y1 {
            let sy = y as f32 + 0.5;
            for x in x0..=x1 {
                let sx = x as f32 + 0.5;
                let w0 = edge(v[1], v[2], sx, sy);
                let w1 = edge(v[2], v[0], sx, sy);
                let w2 = edge(v[0], v[1], sx, sy);
                if w0 * sign < 0.0 || w1 * sign < 0.0 || w2 * sign < 0.0 {
                    continue;
                }
                let inv_z = (w0 * v[0].2 + w1 * v[1].2 + w2 * v[2].2) * inv_area;
                let idx = (y as u32 * self.width + x as u32) as usize;
                if inv_z > self.depth[idx] {
                    self.depth[idx] = inv_z;
                    self.color[idx] = word;
                }
            }
        }
    }
}

/// Sutherland-Hodgman against `z >= near` in camera space.
fn clip_near(tri: &[Vec3; 3], near: f32) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(4);
    for i in 0..3 {
        let a = tri[i];
        let b = tri[(i + 1) % 3];
        let a_in = a.z >= near;
        let b_in = b.z >= near;
        if a_in {
            out.push(a);
        }
        if a_in != b_in {
            let t = (near - a.z) / (b.z - a.z);
            let mut p = a.lerp(b, t);
            p.z = near;
            out.push(p);
        }
    }
    out
}

impl Rasterizer for SoftwareRasterizer {
    type Error = SoftRasterError;

    fn color_format(&self) -> ColorFormat {
        self.format
    }

    fn begin(&mut self, width: u32, height: u32, clear: [f32; 3]) -> Result<(), SoftRasterError> {
        if width == 0 || height == 0 || width > MAX_TARGET_EDGE || height > MAX_TARGET_EDGE {
            return Err(SoftRasterError::TargetSize { width, height });
        }
        let len = (width * height) as usize;
        let word = self.format.write(clear);
        self.width = width;
        self.height = height;
        self.color.clear();
        self.color.resize(len, word);
        self.depth.clear();
        self.depth.resize(len, 0.0);
        self.started = true;
        Ok(())
    }

    fn render_view(
        &mut self,
        geometry: &SceneGeometry<'_>,
        camera: &HemicubeCamera,
        viewport: Rect,
        scissor: Rect,
        colors: &[[f32; 3]],
    ) -> Result<(), SoftRasterError> {
        if !self.started {
            return Err(SoftRasterError::NotStarted);
        }
        let patches = geometry.patch_count();
        if colors.len() != patches {
            return Err(SoftRasterError::ColorCount {
                colors: colors.len(),
                patches,
            });
        }
        let target = Rect::new(0, 0, self.width as i32, self.height as i32);
        let Some(clip) = viewport.intersect(&scissor).and_then(|r| r.intersect(&target)) else {
            return Ok(());
        };
        let words: Vec<u32> = colors.iter().map(|&c| self.format.write(c)).collect();
        for tri in geometry.indices.chunks_exact(3) {
            let patch = tri[0] as usize / 4;
            let corners = [
                geometry.vertices[tri[0] as usize],
                geometry.vertices[tri[1] as usize],
                geometry.vertices[tri[2] as usize],
            ];
            self.draw_triangle(corners, camera, &viewport, &clip, words[patch]);
        }
        log::trace!(target: "raster", "soft view {:?} clip {:?}: {} triangles", viewport, clip, geometry.indices.len() / 3);
        Ok(())
    }

    fn read_back(&mut self) -> Result<IdImage, SoftRasterError> {
        if !self.started {
            return Err(SoftRasterError::NotStarted);
        }
        self.started = false;
        Ok(IdImage::new(self.width, self.height, self.format, self.color.clone()))
    }
}

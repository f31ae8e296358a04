use crate::{RL_MODELVIEW, RL_PROJECTION, RL_TRIANGLES};
use lumis_codec::ColorFormat;
use lumis_hemicube::{HemicubeCamera, Rect};
use lumis_radiosity::{IdImage, Rasterizer};
use lumis_scene::SceneGeometry;
use raylib::RaylibThread;
use raylib::ffi;
use std::marker::PhantomData;
use thiserror::Error;

// Largest render target edge accepted by `begin`.
const MAX_TARGET_EDGE: u32 = 16_384;

#[derive(Error, Debug)]
pub enum RaylibRasterError {
    #[error("render target {width}x{height} exceeds the GPU limit of {limit}")]
    TargetSize { width: u32, height: u32, limit: u32 },

    #[error("failed to create a {width}x{height} render texture")]
    LoadFailed { width: u32, height: u32 },

    #[error("render_view called before begin")]
    NotStarted,

    #[error("{colors} identity colors supplied for {patches} patches")]
    ColorCount { colors: usize, patches: usize },

    #[error("read-back returned no pixels")]
    ReadBack,
}

/// Hemicube rasterizer on the raylib GL context.
///
/// Renders into an RGBA8 render texture with depth. Must be created and used on
/// the thread that owns the window.
pub struct RaylibRasterizer {
    target: Option<ffi::RenderTexture2D>,
    width: u32,
    height: u32,
    started: bool,
    _gl_thread: PhantomData<*const ()>,
}

impl RaylibRasterizer {
    pub fn new(_thread: &RaylibThread) -> Self {
        Self {
            target: None,
            width: 0,
            height: 0,
            started: false,
            _gl_thread: PhantomData,
        }
    }

    /// Reuses the render texture when the size is unchanged.
    fn ensure_target(&mut self, width: u32, height: u32) -> Result<ffi::RenderTexture2D, RaylibRasterError> {
        if let Some(rt) = self.target {
            if self.width == width && self.height == height {
                return Ok(rt);
            }
            unsafe { ffi::UnloadRenderTexture(rt) };
            self.target = None;
        }
        let rt = unsafe { ffi::LoadRenderTexture(width as i32, height as i32) };
        if rt.id == 0 || rt.depth.id == 0 {
            return Err(RaylibRasterError::LoadFailed { width, height });
        }
        log::debug!(target: "raster", "render texture {}x{} (fbo {})", width, height, rt.id);
        self.target = Some(rt);
        self.width = width;
        self.height = height;
        Ok(rt)
    }

    /// Top-left pixel rect to GL's bottom-left origin.
    fn gl_rect(&self, r: &Rect) -> (i32, i32, i32, i32) {
        (r.x, self.height as i32 - r.bottom(), r.w, r.h)
    }
}

impl Drop for RaylibRasterizer {
    fn drop(&mut self) {
        if let Some(rt) = self.target.take() {
            if self.started {
                unsafe { ffi::EndTextureMode() };
            }
            unsafe { ffi::UnloadRenderTexture(rt) };
        }
    }
}

impl Rasterizer for RaylibRasterizer {
    type Error = RaylibRasterError;

    fn color_format(&self) -> ColorFormat {
        ColorFormat::RGBA8
    }

    fn begin(&mut self, width: u32, height: u32, clear: [f32; 3]) -> Result<(), RaylibRasterError> {
        check_target(width, height)?;
        if self.started {
            unsafe { ffi::EndTextureMode() };
            self.started = false;
        }
        let rt = self.ensure_target(width, height)?;
        let [r, g, b] = quantize(clear);
        unsafe {
            ffi::BeginTextureMode(rt);
            ffi::rlDisableColorBlend();
            ffi::ClearBackground(ffi::Color { r, g, b, a: 255 });
        }
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
    ) -> Result<(), RaylibRasterError> {
        if !self.started {
            return Err(RaylibRasterError::NotStarted);
        }
        let patches = geometry.patch_count();
        if colors.len() != patches {
            return Err(RaylibRasterError::ColorCount {
                colors: colors.len(),
                patches,
            });
        }
        let (vx, vy, vw, vh) = self.gl_rect(&viewport);
        let (sx, sy, sw, sh) = self.gl_rect(&scissor);
        let [l, r, b, t, n, f] = camera.frustum();
        let view = camera.view_matrix();
        unsafe {
            // Batched vertices are drawn with the matrices current at flush time.
            ffi::rlDrawRenderBatchActive();
            ffi::rlViewport(vx, vy, vw, vh);
            ffi::rlEnableScissorTest();
            ffi::rlScissor(sx, sy, sw, sh);
            ffi::rlMatrixMode(RL_PROJECTION);
            ffi::rlLoadIdentity();
            ffi::rlFrustum(l, r, b, t, n, f);
            ffi::rlMatrixMode(RL_MODELVIEW);
            ffi::rlLoadIdentity();
            ffi::rlMultMatrixf(view.as_ptr());
            ffi::rlEnableDepthTest();
            ffi::rlEnableBackfaceCulling();

            ffi::rlBegin(RL_TRIANGLES);
            for tri in geometry.indices.chunks_exact(3) {
                let [r, g, b] = quantize(colors[tri[0] as usize / 4]);
                ffi::rlColor4ub(r, g, b, 255);
                for &i in tri {
                    let v = geometry.vertices[i as usize];
                    ffi::rlVertex3f(v.x, v.y, v.z);
                }
            }
            ffi::rlEnd();
            ffi::rlDrawRenderBatchActive();
            ffi::rlDisableScissorTest();
        }
        Ok(())
    }

    fn read_back(&mut self) -> Result<IdImage, RaylibRasterError> {
        let Some(rt) = self.target.filter(|_| self.started) else {
            return Err(RaylibRasterError::NotStarted);
        };
        unsafe {
            ffi::rlEnableColorBlend();
            ffi::EndTextureMode();
        }
        self.started = false;

        let (w, h) = (self.width as usize, self.height as usize);
        let format = ColorFormat::RGBA8;
        let mut texels = vec![0u32; w * h];
        unsafe {
            let image = ffi::LoadImageFromTexture(rt.texture);
            let pixels = ffi::LoadImageColors(image);
            if pixels.is_null() {
                ffi::UnloadImage(image);
                return Err(RaylibRasterError::ReadBack);
            }
            let src = std::slice::from_raw_parts(pixels, w * h);
            // GL rows run bottom to top.
            for (y, row) in texels.chunks_exact_mut(w).enumerate() {
                let from = &src[(h - 1 - y) * w..(h - y) * w];
                for (dst, c) in row.iter_mut().zip(from) {
                    *dst = format.pack([c.r as u32, c.g as u32, c.b as u32]);
                }
            }
            ffi::UnloadImageColors(pixels);
            ffi::UnloadImage(image);
        }
        Ok(IdImage::new(self.width, self.height, format, texels))
    }
}

fn check_target(width: u32, height: u32) -> Result<(), RaylibRasterError> {
    if width == 0 || height == 0 || width > MAX_TARGET_EDGE || height > MAX_TARGET_EDGE {
        return Err(RaylibRasterError::TargetSize {
            width,
            height,
            limit: MAX_TARGET_EDGE,
        });
    }
    Ok(())
}

fn quantize(rgb: [f32; 3]) -> [u8; 3] {
    let format = ColorFormat::RGBA8;
    [0, 1, 2].map(|c| format.quantize(c, rgb[c]) as u8)
}

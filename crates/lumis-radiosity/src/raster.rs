use crate::image::IdImage;
use lumis_codec::ColorFormat;
use lumis_hemicube::{HemicubeCamera, Rect};
use lumis_scene::SceneGeometry;

/// Renders identity-colored hemicube views into one composite target.
///
/// A frame is `begin`, any number of `render_view` calls, then `read_back`.
/// Views must be depth-tested, back-face culled and clipped to `scissor`.
pub trait Rasterizer {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Format the target stores identity colors in.
    fn color_format(&self) -> ColorFormat;

    /// Sizes the target and clears it to `clear` with an empty depth buffer.
    fn begin(&mut self, width: u32, height: u32, clear: [f32; 3]) -> Result<(), Self::Error>;

    /// Draws every patch of `geometry` with `colors[patch]` through `camera`.
    fn render_view(
        &mut self,
        geometry: &SceneGeometry<'_>,
        camera: &HemicubeCamera,
        viewport: Rect,
        scissor: Rect,
        colors: &[[f32; 3]],
    ) -> Result<(), Self::Error>;

    fn read_back(&mut self) -> Result<IdImage, Self::Error>;
}

use lumis_io::{SceneDescription, load_patches, save_patches};
use lumis_radiosity::{CpuReducer, RadiosityConfig, RadiosityEngine, SoftwareRasterizer};
use lumis_scene::SceneContainer;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Where the initial scene comes from. Kept around so the viewer can rebuild it.
#[derive(Clone, Debug)]
pub enum SceneSource {
    Cornell,
    Description(PathBuf),
    Patches(PathBuf),
}

impl SceneSource {
    /// Builds the scene ready to solve; descriptions are subdivided to the configured area.
    pub fn build(&self, config: &RadiosityConfig) -> Result<SceneContainer, Box<dyn Error>> {
        let mut scene = match self {
            SceneSource::Cornell => SceneDescription::cornell().build()?,
            SceneSource::Description(path) => SceneDescription::from_path(path)?.build()?,
            // Saved patches are already subdivided and may carry shot energy.
            SceneSource::Patches(path) => return Ok(load_patches(path)?),
        };
        let before = scene.patch_count();
        scene.edit_models(|m| {
            m.subdivide(config.max_patch_area);
        });
        log::info!(
            target: "scene",
            "subdivided {} -> {} patches (max area {})",
            before,
            scene.patch_count(),
            config.max_patch_area
        );
        Ok(scene)
    }
}

/// Solves on the CPU backend and optionally writes the result.
pub fn run_headless(
    config: RadiosityConfig,
    mut scene: SceneContainer,
    max_steps: u64,
    save: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let rasterizer = SoftwareRasterizer::new(config.color_format.color_format());
    let mut engine = RadiosityEngine::new(config, rasterizer, CpuReducer::new())?;
    let started = Instant::now();
    let summary = engine.run(&mut scene, max_steps)?;
    log::info!(
        target: "lumis",
        "headless: {} steps in {:.2}s, converged={}, last shot {:.5}, {} mismatches, unshot {:.5}",
        summary.steps,
        started.elapsed().as_secs_f32(),
        summary.converged,
        summary.last_shot,
        summary.mismatches,
        scene.total_unshot()
    );
    if let Some(path) = save {
        save_patches(&scene, path)?;
    }
    Ok(())
}

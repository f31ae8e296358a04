use lumis_radiosity::{
    ColorFormat, FormFactorTable, HemicubeCamera, HemicubeLayout, IdImage, ParallelReducer,
    PatchIdentityCodec, RadiosityConfig, RadiosityEngine, RadiosityError, Rasterizer, Rect,
    ReduceRecord, StepOutcome,
};
use lumis_scene::{Model, SceneContainer, SceneGeometry, Vec3};
use std::convert::Infallible;

#[derive(Debug, thiserror::Error)]
#[error("device lost")]
struct DeviceLost;

/// Produces a blank image of a configurable size, or fails on demand.
#[derive(Default)]
struct ScriptedRasterizer {
    size: Option<(u32, u32)>,
    fail: bool,
    views: usize,
}

impl Rasterizer for ScriptedRasterizer {
    type Error = DeviceLost;

    fn color_format(&self) -> ColorFormat {
        ColorFormat::RGBA8
    }

    fn begin(&mut self, width: u32, height: u32, _clear: [f32; 3]) -> Result<(), DeviceLost> {
        if self.size.is_none() {
            self.size = Some((width, height));
        }
        Ok(())
    }

    fn render_view(
        &mut self,
        _geometry: &SceneGeometry<'_>,
        _camera: &HemicubeCamera,
        _viewport: Rect,
        _scissor: Rect,
        _colors: &[[f32; 3]],
    ) -> Result<(), DeviceLost> {
        if self.fail {
            return Err(DeviceLost);
        }
        self.views += 1;
        Ok(())
    }

    fn read_back(&mut self) -> Result<IdImage, DeviceLost> {
        let (w, h) = self.size.unwrap_or((0, 0));
        Ok(IdImage::filled(w, h, ColorFormat::RGBA8, 0))
    }
}

struct ScriptedReducer(Vec<ReduceRecord>);

impl ParallelReducer for ScriptedReducer {
    type Error = Infallible;

    fn reduce(
        &self,
        _image: &IdImage,
        _table: &FormFactorTable,
        _layout: &HemicubeLayout,
        _codec: &PatchIdentityCodec,
    ) -> Result<Vec<ReduceRecord>, Infallible> {
        Ok(self.0.clone())
    }
}

fn two_quads() -> SceneContainer {
    let floor = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, -1.0),
        Vec3::new(0.0, 0.0, -1.0),
    ];
    let mut light = Model::quad("light", floor, Vec3::new(0.5, 1.0, 1.0), 0.5);
    light.set_emission(Vec3::new(1.0, 0.5, 0.25));
    let ceiling = floor.map(|p| p + Vec3::new(0.0, 1.0, 0.0));
    let target = Model::quad("target", [ceiling[0], ceiling[3], ceiling[2], ceiling[1]], Vec3::ONE, 0.5);
    let mut scene = SceneContainer::new();
    scene.add_model(light);
    scene.add_model(target);
    scene
}

fn config() -> RadiosityConfig {
    RadiosityConfig {
        hemicube_resolution: 8,
        hemicubes: 1,
        ..RadiosityConfig::default()
    }
}

fn record(hemicube: u32, id: u32, weight: f32) -> ReduceRecord {
    ReduceRecord { hemicube, id, weight }
}

#[test]
fn distributes_tinted_energy_and_counts_mismatches() {
    let reducer = ScriptedReducer(vec![
        record(0, 2, 0.25),
        record(0, 2, 0.25),
        record(0, 0, 1.0),
        record(0, 9, 0.1),
        record(3, 1, 0.1),
    ]);
    let mut engine =
        RadiosityEngine::new(config(), ScriptedRasterizer::default(), reducer).expect("engine");
    let mut scene = two_quads();

    let StepOutcome::Shot(report) = engine.step(&mut scene).expect("step") else {
        panic!("expected a shot");
    };
    assert_eq!(report.emitters, vec![0]);
    assert_eq!(report.mismatches, 2);
    assert_eq!(report.form_factor_totals, vec![0.5]);
    assert_eq!(engine.rasterizer().views, 5);

    let light = scene.patch(0).expect("light");
    assert_eq!(light.radiosity, Vec3::ZERO);
    assert_eq!(light.illumination, Vec3::new(1.0, 0.5, 0.25));
    let target = scene.patch(1).expect("target");
    assert_eq!(target.radiosity, Vec3::new(0.125, 0.125, 0.0625));
}

#[test]
fn rasterizer_failure_leaves_scene_untouched() {
    let raster = ScriptedRasterizer {
        fail: true,
        ..ScriptedRasterizer::default()
    };
    let mut engine =
        RadiosityEngine::new(config(), raster, ScriptedReducer(Vec::new())).expect("engine");
    let mut scene = two_quads();
    let err = engine.step(&mut scene).expect_err("must fail");
    assert!(matches!(err, RadiosityError::Rasterizer(_)));
    assert!(err.to_string().contains("device lost"));
    assert_eq!(scene.patch(0).map(|p| p.radiosity), Some(Vec3::new(1.0, 0.5, 0.25)));
    assert_eq!(engine.steps(), 0);

    engine.rasterizer_mut().fail = false;
    assert!(matches!(engine.step(&mut scene).expect("retry"), StepOutcome::Shot(_)));
}

#[test]
fn wrong_image_size_is_an_error() {
    let raster = ScriptedRasterizer {
        size: Some((3, 3)),
        ..ScriptedRasterizer::default()
    };
    let mut engine =
        RadiosityEngine::new(config(), raster, ScriptedReducer(Vec::new())).expect("engine");
    let err = engine.step(&mut two_quads()).expect_err("must fail");
    assert!(matches!(
        err,
        RadiosityError::ImageSize { expected_width: 16, expected_height: 16, actual_width: 3, actual_height: 3 }
    ));
}

#[test]
fn pause_blocks_steps_until_resumed() {
    let mut engine =
        RadiosityEngine::new(config(), ScriptedRasterizer::default(), ScriptedReducer(Vec::new()))
            .expect("engine");
    let mut scene = two_quads();
    engine.pause();
    assert_eq!(engine.step(&mut scene).expect("step"), StepOutcome::Paused);
    let summary = engine.run(&mut scene, 10).expect("run");
    assert!(summary.paused);
    assert_eq!(summary.steps, 0);
    engine.resume();
    let summary = engine.run(&mut scene, 1).expect("run");
    assert_eq!(summary.steps, 1);
    engine.reset();
    assert_eq!(engine.steps(), 0);
}

#[test]
fn invalid_config_is_rejected() {
    let config = RadiosityConfig {
        hemicube_resolution: 7,
        ..RadiosityConfig::default()
    };
    let result = RadiosityEngine::new(config, ScriptedRasterizer::default(), ScriptedReducer(Vec::new()));
    assert!(matches!(result, Err(RadiosityError::Config(_))));
}

use crate::camera::FlyCamera;
use crate::setup::SceneSource;
use lumis_io::save_patches;
use lumis_radiosity::{
    CpuReducer, EngineState, FormatName, RadiosityConfig, RadiosityEngine, StepOutcome, StepReport,
};
use lumis_render_raylib::{RaylibRasterizer, ShadeMode, draw_patch_outlines, draw_radiosity};
use lumis_scene::SceneContainer;
use raylib::prelude::*;
use std::error::Error;
use std::path::PathBuf;

const DEFAULT_SAVE: &str = "lumis-patches.toml";

pub struct App {
    engine: RadiosityEngine<RaylibRasterizer, CpuReducer>,
    scene: SceneContainer,
    source: SceneSource,
    save_path: PathBuf,
    cam: FlyCamera,
    exposure: f32,
    shade: ShadeMode,
    outlines: bool,
    last_report: Option<StepReport>,
    status: Option<String>,
}

impl App {
    pub fn new(
        thread: &RaylibThread,
        config: RadiosityConfig,
        source: SceneSource,
        save_path: Option<PathBuf>,
    ) -> Result<Self, Box<dyn Error>> {
        if config.color_format != FormatName::Rgba8 {
            log::info!(target: "lumis", "GPU target is rgba8; color_format {:?} applies to headless runs", config.color_format);
        }
        let scene = source.build(&config)?;
        let engine = RadiosityEngine::new(config, RaylibRasterizer::new(thread), CpuReducer::new())?;
        let cam = FlyCamera::framing(scene.bounds());
        Ok(Self {
            engine,
            scene,
            source,
            save_path: save_path.unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE)),
            cam,
            exposure: 1.0,
            shade: ShadeMode::default(),
            outlines: false,
            last_report: None,
            status: None,
        })
    }

    pub fn handle_input(&mut self, rl: &mut RaylibHandle) {
        let dt = rl.get_frame_time();
        self.cam.update(rl, dt);

        if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            if self.engine.is_paused() {
                self.engine.resume();
                self.status = None;
            } else {
                self.engine.pause();
            }
        }
        if rl.is_key_pressed(KeyboardKey::KEY_R) {
            self.restart();
        }
        if rl.is_key_pressed(KeyboardKey::KEY_C) {
            self.engine.rearm();
        }
        if rl.is_key_pressed(KeyboardKey::KEY_F5) {
            self.status = Some(match save_patches(&self.scene, &self.save_path) {
                Ok(()) => format!("saved {}", self.save_path.display()),
                Err(e) => {
                    log::error!(target: "lumis", "save failed: {}", e);
                    format!("save failed: {e}")
                }
            });
        }
        if rl.is_key_pressed(KeyboardKey::KEY_G) {
            self.shade = self.shade.next();
        }
        if rl.is_key_pressed(KeyboardKey::KEY_O) {
            self.outlines = !self.outlines;
        }
        if rl.is_key_down(KeyboardKey::KEY_EQUAL) {
            self.exposure *= 1.0 + dt;
        }
        if rl.is_key_down(KeyboardKey::KEY_MINUS) {
            self.exposure /= 1.0 + dt;
        }
    }

    /// One shooting step per frame; a failing step pauses the solver.
    pub fn step(&mut self) {
        match self.engine.step(&mut self.scene) {
            Ok(StepOutcome::Shot(report)) => self.last_report = Some(report),
            Ok(StepOutcome::Paused | StepOutcome::Converged) => {}
            Err(e) => {
                log::error!(target: "lumis", "step failed: {}", e);
                self.engine.pause();
                self.status = Some(format!("step failed: {e} (Space retries)"));
            }
        }
    }

    fn restart(&mut self) {
        match self.source.build(self.engine.config()) {
            Ok(scene) => {
                self.scene = scene;
                self.engine.reset();
                self.last_report = None;
                self.status = Some("restarted".to_string());
            }
            Err(e) => {
                log::error!(target: "lumis", "restart failed: {}", e);
                self.status = Some(format!("restart failed: {e}"));
            }
        }
    }

    pub fn render(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) {
        let mut d = rl.begin_drawing(thread);
        d.clear_background(Color::new(18, 18, 24, 255));
        {
            let mut d3 = d.begin_mode3D(self.cam.to_camera3d());
            draw_radiosity(&mut d3, &self.scene, self.exposure, self.shade);
            if self.outlines {
                let line = raylib::ffi::Color {
                    r: 0,
                    g: 0,
                    b: 0,
                    a: 96,
                };
                draw_patch_outlines(&mut d3, &self.scene, line);
            }
        }
        self.draw_overlay(&mut d);
    }

    fn draw_overlay(&self, d: &mut RaylibDrawHandle) {
        let state = if self.engine.is_paused() {
            "paused"
        } else {
            match self.engine.state() {
                EngineState::Converged => "converged",
                _ => "solving",
            }
        };
        let mut lines = vec![
            format!(
                "step {}  [{}]  patches {}",
                self.engine.steps(),
                state,
                self.scene.patch_count()
            ),
            format!(
                "unshot {:.4}  last shot {:.5}  exposure {:.2}  shade {:?}",
                self.scene.total_unshot(),
                self.engine.last_shot(),
                self.exposure,
                self.shade
            ),
        ];
        if let Some(r) = &self.last_report {
            lines.push(format!(
                "{} emitter(s), {} batch(es), {} mismatch(es), {} ms",
                r.emitters.len(),
                r.batches,
                r.mismatches,
                r.elapsed_ms
            ));
        }
        if let Some(s) = &self.status {
            lines.push(s.clone());
        }
        lines.push("Space pause  R restart  C re-arm  F5 save  G shade  O outlines  +/- exposure  Tab mouse".into());
        for (i, line) in lines.iter().enumerate() {
            d.draw_text(line, 12, 12 + i as i32 * 22, 18, Color::RAYWHITE);
        }
        let w = d.get_screen_width();
        d.draw_fps(w - 90, 12);
    }
}

pub fn run(
    config: RadiosityConfig,
    source: SceneSource,
    save_path: Option<PathBuf>,
    width: i32,
    height: i32,
) -> Result<(), Box<dyn Error>> {
    let (mut rl, thread) = raylib::init()
        .size(width, height)
        .title("Lumis: progressive radiosity")
        .resizable()
        .build();
    rl.set_target_fps(60);

    let mut app = App::new(&thread, config, source, save_path)?;
    while !rl.window_should_close() {
        app.handle_input(&mut rl);
        // Hemicubes render into their own target, outside the frame.
        app.step();
        app.render(&mut rl, &thread);
    }
    Ok(())
}

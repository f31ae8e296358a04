use crate::config::RadiosityConfig;
use crate::error::RadiosityError;
use crate::raster::Rasterizer;
use crate::reduce::ParallelReducer;
use lumis_codec::PatchIdentityCodec;
use lumis_geom::{Rgb, Vec3};
use lumis_hemicube::{Face, FormFactorTable, HemicubeCamera, HemicubeLayout};
use lumis_scene::{Patch, SceneContainer};
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    SelectingEmitters,
    RenderingViews,
    ReducingAndDistributing,
    Converged,
}

/// What one shooting step did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    /// 1-based step number.
    pub step: u64,
    /// Global indices of the patches that shot, strongest first.
    pub emitters: Vec<usize>,
    /// Radiosity each emitter held when it shot.
    pub snapshots: Vec<Rgb>,
    /// Sum of the form factors gathered by each emitter's hemicube.
    pub form_factor_totals: Vec<f64>,
    pub batches: usize,
    pub mismatches: usize,
    /// Largest snapshot magnitude of the step.
    pub shot_max: f32,
    pub converged: bool,
    pub elapsed_ms: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    Paused,
    Converged,
    Shot(StepReport),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub steps: u64,
    pub converged: bool,
    pub paused: bool,
    pub mismatches: usize,
    pub last_shot: f32,
}

/// Progressive shooting solver.
///
/// Every step selects the strongest unshot patches, renders a hemicube from
/// each one with identity colors, reduces the read-back image to form factors
/// and moves the emitters' energy onto the patches they see. A failed step
/// leaves the scene untouched and can simply be retried.
pub struct RadiosityEngine<R: Rasterizer, P: ParallelReducer> {
    config: RadiosityConfig,
    layout: HemicubeLayout,
    table: FormFactorTable,
    rasterizer: R,
    reducer: P,
    codec: Option<PatchIdentityCodec>,
    state: EngineState,
    paused: bool,
    steps: u64,
    last_shot: f32,
    light_offset: Vec3,
}

impl<R: Rasterizer, P: ParallelReducer> RadiosityEngine<R, P> {
    pub fn new(config: RadiosityConfig, rasterizer: R, reducer: P) -> Result<Self, RadiosityError> {
        let layout = config.layout()?;
        let table = FormFactorTable::new(layout);
        log::info!(
            target: "radiosity",
            "engine ready: {} hemicube(s) at {}px, texture {}x{}, target {:?}",
            layout.count(),
            layout.resolution(),
            layout.width(),
            layout.height(),
            rasterizer.color_format()
        );
        Ok(Self {
            config,
            layout,
            table,
            rasterizer,
            reducer,
            codec: None,
            state: EngineState::Idle,
            paused: false,
            steps: 0,
            last_shot: 0.0,
            light_offset: Vec3::ZERO,
        })
    }

    #[inline]
    pub fn config(&self) -> &RadiosityConfig {
        &self.config
    }

    #[inline]
    pub fn layout(&self) -> &HemicubeLayout {
        &self.layout
    }

    #[inline]
    pub fn form_factors(&self) -> &FormFactorTable {
        &self.table
    }

    #[inline]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Strongest snapshot magnitude of the last step.
    #[inline]
    pub fn last_shot(&self) -> f32 {
        self.last_shot
    }

    #[inline]
    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    #[inline]
    pub fn rasterizer_mut(&mut self) -> &mut R {
        &mut self.rasterizer
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Leaves `Converged` so new energy (or a lower epsilon) gets shot.
    pub fn rearm(&mut self) {
        if self.state == EngineState::Converged {
            self.state = EngineState::Idle;
        }
    }

    /// Forgets all progress; pair with a fresh scene.
    pub fn reset(&mut self) {
        self.state = EngineState::Idle;
        self.paused = false;
        self.steps = 0;
        self.last_shot = 0.0;
        self.codec = None;
    }

    /// Shifts every hemicube eye away from its patch centroid.
    pub fn set_light_offset(&mut self, offset: Vec3) {
        self.light_offset = offset;
    }

    pub fn set_epsilon(&mut self, epsilon: f32) {
        self.config.epsilon = epsilon.max(0.0);
    }

    /// Runs one shooting step.
    pub fn step(&mut self, scene: &mut SceneContainer) -> Result<StepOutcome, RadiosityError> {
        if self.paused {
            return Ok(StepOutcome::Paused);
        }
        if self.state == EngineState::Converged {
            return Ok(StepOutcome::Converged);
        }
        let started = Instant::now();

        self.state = EngineState::SelectingEmitters;
        let emitters: Vec<usize> = scene
            .top_emitters(self.layout.count())
            .into_iter()
            .flatten()
            .collect();
        if emitters.is_empty() {
            log::info!(target: "radiosity", "no unshot energy left after {} steps", self.steps);
            self.state = EngineState::Converged;
            return Ok(StepOutcome::Converged);
        }
        let shooters: Vec<Patch> = emitters
            .iter()
            .filter_map(|&i| scene.patch(i).cloned())
            .collect();
        let snapshots: Vec<Rgb> = shooters.iter().map(|p| p.radiosity).collect();
        let shot_max = snapshots.iter().map(|s| s.length()).fold(0.0f32, f32::max);

        let gathered = match self.gather(scene, &shooters) {
            Ok(g) => g,
            Err(e) => {
                self.state = EngineState::Idle;
                return Err(e);
            }
        };

        self.state = EngineState::ReducingAndDistributing;
        let mut form_factor_totals = Vec::with_capacity(shooters.len());
        for ((shooter, snapshot), ff) in shooters.iter().zip(&snapshots).zip(&gathered.form_factors) {
            let tint = *snapshot * shooter.albedo;
            for (p, &f) in scene.patches_mut().zip(ff) {
                if f > 0.0 {
                    p.radiosity += tint * (f * p.reflectivity);
                }
            }
            form_factor_totals.push(ff.iter().map(|&f| f as f64).sum());
        }
        for (&i, snapshot) in emitters.iter().zip(&snapshots) {
            if let Some(p) = scene.patch_mut(i) {
                p.illumination += *snapshot;
                p.radiosity -= *snapshot;
            }
        }

        self.steps += 1;
        self.last_shot = shot_max;
        let converged = shot_max < self.config.epsilon;
        self.state = if converged {
            EngineState::Converged
        } else {
            EngineState::Idle
        };

        let report = StepReport {
            step: self.steps,
            emitters,
            snapshots,
            form_factor_totals,
            batches: gathered.batches,
            mismatches: gathered.mismatches,
            shot_max,
            converged,
            elapsed_ms: started.elapsed().as_millis() as u32,
        };
        log::info!(
            target: "radiosity",
            "step {}: {} emitter(s), shot {:.5}, {} batch(es), {}ms{}",
            report.step,
            report.emitters.len(),
            report.shot_max,
            report.batches,
            report.elapsed_ms,
            if converged { ", converged" } else { "" }
        );
        Ok(StepOutcome::Shot(report))
    }

    /// Steps until converged, paused, or `max_steps` shots.
    pub fn run(&mut self, scene: &mut SceneContainer, max_steps: u64) -> Result<RunSummary, RadiosityError> {
        let mut summary = RunSummary::default();
        while summary.steps < max_steps {
            match self.step(scene)? {
                StepOutcome::Paused => {
                    summary.paused = true;
                    break;
                }
                StepOutcome::Converged => {
                    summary.converged = true;
                    break;
                }
                StepOutcome::Shot(report) => {
                    summary.steps += 1;
                    summary.mismatches += report.mismatches;
                    summary.last_shot = report.shot_max;
                    if report.converged {
                        summary.converged = true;
                        break;
                    }
                }
            }
        }
        Ok(summary)
    }

    // Renders and reduces all batches; touches no radiometric state.
    fn gather(&mut self, scene: &mut SceneContainer, shooters: &[Patch]) -> Result<Gathered, RadiosityError> {
        let n = scene.patch_count();
        let format = self.rasterizer.color_format();
        let stale = self
            .codec
            .as_ref()
            .is_none_or(|c| c.requested() != n || c.format() != format);
        if stale {
            self.codec = Some(PatchIdentityCodec::new(n, format));
        }
        let Some(codec) = self.codec.as_ref() else {
            return Ok(Gathered::empty(shooters.len(), n));
        };

        let range = (codec.range() as usize).max(1);
        let batches = n.div_ceil(range).max(1);
        let far = scene.bounds().diagonal() * 2.0 + self.light_offset.length() + 1.0;
        let cameras: Vec<Vec<(Face, HemicubeCamera)>> = shooters
            .iter()
            .map(|p| {
                let cams: Vec<_> = Face::ALL
                    .into_iter()
                    .filter_map(|face| {
                        HemicubeCamera::look_from_patch(p, face, self.light_offset, far).map(|c| (face, c))
                    })
                    .collect();
                if cams.is_empty() {
                    log::warn!(target: "radiosity", "degenerate emitter patch; its energy is shot into nothing");
                }
                cams
            })
            .collect();

        let (w, h) = (self.layout.width(), self.layout.height());
        let sentinel = codec.sentinel();
        let mut out = Gathered::empty(shooters.len(), n);
        out.batches = batches;
        let geometry = scene.geometry();

        for batch in 0..batches {
            let start = batch * range;
            let end = (start + range).min(n);
            let colors: Vec<[f32; 3]> = (0..n)
                .map(|i| {
                    if (start..end).contains(&i) {
                        codec.encode_unorm((i - start + 1) as u32)
                    } else {
                        sentinel
                    }
                })
                .collect();

            self.state = EngineState::RenderingViews;
            self.rasterizer.begin(w, h, sentinel).map_err(raster_err)?;
            for (hc, cams) in cameras.iter().enumerate() {
                for (face, cam) in cams {
                    self.rasterizer
                        .render_view(
                            &geometry,
                            cam,
                            self.layout.viewport(hc, *face),
                            self.layout.scissor(hc, *face),
                            &colors,
                        )
                        .map_err(raster_err)?;
                }
            }
            let image = self.rasterizer.read_back().map_err(raster_err)?;
            if image.width != w || image.height != h {
                return Err(RadiosityError::ImageSize {
                    expected_width: w,
                    expected_height: h,
                    actual_width: image.width,
                    actual_height: image.height,
                });
            }
            if image.format != codec.format() {
                return Err(RadiosityError::ImageFormat {
                    expected: codec.format(),
                    actual: image.format,
                });
            }

            self.state = EngineState::ReducingAndDistributing;
            let records = self
                .reducer
                .reduce(&image, &self.table, &self.layout, codec)
                .map_err(|e| RadiosityError::Reducer(Box::new(e)))?;
            let mut mismatches = 0usize;
            for rec in records {
                if rec.id == 0 {
                    continue;
                }
                let local = rec.id as usize - 1;
                let hc = rec.hemicube as usize;
                if local >= end - start || hc >= shooters.len() {
                    mismatches += 1;
                    continue;
                }
                out.form_factors[hc][start + local] += rec.weight;
            }
            if mismatches > 0 {
                log::warn!(
                    target: "radiosity",
                    "batch {}/{}: discarded {} read-back record(s) with unknown ids",
                    batch + 1,
                    batches,
                    mismatches
                );
            }
            log::debug!(target: "radiosity", "batch {}/{}: patches {}..{}", batch + 1, batches, start, end);
            out.mismatches += mismatches;
        }
        Ok(out)
    }
}

struct Gathered {
    form_factors: Vec<Vec<f32>>,
    batches: usize,
    mismatches: usize,
}

impl Gathered {
    fn empty(hemicubes: usize, patches: usize) -> Self {
        Self {
            form_factors: vec![vec![0.0; patches]; hemicubes],
            batches: 0,
            mismatches: 0,
        }
    }
}

fn raster_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> RadiosityError {
    RadiosityError::Rasterizer(Box::new(e))
}

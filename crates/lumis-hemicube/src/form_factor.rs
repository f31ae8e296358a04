use crate::layout::{Face, HemicubeLayout};
use std::f64::consts::PI;

/// Delta form factor of every texel of the composite texture.
///
/// Weights of one hemicube sum to ~1; unused corner texels weigh 0.
#[derive(Clone, Debug, PartialEq)]
pub struct FormFactorTable {
    layout: HemicubeLayout,
    weights: Vec<f32>,
}

impl FormFactorTable {
    pub fn new(layout: HemicubeLayout) -> Self {
        let s = layout.resolution();
        let front = front_weights(s);
        let side = side_weights(s);
        let (w, h) = (layout.width(), layout.height());
        let mut weights = vec![0.0f32; (w * h) as usize];
        for y in 0..h {
            for x in 0..w {
                let Some(site) = layout.locate(x, y) else {
                    continue;
                };
                weights[(y * w + x) as usize] = match site.face {
                    Face::Front => front[(site.v * s + site.u) as usize],
                    _ => side[(site.v * s + site.u) as usize],
                };
            }
        }
        Self { layout, weights }
    }

    #[inline]
    pub fn layout(&self) -> &HemicubeLayout {
        &self.layout
    }

    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    #[inline]
    pub fn weight(&self, x: u32, y: u32) -> f32 {
        self.weights[(y * self.layout.width() + x) as usize]
    }

    #[inline]
    pub fn row(&self, y: u32) -> &[f32] {
        let w = self.layout.width() as usize;
        &self.weights[y as usize * w..(y as usize + 1) * w]
    }

    /// Sum of the weights of hemicube `h`.
    pub fn hemicube_total(&self, h: usize) -> f64 {
        let tile = 2 * self.layout.resolution() as usize;
        (0..self.layout.height())
            .map(|y| {
                self.row(y)[h * tile..(h + 1) * tile]
                    .iter()
                    .map(|&v| v as f64)
                    .sum::<f64>()
            })
            .sum()
    }
}

/// S×S front face weights, row-major.
pub(crate) fn front_weights(s: u32) -> Vec<f32> {
    let step = 2.0 / s as f64;
    let area = step * step;
    let mut out = Vec::with_capacity((s * s) as usize);
    for j in 0..s {
        let y = (j as f64 + 0.5) * step - 1.0;
        for i in 0..s {
            let x = (i as f64 + 0.5) * step - 1.0;
            let r = x * x + y * y + 1.0;
            out.push((area / (PI * r * r)) as f32);
        }
    }
    out
}

/// Side face weights for `S/2` heights × `S` across positions; height 0 sits on the horizon.
pub(crate) fn side_weights(s: u32) -> Vec<f32> {
    let step = 2.0 / s as f64;
    let area = step * step;
    let mut out = Vec::with_capacity((s * s / 2) as usize);
    for j in 0..s / 2 {
        let h = (j as f64 + 0.5) * step;
        for i in 0..s {
            let x = (i as f64 + 0.5) * step - 1.0;
            let r = x * x + h * h + 1.0;
            out.push((area * h / (PI * r * r)) as f32);
        }
    }
    out
}

use crate::image::IdImage;
use lumis_codec::PatchIdentityCodec;
use lumis_hemicube::{FormFactorTable, HemicubeLayout};
use rayon::prelude::*;
use std::convert::Infallible;

/// Weight given to a run that crosses a texel without form factor.
pub const DEGENERATE_WEIGHT: f32 = 1.0;

/// Summed form factor of one run of equal ids on one scanline of one hemicube.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReduceRecord {
    pub hemicube: u32,
    /// Decoded id; 0 is the sentinel.
    pub id: u32,
    pub weight: f32,
}

/// Turns a read-back hemicube image into weighted visibility records.
pub trait ParallelReducer {
    type Error: std::error::Error + Send + Sync + 'static;

    fn reduce(
        &self,
        image: &IdImage,
        table: &FormFactorTable,
        layout: &HemicubeLayout,
        codec: &PatchIdentityCodec,
    ) -> Result<Vec<ReduceRecord>, Self::Error>;
}

/// Rayon reducer: one work item per (hemicube, scanline).
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuReducer;

impl CpuReducer {
    pub fn new() -> Self {
        Self
    }
}

impl ParallelReducer for CpuReducer {
    type Error = Infallible;

    fn reduce(
        &self,
        image: &IdImage,
        table: &FormFactorTable,
        layout: &HemicubeLayout,
        codec: &PatchIdentityCodec,
    ) -> Result<Vec<ReduceRecord>, Infallible> {
        let tile = 2 * layout.resolution() as usize;
        let rows = layout.height().min(image.height) as usize;
        let hemicubes = layout.count();
        let records = (0..hemicubes * rows)
            .into_par_iter()
            .flat_map_iter(|item| {
                let (h, y) = (item / rows, (item % rows) as u32);
                let x0 = h * tile;
                let x1 = (x0 + tile).min(image.width as usize);
                if x0 >= x1 {
                    return Vec::new();
                }
                let texels = image.row(y);
                let weights = table.row(y);
                reduce_scanline(h as u32, &texels[x0..x1], &weights[x0..x1], codec)
            })
            .collect();
        Ok(records)
    }
}

fn reduce_scanline(
    hemicube: u32,
    texels: &[u32],
    weights: &[f32],
    codec: &PatchIdentityCodec,
) -> Vec<ReduceRecord> {
    let mut out = Vec::new();
    let mut run: Option<(u32, f64, bool)> = None;
    for (&texel, &w) in texels.iter().zip(weights) {
        let id = codec.decode_packed(texel);
        match run.as_mut() {
            Some((current, sum, degenerate)) if *current == id => {
                *sum += w as f64;
                *degenerate |= w == 0.0;
            }
            _ => {
                if let Some(done) = run.take() {
                    out.push(finish(hemicube, done));
                }
                run = Some((id, w as f64, w == 0.0));
            }
        }
    }
    if let Some(done) = run {
        out.push(finish(hemicube, done));
    }
    out
}

#[inline]
fn finish(hemicube: u32, (id, sum, degenerate): (u32, f64, bool)) -> ReduceRecord {
    ReduceRecord {
        hemicube,
        id,
        weight: if degenerate { DEGENERATE_WEIGHT } else { sum as f32 },
    }
}

//! Progressive hemicube radiosity: emitter selection, identity-colored
//! hemicube rendering, parallel reduction and energy distribution.
#![forbid(unsafe_code)]

mod config;
mod engine;
mod error;
mod image;
mod raster;
mod reduce;
mod soft;

pub use config::{FormatName, RadiosityConfig};
pub use engine::{EngineState, RadiosityEngine, RunSummary, StepOutcome, StepReport};
pub use error::{BoxError, ConfigError, RadiosityError};
pub use image::IdImage;
pub use raster::Rasterizer;
pub use reduce::{CpuReducer, DEGENERATE_WEIGHT, ParallelReducer, ReduceRecord};
pub use soft::{SoftRasterError, SoftwareRasterizer};

pub use lumis_codec::{ColorFormat, PatchIdentityCodec};
pub use lumis_hemicube::{Face, FormFactorTable, HemicubeCamera, HemicubeLayout, Rect};

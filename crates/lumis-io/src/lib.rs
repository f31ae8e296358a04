//! Scene descriptions and patch persistence in TOML.
#![forbid(unsafe_code)]

mod error;
mod persist;
mod scene;

pub use error::SceneIoError;
pub use persist::{PatchFile, PatchRecord, load_patches, save_patches};
pub use scene::{ModelDesc, SceneDescription};

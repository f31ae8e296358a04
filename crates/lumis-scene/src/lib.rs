//! Patches, models and the scene container feeding the radiosity solver.
#![forbid(unsafe_code)]

mod container;
mod model;
mod patch;
mod primitives;
mod subdivide;

pub use container::{ModelId, SceneContainer, SceneGeometry};
pub use model::Model;
pub use patch::{Compass, Patch, UNLINKED};
pub use primitives::Facing;
pub use subdivide::AREA_TOLERANCE;

pub use lumis_geom::{Aabb, Rgb, Vec3};

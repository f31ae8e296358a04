//! Hemicube geometry: composite texture layout, analytic form factors and
//! the per-face cameras placed on a patch.
#![forbid(unsafe_code)]

mod camera;
mod form_factor;
mod layout;

pub use camera::HemicubeCamera;
pub use form_factor::FormFactorTable;
pub use layout::{Face, HemicubeLayout, Rect, TexelSite};

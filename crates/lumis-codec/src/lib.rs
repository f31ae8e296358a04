//! Patch-identity colors: patch indices encoded into fixed-point RGB so a
//! rasterized pixel tells which patch it sees.
#![forbid(unsafe_code)]

mod format;
mod identity;
pub mod packing;

pub use format::{ColorFormat, Quantization};
pub use identity::PatchIdentityCodec;

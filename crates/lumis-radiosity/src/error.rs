use std::path::PathBuf;
use thiserror::Error;

/// Error type carried out of rasterizer and reducer backends.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("hemicube resolution must be even and at least 2, got {0}")]
    Resolution(u32),

    #[error("at least one hemicube is required")]
    HemicubeCount,

    #[error("max patch area must be positive and finite, got {0}")]
    PatchArea(f32),

    #[error("epsilon must be finite and non-negative, got {0}")]
    Epsilon(f32),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum RadiosityError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("rasterizer failed: {0}")]
    Rasterizer(#[source] BoxError),

    #[error("reducer failed: {0}")]
    Reducer(#[source] BoxError),

    /// The read-back image does not cover the hemicube texture.
    #[error("read-back image is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    ImageSize {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("read-back image is {actual:?} but identities were encoded for {expected:?}")]
    ImageFormat {
        expected: lumis_codec::ColorFormat,
        actual: lumis_codec::ColorFormat,
    },
}

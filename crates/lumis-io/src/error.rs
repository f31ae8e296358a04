use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneIoError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to write TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("model {index}: {reason}")]
    InvalidModel { index: usize, reason: String },

    #[error("patch record {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("unsupported patch file version {0}")]
    Version(u32),
}

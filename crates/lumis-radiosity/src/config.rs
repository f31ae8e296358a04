use crate::error::ConfigError;
use lumis_codec::ColorFormat;
use lumis_hemicube::HemicubeLayout;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Identity render target format, by name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatName {
    #[default]
    Rgb10a2,
    Rgba8,
}

impl FormatName {
    pub fn color_format(self) -> ColorFormat {
        match self {
            FormatName::Rgb10a2 => ColorFormat::RGB10A2,
            FormatName::Rgba8 => ColorFormat::RGBA8,
        }
    }
}

/// Solver tunables, read from the `[radiosity]` table of a TOML file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiosityConfig {
    /// Pixels per hemicube side; must be even.
    pub hemicube_resolution: u32,
    /// Emitters shot per step.
    pub hemicubes: u32,
    pub max_patch_area: f32,
    /// Convergence threshold on the strongest shot magnitude.
    pub epsilon: f32,
    pub color_format: FormatName,
}

impl Default for RadiosityConfig {
    fn default() -> Self {
        Self {
            hemicube_resolution: 128,
            hemicubes: 4,
            max_patch_area: 0.05,
            epsilon: 1e-3,
            color_format: FormatName::Rgb10a2,
        }
    }
}

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    radiosity: RadiosityConfig,
}

impl RadiosityConfig {
    /// Parses a document whose `[radiosity]` table may be absent or partial.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(toml_str)?;
        file.radiosity.validate()?;
        Ok(file.radiosity)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let res = self.hemicube_resolution;
        if res < 2 || res % 2 != 0 {
            return Err(ConfigError::Resolution(res));
        }
        if self.hemicubes == 0 {
            return Err(ConfigError::HemicubeCount);
        }
        if !(self.max_patch_area > 0.0 && self.max_patch_area.is_finite()) {
            return Err(ConfigError::PatchArea(self.max_patch_area));
        }
        if !(self.epsilon >= 0.0 && self.epsilon.is_finite()) {
            return Err(ConfigError::Epsilon(self.epsilon));
        }
        if !res.is_power_of_two() {
            log::warn!(target: "radiosity", "hemicube resolution {} is not a power of two", res);
        }
        Ok(())
    }

    pub fn layout(&self) -> Result<HemicubeLayout, ConfigError> {
        self.validate()?;
        HemicubeLayout::new(self.hemicube_resolution, self.hemicubes)
            .ok_or(ConfigError::Resolution(self.hemicube_resolution))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = RadiosityConfig::from_toml_str("").expect("parse");
        assert_eq!(cfg, RadiosityConfig::default());
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let cfg = RadiosityConfig::from_toml_str(
            "[radiosity]\nhemicube_resolution = 64\ncolor_format = \"rgba8\"\n",
        )
        .expect("parse");
        assert_eq!(cfg.hemicube_resolution, 64);
        assert_eq!(cfg.hemicubes, 4);
        assert_eq!(cfg.color_format.color_format(), ColorFormat::RGBA8);
    }

    #[test]
    fn rejects_invalid_values() {
        let odd = RadiosityConfig::from_toml_str("[radiosity]\nhemicube_resolution = 33\n");
        assert!(matches!(odd, Err(ConfigError::Resolution(33))));
        let none = RadiosityConfig::from_toml_str("[radiosity]\nhemicubes = 0\n");
        assert!(matches!(none, Err(ConfigError::HemicubeCount)));
        let area = RadiosityConfig::from_toml_str("[radiosity]\nmax_patch_area = -1.0\n");
        assert!(matches!(area, Err(ConfigError::PatchArea(_))));
        let eps = RadiosityConfig::from_toml_str("[radiosity]\nepsilon = -0.5\n");
        assert!(matches!(eps, Err(ConfigError::Epsilon(_))));
        let bad = RadiosityConfig::from_toml_str("[radiosity]\ncolor_format = \"rgb565\"\n");
        assert!(matches!(bad, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RadiosityConfig::from_path("/nonexistent/lumis.toml").expect_err("missing");
        assert!(err.to_string().contains("/nonexistent/lumis.toml"));
    }
}

use crate::error::SceneIoError;
use lumis_geom::Vec3;
use lumis_scene::{Model, Patch, SceneContainer};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const PATCH_FILE_VERSION: u32 = 1;

/// Stored form of one patch. Neighbors are offsets from the patch's own
/// index so a file stays valid when it is appended to another.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchRecord {
    pub corners: [[f32; 3]; 4],
    pub albedo: [f32; 3],
    pub reflectivity: f32,
    #[serde(default)]
    pub illumination: [f32; 3],
    #[serde(default)]
    pub radiosity: [f32; 3],
    /// N, NE, E, SE, S, SW, W, NW.
    #[serde(default)]
    pub neighbors: [i64; 8],
}

impl PatchRecord {
    pub fn from_patch(patch: &Patch, own: usize, neighbors: [usize; 8]) -> Self {
        Self {
            corners: patch.corners().map(Vec3::to_array),
            albedo: patch.albedo.to_array(),
            reflectivity: patch.reflectivity,
            illumination: patch.illumination.to_array(),
            radiosity: patch.radiosity.to_array(),
            neighbors: neighbors.map(|n| n as i64 - own as i64),
        }
    }

    /// Rebuilds the patch with neighbors resolved against `own` within `count` patches.
    pub fn to_patch(&self, own: usize, count: usize) -> Result<Patch, SceneIoError> {
        let invalid = |reason: String| SceneIoError::InvalidRecord { index: own, reason };
        let mut neighbors = [0u32; 8];
        for (slot, offset) in neighbors.iter_mut().zip(self.neighbors) {
            let target = own as i64 + offset;
            if target < 0 || target >= count as i64 {
                return Err(invalid(format!("neighbor offset {offset} leaves the patch list")));
            }
            *slot = target as u32;
        }
        let mut values = self
            .corners
            .iter()
            .chain([&self.albedo, &self.illumination, &self.radiosity])
            .flatten()
            .chain([&self.reflectivity]);
        if values.any(|v| !v.is_finite()) {
            return Err(invalid("non-finite value".to_string()));
        }
        Ok(Patch::new(
            self.corners.map(Vec3::from_array),
            Vec3::from_array(self.albedo),
            self.reflectivity,
        )
        .with_illumination(Vec3::from_array(self.illumination))
        .with_radiosity(Vec3::from_array(self.radiosity))
        .with_neighbors(neighbors))
    }
}

/// Whole-scene snapshot: `[[patch]]` tables in global patch order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchFile {
    pub version: u32,
    #[serde(default, rename = "patch")]
    pub patches: Vec<PatchRecord>,
}

impl PatchFile {
    pub fn from_scene(scene: &SceneContainer) -> Self {
        let patches = scene
            .patches()
            .enumerate()
            .map(|(i, p)| {
                let mut neighbors = [i; 8];
                for (slot, dir) in neighbors.iter_mut().zip(lumis_scene::Compass::ALL) {
                    *slot = scene.neighbor(i, dir).unwrap_or(i);
                }
                PatchRecord::from_patch(p, i, neighbors)
            })
            .collect();
        Self {
            version: PATCH_FILE_VERSION,
            patches,
        }
    }

    /// One model holding every stored patch, links intact.
    pub fn to_model(&self, name: &str) -> Result<Model, SceneIoError> {
        if self.version != PATCH_FILE_VERSION {
            return Err(SceneIoError::Version(self.version));
        }
        let count = self.patches.len();
        let patches = self
            .patches
            .iter()
            .enumerate()
            .map(|(i, r)| r.to_patch(i, count))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Model::from_patches(name, patches))
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, SceneIoError> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn to_toml_string(&self) -> Result<String, SceneIoError> {
        Ok(toml::to_string(self)?)
    }
}

pub fn save_patches(scene: &SceneContainer, path: impl AsRef<Path>) -> Result<(), SceneIoError> {
    let path = path.as_ref();
    let text = PatchFile::from_scene(scene).to_toml_string()?;
    fs::write(path, text).map_err(|source| SceneIoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(target: "scene", "saved {} patches to {}", scene.patch_count(), path.display());
    Ok(())
}

pub fn load_patches(path: impl AsRef<Path>) -> Result<SceneContainer, SceneIoError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SceneIoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let model = PatchFile::from_toml_str(&text)?.to_model("loaded")?;
    log::info!(target: "scene", "loaded {} patches from {}", model.len(), path.display());
    let mut scene = SceneContainer::new();
    scene.add_model(model);
    Ok(scene)
}

use crate::error::SceneIoError;
use lumis_geom::Vec3;
use lumis_scene::{Facing, Model, SceneContainer};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_albedo() -> [f32; 3] {
    [0.75, 0.75, 0.75]
}

fn default_reflectivity() -> f32 {
    0.8
}

fn default_divisions() -> [u32; 2] {
    [1, 1]
}

/// One model entry: `[[model]]` with a `kind` tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelDesc {
    /// Closed box with inward faces; `faces` overrides the albedo per face
    /// in order -X, +X, -Y, +Y, -Z, +Z.
    Room {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        min: [f32; 3],
        max: [f32; 3],
        #[serde(default = "default_albedo")]
        albedo: [f32; 3],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        faces: Option<Vec<[f32; 3]>>,
        #[serde(default = "default_reflectivity")]
        reflectivity: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        emission: Option<[f32; 3]>,
    },
    Cuboid {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        min: [f32; 3],
        max: [f32; 3],
        #[serde(default = "default_albedo")]
        albedo: [f32; 3],
        #[serde(default = "default_reflectivity")]
        reflectivity: f32,
        #[serde(default)]
        inward: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        emission: Option<[f32; 3]>,
    },
    /// Corners in A, B, C, D order, counter-clockwise seen from the lit side.
    Quad {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        corners: [[f32; 3]; 4],
        #[serde(default = "default_albedo")]
        albedo: [f32; 3],
        #[serde(default = "default_reflectivity")]
        reflectivity: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        emission: Option<[f32; 3]>,
    },
    /// A quad pre-split into `divisions` = [u, v] linked cells.
    Plane {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        corners: [[f32; 3]; 4],
        #[serde(default = "default_divisions")]
        divisions: [u32; 2],
        #[serde(default = "default_albedo")]
        albedo: [f32; 3],
        #[serde(default = "default_reflectivity")]
        reflectivity: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        emission: Option<[f32; 3]>,
    },
}

impl ModelDesc {
    fn build(&self, index: usize) -> Result<Model, SceneIoError> {
        let invalid = |reason: String| SceneIoError::InvalidModel { index, reason };
        let (albedo, reflectivity, emission) = match self {
            ModelDesc::Room { albedo, reflectivity, emission, .. }
            | ModelDesc::Cuboid { albedo, reflectivity, emission, .. }
            | ModelDesc::Quad { albedo, reflectivity, emission, .. }
            | ModelDesc::Plane { albedo, reflectivity, emission, .. } => (*albedo, *reflectivity, *emission),
        };
        check_unit_rgb(albedo).map_err(|r| invalid(format!("albedo {r}")))?;
        if !(0.0..=1.0).contains(&reflectivity) {
            return Err(invalid(format!("reflectivity {reflectivity} outside [0, 1]")));
        }
        if let Some(e) = emission {
            if e.iter().any(|c| !c.is_finite() || *c < 0.0) {
                return Err(invalid(format!("emission {e:?} must be finite and non-negative")));
            }
        }
        let name = |fallback: &str| -> String {
            let explicit = match self {
                ModelDesc::Room { name, .. }
                | ModelDesc::Cuboid { name, .. }
                | ModelDesc::Quad { name, .. }
                | ModelDesc::Plane { name, .. } => name.clone(),
            };
            explicit.unwrap_or_else(|| format!("{fallback}{index}"))
        };
        let color = Vec3::from_array(albedo);

        let mut model = match self {
            ModelDesc::Room { min, max, faces, .. } => {
                let (min, max) = checked_box(*min, *max).map_err(invalid)?;
                let mut m = Model::cuboid(name("room"), min, max, color, reflectivity, Facing::Inward);
                if let Some(faces) = faces {
                    if faces.len() != 6 {
                        return Err(invalid(format!("room needs 6 face colors, got {}", faces.len())));
                    }
                    for (p, face) in m.patches_mut().iter_mut().zip(faces) {
                        check_unit_rgb(*face).map_err(|r| invalid(format!("face albedo {r}")))?;
                        p.albedo = Vec3::from_array(*face);
                    }
                }
                m
            }
            ModelDesc::Cuboid { min, max, inward, .. } => {
                let (min, max) = checked_box(*min, *max).map_err(invalid)?;
                let facing = if *inward { Facing::Inward } else { Facing::Outward };
                Model::cuboid(name("cuboid"), min, max, color, reflectivity, facing)
            }
            ModelDesc::Quad { corners, .. } => {
                Model::quad(name("quad"), corners.map(Vec3::from_array), color, reflectivity)
            }
            ModelDesc::Plane { corners, divisions, .. } => {
                let [nu, nv] = *divisions;
                if nu == 0 || nv == 0 {
                    return Err(invalid(format!("plane divisions {divisions:?} must be positive")));
                }
                Model::grid_plane(
                    name("plane"),
                    corners.map(Vec3::from_array),
                    nu as usize,
                    nv as usize,
                    color,
                    reflectivity,
                )
            }
        };
        if model.total_area() <= 0.0 {
            return Err(invalid("model has no area".to_string()));
        }
        if let Some(e) = emission {
            model.set_emission(Vec3::from_array(e));
        }
        Ok(model)
    }
}

fn check_unit_rgb(c: [f32; 3]) -> Result<(), String> {
    if c.iter().all(|v| (0.0..=1.0).contains(v)) {
        Ok(())
    } else {
        Err(format!("{c:?} outside [0, 1]"))
    }
}

fn checked_box(min: [f32; 3], max: [f32; 3]) -> Result<(Vec3, Vec3), String> {
    if (0..3).all(|i| min[i] < max[i]) {
        Ok((Vec3::from_array(min), Vec3::from_array(max)))
    } else {
        Err(format!("box min {min:?} must be below max {max:?}"))
    }
}

/// A scene file: a list of `[[model]]` tables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "model")]
    pub models: Vec<ModelDesc>,
}

impl SceneDescription {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, SceneIoError> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SceneIoError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| SceneIoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn to_toml_string(&self) -> Result<String, SceneIoError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Builds every model into a fresh container, unsubdivided.
    pub fn build(&self) -> Result<SceneContainer, SceneIoError> {
        let mut scene = SceneContainer::new();
        for (i, desc) in self.models.iter().enumerate() {
            scene.add_model(desc.build(i)?);
        }
        log::info!(
            target: "scene",
            "built scene '{}': {} models, {} patches",
            self.name,
            scene.model_count(),
            scene.patch_count()
        );
        Ok(scene)
    }

    /// The Cornell box: red left wall, green right wall, a ceiling light and two blocks.
    pub fn cornell() -> Self {
        let white = [0.73, 0.73, 0.73];
        let red = [0.65, 0.05, 0.05];
        let green = [0.12, 0.45, 0.15];
        let light_y = 1.99;
        Self {
            name: "cornell".to_string(),
            models: vec![
                ModelDesc::Room {
                    name: Some("walls".to_string()),
                    min: [0.0, 0.0, 0.0],
                    max: [2.0, 2.0, 2.0],
                    albedo: white,
                    faces: Some(vec![red, green, white, white, white, white]),
                    reflectivity: 0.8,
                    emission: None,
                },
                ModelDesc::Quad {
                    name: Some("light".to_string()),
                    corners: [
                        [0.75, light_y, 0.75],
                        [1.25, light_y, 0.75],
                        [1.25, light_y, 1.25],
                        [0.75, light_y, 1.25],
                    ],
                    albedo: [0.78, 0.78, 0.78],
                    reflectivity: 0.8,
                    emission: Some([1.0, 0.95, 0.85]),
                },
                ModelDesc::Cuboid {
                    name: Some("short block".to_string()),
                    min: [1.1, 0.0, 0.3],
                    max: [1.7, 0.6, 0.9],
                    albedo: white,
                    reflectivity: 0.8,
                    inward: false,
                    emission: None,
                },
                ModelDesc::Cuboid {
                    name: Some("tall block".to_string()),
                    min: [0.3, 0.0, 1.0],
                    max: [0.9, 1.2, 1.6],
                    albedo: white,
                    reflectivity: 0.8,
                    inward: false,
                    emission: None,
                },
            ],
        }
    }
}

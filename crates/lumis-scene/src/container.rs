use crate::model::Model;
use crate::patch::{Compass, Patch};
use hashbrown::HashMap;
use lumis_geom::{Aabb, Rgb, Vec3};

/// Stable handle of a model inside a [`SceneContainer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub u32);

/// Flat triangle view of the scene: four vertices per patch, two triangles each.
#[derive(Clone, Copy, Debug)]
pub struct SceneGeometry<'a> {
    pub vertices: &'a [Vec3],
    pub indices: &'a [u32],
}

impl SceneGeometry<'_> {
    #[inline]
    pub fn patch_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Corners of patch `i` in A, B, C, D order.
    #[inline]
    pub fn quad(&self, i: usize) -> [Vec3; 4] {
        let v = &self.vertices[4 * i..4 * i + 4];
        [v[0], v[1], v[2], v[3]]
    }
}

/// Owns the scene's models and exposes their patches under global indices.
///
/// Global patch order is model insertion order, then the model's own order.
/// The flat vertex/index arrays are rebuilt lazily after any change to the
/// model set or to a model's patch list.
#[derive(Debug, Default)]
pub struct SceneContainer {
    models: Vec<(ModelId, Model)>,
    index: HashMap<ModelId, usize>,
    offsets: Vec<usize>,
    patch_count: usize,
    next_id: u32,
    dirty: bool,
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
}

impl SceneContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_model(&mut self, model: Model) -> ModelId {
        let id = ModelId(self.next_id);
        self.next_id += 1;
        self.index.insert(id, self.models.len());
        self.models.push((id, model));
        self.relayout();
        id
    }

    pub fn remove_model(&mut self, id: ModelId) -> Option<Model> {
        let slot = self.index.remove(&id)?;
        let (_, model) = self.models.remove(slot);
        for (pos, (mid, _)) in self.models.iter().enumerate().skip(slot) {
            self.index.insert(*mid, pos);
        }
        self.relayout();
        Some(model)
    }

    pub fn clear(&mut self) {
        self.models.clear();
        self.index.clear();
        self.relayout();
    }

    pub fn model(&self, id: ModelId) -> Option<&Model> {
        self.index.get(&id).map(|&slot| &self.models[slot].1)
    }

    /// Runs `f` on a model and marks the flat arrays for rebuild.
    pub fn edit_model<R>(&mut self, id: ModelId, f: impl FnOnce(&mut Model) -> R) -> Option<R> {
        let slot = *self.index.get(&id)?;
        let out = f(&mut self.models[slot].1);
        self.relayout();
        Some(out)
    }

    /// Applies `f` to every model, e.g. a scene-wide subdivision.
    pub fn edit_models(&mut self, mut f: impl FnMut(&mut Model)) {
        for (_, model) in &mut self.models {
            f(model);
        }
        self.relayout();
    }

    pub fn models(&self) -> impl Iterator<Item = (ModelId, &Model)> {
        self.models.iter().map(|(id, m)| (*id, m))
    }

    #[inline]
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    #[inline]
    pub fn patch_count(&self) -> usize {
        self.patch_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patch_count == 0
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuilds the flat arrays if the scene changed since the last rebuild.
    pub fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.vertices.clear();
        self.indices.clear();
        self.vertices.reserve(4 * self.patch_count);
        self.indices.reserve(6 * self.patch_count);
        for (_, model) in &self.models {
            for p in model.patches() {
                let base = self.vertices.len() as u32;
                self.vertices.extend_from_slice(&p.corners);
                self.indices
                    .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
            }
        }
        self.dirty = false;
        log::debug!(
            target: "scene",
            "rebuilt flat arrays: {} patches, {} vertices",
            self.patch_count,
            self.vertices.len()
        );
    }

    /// Refreshed triangle arrays.
    pub fn geometry(&mut self) -> SceneGeometry<'_> {
        self.refresh();
        SceneGeometry {
            vertices: &self.vertices,
            indices: &self.indices,
        }
    }

    pub fn patch(&self, i: usize) -> Option<&Patch> {
        let (slot, local) = self.locate(i)?;
        self.models[slot].1.patches().get(local)
    }

    /// Mutable radiometric access; geometry edits go through [`Self::edit_model`].
    pub fn patch_mut(&mut self, i: usize) -> Option<&mut Patch> {
        let (slot, local) = self.locate(i)?;
        self.models[slot].1.patches_mut().get_mut(local)
    }

    pub fn patches(&self) -> impl Iterator<Item = &Patch> {
        self.models.iter().flat_map(|(_, m)| m.patches().iter())
    }

    pub fn patches_mut(&mut self) -> impl Iterator<Item = &mut Patch> {
        self.models
            .iter_mut()
            .flat_map(|(_, m)| m.patches_mut().iter_mut())
    }

    /// Global index of patch `i`'s neighbor in direction `dir`.
    pub fn neighbor(&self, i: usize, dir: Compass) -> Option<usize> {
        let (slot, local) = self.locate(i)?;
        let patch = self.models[slot].1.patches().get(local)?;
        Some(self.offsets[slot] + patch.neighbor(dir) as usize)
    }

    /// Up to `k` patches with the largest `|radiosity|²`, strongest first.
    ///
    /// Patches with no energy are never selected; equal energies keep index
    /// order. Unfilled slots are `None`.
    pub fn top_emitters(&self, k: usize) -> Vec<Option<usize>> {
        let mut best: Vec<(f32, usize)> = Vec::with_capacity(k + 1);
        if k > 0 {
            for (i, p) in self.patches().enumerate() {
                let energy = p.energy_sq();
                if !(energy > 0.0) {
                    continue;
                }
                if best.len() == k && energy <= best[k - 1].0 {
                    continue;
                }
                let pos = best.partition_point(|&(e, _)| e >= energy);
                best.insert(pos, (energy, i));
                best.truncate(k);
            }
        }
        let mut out: Vec<Option<usize>> = best.into_iter().map(|(_, i)| Some(i)).collect();
        out.resize(k, None);
        out
    }

    /// Per-corner display colors averaged with the three neighbors sharing each corner.
    pub fn smooth_shade(&self, i: usize) -> Option<[Rgb; 4]> {
        let patch = self.patch(i)?;
        let own = patch.shade_value();
        let mut out = [own; 4];
        for (corner, dirs) in Compass::CORNER_NEIGHBORS.iter().enumerate() {
            let mut sum = own;
            for &dir in dirs {
                let j = self.neighbor(i, dir)?;
                sum += self.patch(j)?.shade_value();
            }
            out[corner] = sum * 0.25;
        }
        Some(out)
    }

    pub fn bounds(&self) -> Aabb {
        self.models
            .iter()
            .fold(Aabb::EMPTY, |acc, (_, m)| acc.union(m.bounds()))
    }

    /// Sum of all unshot energy over every channel.
    pub fn total_unshot(&self) -> f32 {
        self.patches().map(|p| p.radiosity.sum()).sum()
    }

    pub fn total_illumination(&self) -> Rgb {
        self.patches().fold(Vec3::ZERO, |acc, p| acc + p.illumination)
    }

    fn relayout(&mut self) {
        self.offsets.clear();
        let mut total = 0usize;
        for (_, m) in &self.models {
            self.offsets.push(total);
            total += m.len();
        }
        self.patch_count = total;
        self.dirty = true;
    }

    fn locate(&self, i: usize) -> Option<(usize, usize)> {
        if i >= self.patch_count {
            return None;
        }
        let slot = self.offsets.partition_point(|&o| o <= i).checked_sub(1)?;
        Some((slot, i - self.offsets[slot]))
    }
}

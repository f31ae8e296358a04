use crate::patch::{Patch, UNLINKED};
use lumis_geom::{Aabb, Rgb};

/// A named collection of patches with model-local neighbor links.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    name: String,
    patches: Vec<Patch>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            patches: Vec::new(),
        }
    }

    /// Adopts `patches`; unlinked or out-of-range neighbor slots become self-references.
    pub fn from_patches(name: impl Into<String>, patches: Vec<Patch>) -> Self {
        let mut model = Self::new(name);
        model.extend_linked(patches);
        model
    }

    /// Appends a patch with its own index in every unlinked slot and returns that index.
    pub fn push(&mut self, mut patch: Patch) -> u32 {
        let index = self.patches.len() as u32;
        for slot in patch.neighbors.iter_mut() {
            if *slot == UNLINKED {
                *slot = index;
            }
        }
        self.patches.push(patch);
        index
    }

    /// Appends a group whose neighbor indices are relative to the group itself.
    pub fn extend_linked(&mut self, group: Vec<Patch>) {
        let base = self.patches.len() as u32;
        let len = group.len() as u32;
        for (i, mut patch) in group.into_iter().enumerate() {
            let own = base + i as u32;
            for slot in patch.neighbors.iter_mut() {
                *slot = if *slot < len { base + *slot } else { own };
            }
            self.patches.push(patch);
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    #[inline]
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Mutable radiometric access. Neighbor links stay owned by the model.
    #[inline]
    pub fn patches_mut(&mut self) -> &mut [Patch] {
        &mut self.patches
    }

    pub fn into_patches(self) -> Vec<Patch> {
        self.patches
    }

    /// Sets the unshot energy of every patch, turning the model into a light source.
    pub fn set_emission(&mut self, emission: Rgb) {
        for p in &mut self.patches {
            p.radiosity = emission;
        }
    }

    pub fn total_area(&self) -> f32 {
        self.patches.iter().map(Patch::area).sum()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.patches.iter().flat_map(|p| p.corners))
    }

    /// Splits every patch until all satisfy `max_area` and relinks neighbors.
    ///
    /// Links into a split parent fall back to self. Returns the number of
    /// patches that were split.
    pub fn subdivide(&mut self, max_area: f32) -> usize {
        if self
            .patches
            .iter()
            .any(|p| p.illumination.length_squared() > 0.0)
        {
            log::warn!(
                target: "scene",
                "subdividing model '{}' after shooting; children copy their parent's energy",
                self.name
            );
        }

        let mut arena = std::mem::take(&mut self.patches);
        let mut alive = vec![true; arena.len()];
        let mut work: Vec<usize> = (0..arena.len()).rev().collect();
        let mut splits = 0usize;

        while let Some(i) = work.pop() {
            let Some(children) = arena[i].divide(max_area) else {
                continue;
            };
            alive[i] = false;
            splits += 1;
            let base = arena.len();
            for (k, mut child) in children.into_iter().enumerate() {
                for slot in child.neighbors.iter_mut() {
                    *slot += base as u32;
                }
                arena.push(child);
                alive.push(true);
                work.push(base + k);
            }
        }

        if splits == 0 {
            self.patches = arena;
            return 0;
        }

        let mut remap = vec![UNLINKED; arena.len()];
        let mut next = 0u32;
        for (i, live) in alive.iter().enumerate() {
            if *live {
                remap[i] = next;
                next += 1;
            }
        }

        self.patches = arena
            .into_iter()
            .enumerate()
            .filter(|(i, _)| alive[*i])
            .map(|(i, mut patch)| {
                let own = remap[i];
                for slot in patch.neighbors.iter_mut() {
                    let target = remap.get(*slot as usize).copied().unwrap_or(UNLINKED);
                    *slot = if target == UNLINKED { own } else { target };
                }
                patch
            })
            .collect();

        log::debug!(
            target: "scene",
            "model '{}': {} splits, {} patches",
            self.name,
            splits,
            self.patches.len()
        );
        splits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::Compass;
    use lumis_geom::Vec3;

    fn square(x0: f32) -> Patch {
        Patch::new(
            [
                Vec3::new(x0, 0.0, 0.0),
                Vec3::new(x0 + 1.0, 0.0, 0.0),
                Vec3::new(x0 + 1.0, 1.0, 0.0),
                Vec3::new(x0, 1.0, 0.0),
            ],
            Vec3::ONE,
            0.5,
        )
    }

    #[test]
    fn push_self_links() {
        let mut m = Model::new("m");
        assert_eq!(m.push(square(0.0)), 0);
        assert_eq!(m.push(square(1.0)), 1);
        assert_eq!(m.patches()[1].neighbors(), &[1; 8]);
    }

    #[test]
    fn explicit_links_survive_adoption() {
        let a = square(0.0).with_neighbors([0, 0, 1, 0, 0, 0, 0, 0]);
        let b = square(1.0).with_neighbors([1, 1, 1, 1, 1, 1, 0, 9]);
        let m = Model::from_patches("pair", vec![a, b]);
        assert_eq!(m.patches()[0].neighbor(Compass::E), 1);
        assert_eq!(m.patches()[1].neighbor(Compass::W), 0);
        // Out of range falls back to self.
        assert_eq!(m.patches()[1].neighbor(Compass::NW), 1);
    }

    #[test]
    fn subdivide_keeps_links_in_range_and_area() {
        let mut m = Model::new("strip");
        m.push(square(0.0));
        m.push(square(1.0));
        let splits = m.subdivide(0.1);
        assert_eq!(splits, 2);
        assert!((m.total_area() - 2.0).abs() < 1e-4);
        let n = m.len() as u32;
        for p in m.patches() {
            assert!(p.area() <= 0.1 * 1.01);
            assert!(p.neighbors().iter().all(|&k| k < n));
        }
    }

    #[test]
    fn subdivide_without_work_is_identity() {
        let mut m = Model::new("tiny");
        m.push(square(0.0));
        let before = m.clone();
        assert_eq!(m.subdivide(4.0), 0);
        assert_eq!(m, before);
    }

    #[test]
    fn links_to_split_parent_fall_back_to_self() {
        let small = Patch::new(
            [
                Vec3::new(-0.1, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.1, 0.0),
                Vec3::new(-0.1, 0.1, 0.0),
            ],
            Vec3::ONE,
            0.5,
        )
        .with_neighbors([0, 0, 1, 0, 0, 0, 0, 0]);
        let big = square(0.0).with_neighbors([1, 1, 1, 1, 1, 1, 0, 1]);
        let mut m = Model::from_patches("mixed", vec![small, big]);
        m.subdivide(0.5);
        assert_eq!(m.patches()[0].neighbor(Compass::E), 0);
    }
}

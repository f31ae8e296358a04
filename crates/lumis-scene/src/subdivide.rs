use crate::patch::{Compass, Patch};

/// Relative slack on the area bound before a patch counts as too large.
pub const AREA_TOLERANCE: f32 = 0.01;

// Per-axis cap for a single divide; children above the bound are split again by the worklist.
const MAX_SPLITS_PER_AXIS: usize = 512;

impl Patch {
    /// Splits the patch into a grid of children no larger than `max_area`.
    ///
    /// Returns `None` when the patch already satisfies the bound or cannot be
    /// split (degenerate area or zero-length edges). Children are ordered row by
    /// row from corner A and their neighbor indices point into the returned
    /// vector; children on the parent's boundary link to themselves there.
    pub fn divide(&self, max_area: f32) -> Option<Vec<Patch>> {
        if !(max_area > 0.0) || !max_area.is_finite() {
            return None;
        }
        let area = self.area();
        if !area.is_finite() || area <= max_area * (1.0 + AREA_TOLERANCE) {
            return None;
        }

        let [a, b, c, d] = self.corners;
        let edge_u = a.distance(b).max(d.distance(c));
        let edge_v = b.distance(c).max(a.distance(d));
        if !(edge_u > 0.0 && edge_v > 0.0) || !edge_u.is_finite() || !edge_v.is_finite() {
            return None;
        }

        let side = max_area.sqrt();
        let mut kx = ((edge_u / side).ceil() as usize).clamp(1, MAX_SPLITS_PER_AXIS);
        let mut ky = ((edge_v / side).ceil() as usize).clamp(1, MAX_SPLITS_PER_AXIS);
        if kx * ky == 1 {
            kx = 2;
            ky = 2;
        }
        Some(self.grid(kx, ky))
    }

    /// Bilinear `kx` × `ky` split with grid-local neighbor links.
    pub(crate) fn grid(&self, kx: usize, ky: usize) -> Vec<Patch> {
        let kx = kx.max(1);
        let ky = ky.max(1);
        let mut children = Vec::with_capacity(kx * ky);
        for j in 0..ky {
            let v0 = j as f32 / ky as f32;
            let v1 = (j + 1) as f32 / ky as f32;
            for i in 0..kx {
                let u0 = i as f32 / kx as f32;
                let u1 = (i + 1) as f32 / kx as f32;
                let own = (j * kx + i) as u32;
                let mut neighbors = [own; 8];
                for dir in Compass::ALL {
                    let (du, dv) = dir.offset();
                    let ni = i as i64 + du;
                    let nj = j as i64 + dv;
                    if ni >= 0 && nj >= 0 && (ni as usize) < kx && (nj as usize) < ky {
                        neighbors[dir.index()] = (nj as usize * kx + ni as usize) as u32;
                    }
                }
                children.push(Patch {
                    corners: [
                        self.point_at(u0, v0),
                        self.point_at(u1, v0),
                        self.point_at(u1, v1),
                        self.point_at(u0, v1),
                    ],
                    albedo: self.albedo,
                    reflectivity: self.reflectivity,
                    radiosity: self.radiosity,
                    illumination: self.illumination,
                    neighbors,
                });
            }
        }
        children
    }
}

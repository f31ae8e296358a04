use crate::layout::{Face, Rect};
use lumis_geom::Vec3;
use lumis_scene::Patch;

/// 90° square camera looking through one hemicube face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HemicubeCamera {
    pub eye: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub near: f32,
    pub far: f32,
}

impl HemicubeCamera {
    /// Camera on `patch` for `face`, or `None` for a degenerate patch.
    ///
    /// The eye sits at the centroid plus `offset`, lifted slightly along the
    /// normal so the emitter's own plane stays behind the near plane.
    pub fn look_from_patch(patch: &Patch, face: Face, offset: Vec3, far: f32) -> Option<Self> {
        let n = patch.normal();
        let [a, b, _, _] = patch.corners();
        let along = b - a;
        if n == Vec3::ZERO || along.length_squared() == 0.0 {
            return None;
        }
        let t = n.cross(along).normalized();
        if t == Vec3::ZERO {
            return None;
        }
        let r = t.cross(n);

        let (forward, up) = match face {
            Face::Front => (n, t),
            Face::Up => (t, -n),
            Face::Down => (-t, n),
            Face::Left => (r, t),
            Face::Right => (-r, t),
        };
        let lift = (1e-3 * patch.area().sqrt()).max(1e-5);
        Some(Self {
            eye: patch.centroid() + offset + n * lift,
            forward,
            up,
            right: forward.cross(up),
            near: lift,
            far: far.max(lift * 2.0),
        })
    }

    /// Point in camera space: x right, y up, z along the view direction.
    #[inline]
    pub fn to_view(&self, p: Vec3) -> Vec3 {
        let d = p - self.eye;
        Vec3::new(self.right.dot(d), self.up.dot(d), self.forward.dot(d))
    }

    /// Pixel position (column, row) and depth of a camera-space point in front of the near plane.
    #[inline]
    pub fn project(&self, view: Vec3, viewport: &Rect) -> (f32, f32, f32) {
        let x = view.x / view.z;
        let y = view.y / view.z;
        (
            viewport.x as f32 + (x + 1.0) * 0.5 * viewport.w as f32,
            viewport.y as f32 + (1.0 - y) * 0.5 * viewport.h as f32,
            view.z,
        )
    }

    /// Column-major OpenGL view matrix.
    pub fn view_matrix(&self) -> [f32; 16] {
        let (x, y, f, e) = (self.right, self.up, self.forward, self.eye);
        [
            x.x, y.x, -f.x, 0.0, //
            x.y, y.y, -f.y, 0.0, //
            x.z, y.z, -f.z, 0.0, //
            -x.dot(e), -y.dot(e), f.dot(e), 1.0,
        ]
    }

    /// Frustum bounds `(left, right, bottom, top, near, far)` of the 90° view.
    #[inline]
    pub fn frustum(&self) -> [f64; 6] {
        let n = self.near as f64;
        [-n, n, -n, n, n, self.far as f64]
    }
}

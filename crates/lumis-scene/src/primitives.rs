use crate::model::Model;
use crate::patch::Patch;
use lumis_geom::{Rgb, Vec3};

/// Which way a cuboid's faces point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Outward,
    /// Faces point into the box, for rooms and enclosures.
    Inward,
}

impl Model {
    /// A single quad with corners in A, B, C, D order.
    pub fn quad(name: impl Into<String>, corners: [Vec3; 4], albedo: Rgb, reflectivity: f32) -> Self {
        let mut model = Model::new(name);
        model.push(Patch::new(corners, albedo, reflectivity));
        model
    }

    /// A quad pre-split into `nu` × `nv` linked cells.
    pub fn grid_plane(
        name: impl Into<String>,
        corners: [Vec3; 4],
        nu: usize,
        nv: usize,
        albedo: Rgb,
        reflectivity: f32,
    ) -> Self {
        let parent = Patch::new(corners, albedo, reflectivity);
        Model::from_patches(name, parent.grid(nu, nv))
    }

    /// Axis-aligned box of six faces.
    pub fn cuboid(
        name: impl Into<String>,
        min: Vec3,
        max: Vec3,
        albedo: Rgb,
        reflectivity: f32,
        facing: Facing,
    ) -> Self {
        let mut model = Model::new(name);
        for corners in cuboid_faces(min, max) {
            let corners = match facing {
                Facing::Outward => corners,
                Facing::Inward => {
                    let [a, b, c, d] = corners;
                    [a, d, c, b]
                }
            };
            model.push(Patch::new(corners, albedo, reflectivity));
        }
        model
    }
}

/// Outward-wound faces in order -X, +X, -Y, +Y, -Z, +Z.
pub(crate) fn cuboid_faces(min: Vec3, max: Vec3) -> [[Vec3; 4]; 6] {
    let (x0, y0, z0) = (min.x, min.y, min.z);
    let (x1, y1, z1) = (max.x, max.y, max.z);
    let v = Vec3::new;
    [
        [v(x0, y0, z0), v(x0, y0, z1), v(x0, y1, z1), v(x0, y1, z0)],
        [v(x1, y0, z1), v(x1, y0, z0), v(x1, y1, z0), v(x1, y1, z1)],
        [v(x0, y0, z0), v(x1, y0, z0), v(x1, y0, z1), v(x0, y0, z1)],
        [v(x0, y1, z1), v(x1, y1, z1), v(x1, y1, z0), v(x0, y1, z0)],
        [v(x1, y0, z0), v(x0, y0, z0), v(x0, y1, z0), v(x1, y1, z0)],
        [v(x0, y0, z1), v(x1, y0, z1), v(x1, y1, z1), v(x0, y1, z1)],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const AXES: [Vec3; 6] = [
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::X,
        Vec3::new(0.0, -1.0, 0.0),
        Vec3::Y,
        Vec3::new(0.0, 0.0, -1.0),
        Vec3::Z,
    ];

    #[test]
    fn outward_cuboid_normals() {
        let m = Model::cuboid("box", Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0), Vec3::ONE, 0.5, Facing::Outward);
        assert_eq!(m.len(), 6);
        for (p, axis) in m.patches().iter().zip(AXES) {
            assert!((p.normal() - axis).length() < 1e-6, "{:?} vs {:?}", p.normal(), axis);
        }
        assert!((m.total_area() - 2.0 * (2.0 + 3.0 + 6.0)).abs() < 1e-4);
    }

    #[test]
    fn inward_cuboid_normals_point_in() {
        let m = Model::cuboid("room", Vec3::ZERO, Vec3::ONE, Vec3::ONE, 0.5, Facing::Inward);
        let center = Vec3::splat(0.5);
        for p in m.patches() {
            assert!(p.normal().dot(center - p.centroid()) > 0.0);
        }
    }

    #[test]
    fn grid_plane_is_linked() {
        let corners = [
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, -2.0),
            Vec3::new(0.0, 0.0, -2.0),
        ];
        let m = Model::grid_plane("floor", corners, 2, 2, Vec3::ONE, 0.5);
        assert_eq!(m.len(), 4);
        assert_eq!(m.patches()[0].neighbor(crate::Compass::NE), 3);
        assert!((m.patches()[0].normal() - Vec3::Y).length() < 1e-6);
    }
}

use lumis_geom::{Rgb, Vec3};

/// Neighbor slot value of a patch that has not been adopted by a model yet.
pub const UNLINKED: u32 = u32::MAX;

/// Neighbor directions. `E` points from corner A towards B, `N` from A towards D.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Compass {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Compass {
    pub const ALL: [Compass; 8] = [
        Compass::N,
        Compass::NE,
        Compass::E,
        Compass::SE,
        Compass::S,
        Compass::SW,
        Compass::W,
        Compass::NW,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Grid step `(du, dv)` towards this neighbor.
    #[inline]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Compass::N => (0, 1),
            Compass::NE => (1, 1),
            Compass::E => (1, 0),
            Compass::SE => (1, -1),
            Compass::S => (0, -1),
            Compass::SW => (-1, -1),
            Compass::W => (-1, 0),
            Compass::NW => (-1, 1),
        }
    }

    /// The three neighbors sharing each corner, in corner order A, B, C, D.
    pub const CORNER_NEIGHBORS: [[Compass; 3]; 4] = [
        [Compass::W, Compass::SW, Compass::S],
        [Compass::S, Compass::SE, Compass::E],
        [Compass::E, Compass::NE, Compass::N],
        [Compass::N, Compass::NW, Compass::W],
    ];
}

/// Planar quadrilateral surface element with its radiometric state.
///
/// Corners are ordered A, B, C, D counter-clockwise when seen from the side the
/// normal points to. `radiosity` is the energy still to be shot, `illumination`
/// the energy already received and shot.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch {
    pub(crate) corners: [Vec3; 4],
    pub albedo: Rgb,
    pub reflectivity: f32,
    pub radiosity: Rgb,
    pub illumination: Rgb,
    pub(crate) neighbors: [u32; 8],
}

impl Patch {
    pub fn new(corners: [Vec3; 4], albedo: Rgb, reflectivity: f32) -> Self {
        Self {
            corners,
            albedo,
            reflectivity,
            radiosity: Vec3::ZERO,
            illumination: Vec3::ZERO,
            neighbors: [UNLINKED; 8],
        }
    }

    pub fn with_radiosity(mut self, radiosity: Rgb) -> Self {
        self.radiosity = radiosity;
        self
    }

    pub fn with_illumination(mut self, illumination: Rgb) -> Self {
        self.illumination = illumination;
        self
    }

    /// Explicit neighbor indices, interpreted relative to the model that adopts the patch.
    pub fn with_neighbors(mut self, neighbors: [u32; 8]) -> Self {
        self.neighbors = neighbors;
        self
    }

    /// Corners are fixed once the patch exists; geometry changes go through
    /// `Model` so the scene's flat arrays are rebuilt.
    #[inline]
    pub fn corners(&self) -> [Vec3; 4] {
        self.corners
    }

    #[inline]
    pub fn neighbors(&self) -> &[u32; 8] {
        &self.neighbors
    }

    #[inline]
    pub fn neighbor(&self, dir: Compass) -> u32 {
        self.neighbors[dir.index()]
    }

    /// Half the cross product of the diagonals; exact for planar quads.
    #[inline]
    pub fn area(&self) -> f32 {
        self.diagonal_cross().length() * 0.5
    }

    /// Unit normal, or zero for a degenerate quad.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.diagonal_cross().normalized()
    }

    #[inline]
    pub fn centroid(&self) -> Vec3 {
        let [a, b, c, d] = self.corners;
        (a + b + c + d) * 0.25
    }

    /// Bilinear point; `u` runs A→B, `v` runs A→D.
    #[inline]
    pub fn point_at(&self, u: f32, v: f32) -> Vec3 {
        let [a, b, c, d] = self.corners;
        let bottom = a.lerp(b, u);
        let top = d.lerp(c, u);
        bottom.lerp(top, v)
    }

    /// Squared magnitude of the unshot energy, the emitter selection key.
    #[inline]
    pub fn energy_sq(&self) -> f32 {
        self.radiosity.length_squared()
    }

    /// Displayed value: reflected color times all energy seen so far.
    #[inline]
    pub fn shade_value(&self) -> Rgb {
        self.albedo * (self.illumination + self.radiosity)
    }

    #[inline]
    fn diagonal_cross(&self) -> Vec3 {
        let [a, b, c, d] = self.corners;
        (c - a).cross(d - b)
    }
}

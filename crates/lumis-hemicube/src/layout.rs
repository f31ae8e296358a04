/// Pixel rectangle in composite texture space; rows grow downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.right() && y < self.bottom()
    }

    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        (x1 > x0 && y1 > y0).then(|| Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Front,
    Up,
    Down,
    Left,
    Right,
}

impl Face {
    pub const ALL: [Face; 5] = [Face::Front, Face::Up, Face::Down, Face::Left, Face::Right];
}

/// Where a composite texel lands on its hemicube.
///
/// For the front face `u`, `v` are the column and row inside the S×S image.
/// For side faces `u` runs across the face (0..S) and `v` is the height above
/// the horizon (0..S/2, 0 at the horizon).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TexelSite {
    pub hemicube: usize,
    pub face: Face,
    pub u: u32,
    pub v: u32,
}

/// K hemicubes of resolution S laid out side by side in one texture.
///
/// Each hemicube owns a 2S × 2S tile: the front face centred, the four half
/// side faces around it in a cross, the corners unused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HemicubeLayout {
    resolution: u32,
    count: u32,
}

impl HemicubeLayout {
    /// `None` unless `resolution` is even and non-zero and `count` ≥ 1.
    pub fn new(resolution: u32, count: u32) -> Option<Self> {
        let ok = resolution >= 2 && resolution % 2 == 0 && count >= 1;
        ok.then_some(Self { resolution, count })
    }

    #[inline]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count as usize
    }

    #[inline]
    pub fn width(&self) -> u32 {
        2 * self.resolution * self.count
    }

    #[inline]
    pub fn height(&self) -> u32 {
        2 * self.resolution
    }

    #[inline]
    pub fn tile_x(&self, hemicube: usize) -> i32 {
        (2 * self.resolution as usize * hemicube) as i32
    }

    /// Full S×S rectangle the face camera projects into; may extend past the tile.
    pub fn viewport(&self, hemicube: usize, face: Face) -> Rect {
        let s = self.resolution as i32;
        let half = s / 2;
        let (x, y) = match face {
            Face::Front => (half, half),
            Face::Up => (half, -half),
            Face::Down => (half, 3 * half),
            Face::Left => (-half, half),
            Face::Right => (3 * half, half),
        };
        Rect::new(self.tile_x(hemicube) + x, y, s, s)
    }

    /// Part of the viewport that belongs to the hemicube (the above-horizon half of side faces).
    pub fn scissor(&self, hemicube: usize, face: Face) -> Rect {
        let s = self.resolution as i32;
        let half = s / 2;
        let (x, y, w, h) = match face {
            Face::Front => (half, half, s, s),
            Face::Up => (half, 0, s, half),
            Face::Down => (half, 3 * half, s, half),
            Face::Left => (0, half, half, s),
            Face::Right => (3 * half, half, half, s),
        };
        Rect::new(self.tile_x(hemicube) + x, y, w, h)
    }

    /// Classifies a composite texel; corners of a tile and out-of-range texels give `None`.
    pub fn locate(&self, x: u32, y: u32) -> Option<TexelSite> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let s = self.resolution;
        let half = s / 2;
        let hemicube = (x / (2 * s)) as usize;
        let c = x % (2 * s);
        let r = y;
        let in_mid = |t: u32| (half..half + s).contains(&t);
        let (face, u, v) = if in_mid(c) && in_mid(r) {
            (Face::Front, c - half, r - half)
        } else if in_mid(c) && r < half {
            (Face::Up, c - half, r)
        } else if in_mid(c) && r >= half + s {
            (Face::Down, c - half, half - 1 - (r - half - s))
        } else if in_mid(r) && c < half {
            (Face::Left, r - half, c)
        } else if in_mid(r) && c >= half + s {
            (Face::Right, r - half, half - 1 - (c - half - s))
        } else {
            return None;
        };
        Some(TexelSite { hemicube, face, u, v })
    }
}

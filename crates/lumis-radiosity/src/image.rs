use lumis_codec::ColorFormat;

/// Read-back hemicube texture: one packed texel per pixel, rows top to bottom.
#[derive(Clone, Debug, PartialEq)]
pub struct IdImage {
    pub width: u32,
    pub height: u32,
    pub format: ColorFormat,
    pub texels: Vec<u32>,
}

impl IdImage {
    pub fn new(width: u32, height: u32, format: ColorFormat, texels: Vec<u32>) -> Self {
        debug_assert_eq!(texels.len(), (width * height) as usize);
        Self {
            width,
            height,
            format,
            texels,
        }
    }

    /// Image filled with one packed value.
    pub fn filled(width: u32, height: u32, format: ColorFormat, texel: u32) -> Self {
        Self::new(width, height, format, vec![texel; (width * height) as usize])
    }

    #[inline]
    pub fn row(&self, y: u32) -> &[u32] {
        let w = self.width as usize;
        &self.texels[y as usize * w..(y as usize + 1) * w]
    }

    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> u32 {
        self.texels[(y * self.width + x) as usize]
    }
}

/// How the render target turns a unorm float into an integer channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quantization {
    /// Round to nearest; exact for values produced by [`ColorFormat::to_unorm`].
    Nearest,
    /// Floor; may land one step below the encoded value.
    Truncate,
}

/// Destination color format of the identity render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColorFormat {
    pub bits: [u32; 3],
    pub quantization: Quantization,
}

impl ColorFormat {
    /// 10-bit channels written with truncation, the software target.
    pub const RGB10A2: ColorFormat = ColorFormat {
        bits: [10, 10, 10],
        quantization: Quantization::Truncate,
    };

    /// 8-bit channels with round-to-nearest, the GPU render texture.
    pub const RGBA8: ColorFormat = ColorFormat {
        bits: [8, 8, 8],
        quantization: Quantization::Nearest,
    };

    /// Low bits per channel kept free so a one-step quantization error never reaches the id bits.
    #[inline]
    pub const fn guard_bits(&self) -> u32 {
        match self.quantization {
            Quantization::Nearest => 0,
            Quantization::Truncate => 2,
        }
    }

    #[inline]
    pub fn usable_bits(&self, channel: usize) -> u32 {
        self.bits[channel].saturating_sub(self.guard_bits())
    }

    pub fn total_usable_bits(&self) -> u32 {
        (0..3).map(|c| self.usable_bits(c)).sum()
    }

    #[inline]
    pub fn channel_max(&self, channel: usize) -> u32 {
        (1u32 << self.bits[channel]) - 1
    }

    #[inline]
    pub fn to_unorm(&self, channel: usize, value: u32) -> f32 {
        value as f32 / self.channel_max(channel) as f32
    }

    /// Integer the target stores for `unorm` in `channel`.
    #[inline]
    pub fn quantize(&self, channel: usize, unorm: f32) -> u32 {
        let max = self.channel_max(channel);
        let scaled = unorm.clamp(0.0, 1.0) * max as f32;
        let q = match self.quantization {
            Quantization::Nearest => scaled.round(),
            Quantization::Truncate => scaled.floor(),
        };
        (q as u32).min(max)
    }

    /// Packs integer channels into one word, red in the lowest bits.
    #[inline]
    pub fn pack(&self, channels: [u32; 3]) -> u32 {
        let [r, g, _] = self.bits;
        (channels[0] & self.channel_max(0))
            | ((channels[1] & self.channel_max(1)) << r)
            | ((channels[2] & self.channel_max(2)) << (r + g))
    }

    #[inline]
    pub fn unpack(&self, word: u32) -> [u32; 3] {
        let [r, g, _] = self.bits;
        [
            word & self.channel_max(0),
            (word >> r) & self.channel_max(1),
            (word >> (r + g)) & self.channel_max(2),
        ]
    }

    /// Stores a unorm color the way the target would and returns the packed word.
    pub fn write(&self, rgb: [f32; 3]) -> u32 {
        self.pack([
            self.quantize(0, rgb[0]),
            self.quantize(1, rgb[1]),
            self.quantize(2, rgb[2]),
        ])
    }
}

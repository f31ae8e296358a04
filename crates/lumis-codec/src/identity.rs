use crate::format::ColorFormat;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct ChannelCode {
    /// Number of id bits stored in this channel.
    id_bits: u32,
    /// Position of this channel's chunk inside the id.
    id_offset: u32,
    /// Position of the chunk inside the channel value.
    shift: u32,
    mask: u32,
    /// Half-step pattern filling the bits below the chunk.
    mid: u32,
    correction: i64,
}

/// Bijective mapping between patch indices and identity colors for one scene size.
///
/// Index 0 is the sentinel (background, or geometry outside the current
/// batch). Indices `1..=range()` survive the trip through the destination
/// format: `decode(write(encode_unorm(i))) == i`.
#[derive(Clone, Debug, PartialEq)]
pub struct PatchIdentityCodec {
    format: ColorFormat,
    requested: usize,
    id_bits: u32,
    range: u32,
    channels: [ChannelCode; 3],
}

impl PatchIdentityCodec {
    /// Builds the codec for `patch_count` patches, capping the range if the format is too narrow.
    pub fn new(patch_count: usize, format: ColorFormat) -> Self {
        let needed = (usize::BITS - patch_count.leading_zeros()).max(1);
        let usable = format.total_usable_bits().min(31);
        let id_bits = needed.min(usable);
        if needed > usable {
            log::info!(
                target: "codec",
                "{} patches need {} id bits but the format offers {}; rendering in batches of {}",
                patch_count,
                needed,
                usable,
                (1u64 << usable) - 1
            );
        }

        // Discarded bits spread evenly, leftovers to blue then green.
        let spare = usable - id_bits;
        let mut discard = [spare / 3; 3];
        let mut rem = spare % 3;
        for c in [2usize, 1] {
            if rem > 0 {
                discard[c] += 1;
                rem -= 1;
            }
        }

        let mut channels = [ChannelCode::default(); 3];
        let mut id_offset = 0;
        for c in [2usize, 1, 0] {
            let bits = format.usable_bits(c).saturating_sub(discard[c]);
            let shift = format.bits[c] - bits;
            let mid = if shift > 0 { 1 << (shift - 1) } else { 0 };
            let sampled = format.quantize(c, format.to_unorm(c, mid));
            channels[c] = ChannelCode {
                id_bits: bits,
                id_offset,
                shift,
                mask: if bits == 0 { 0 } else { (1u32 << bits) - 1 },
                mid,
                correction: mid as i64 - sampled as i64,
            };
            id_offset += bits;
        }

        Self {
            format,
            requested: patch_count,
            id_bits,
            range: (1u32 << id_bits) - 1,
            channels,
        }
    }

    #[inline]
    pub fn format(&self) -> ColorFormat {
        self.format
    }

    /// Patch count the codec was built for.
    #[inline]
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Largest index that round-trips.
    #[inline]
    pub fn range(&self) -> u32 {
        self.range
    }

    #[inline]
    pub fn id_bits(&self) -> u32 {
        self.id_bits
    }

    /// True when the scene does not fit one pass and must be rendered in batches.
    #[inline]
    pub fn overflowed(&self) -> bool {
        self.requested > self.range as usize
    }

    /// Integer channel values for `id`, which must be in `0..=range()`.
    pub fn encode(&self, id: u32) -> [u32; 3] {
        debug_assert!(id <= self.range, "id {id} beyond codec range {}", self.range);
        self.channels.map(|ch| {
            let chunk = (id >> ch.id_offset) & ch.mask;
            (chunk << ch.shift) | ch.mid
        })
    }

    /// Float color handed to a rasterizer.
    pub fn encode_unorm(&self, id: u32) -> [f32; 3] {
        let ints = self.encode(id);
        [
            self.format.to_unorm(0, ints[0]),
            self.format.to_unorm(1, ints[1]),
            self.format.to_unorm(2, ints[2]),
        ]
    }

    /// Clear color; decodes to 0.
    #[inline]
    pub fn sentinel(&self) -> [f32; 3] {
        self.encode_unorm(0)
    }

    /// Recovers the id from sampled integer channels.
    pub fn decode(&self, sampled: [u32; 3]) -> u32 {
        let mut id = 0;
        for (ch, value) in self.channels.iter().zip(sampled) {
            let corrected = (value as i64 + ch.correction).max(0) as u64;
            let chunk = (corrected >> ch.shift) as u32 & ch.mask;
            id |= chunk << ch.id_offset;
        }
        id
    }

    /// Decodes a texel packed with [`ColorFormat::pack`].
    #[inline]
    pub fn decode_packed(&self, word: u32) -> u32 {
        self.decode(self.format.unpack(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_budget() {
        assert_eq!(PatchIdentityCodec::new(1, ColorFormat::RGBA8).id_bits(), 1);
        assert_eq!(PatchIdentityCodec::new(3, ColorFormat::RGBA8).id_bits(), 2);
        assert_eq!(PatchIdentityCodec::new(4, ColorFormat::RGBA8).id_bits(), 3);
        assert_eq!(PatchIdentityCodec::new(1000, ColorFormat::RGB10A2).range(), 1023);
        assert_eq!(PatchIdentityCodec::new(0, ColorFormat::RGB10A2).range(), 1);
    }

    #[test]
    fn blue_holds_low_bits_and_red_the_high_bits() {
        let codec = PatchIdentityCodec::new((1 << 24) - 1, ColorFormat::RGBA8);
        assert_eq!(codec.encode(1), [0, 0, 1]);
        assert_eq!(codec.encode(1 << 16), [1, 0, 0]);
        assert_eq!(codec.encode(0xff_ffff), [255, 255, 255]);
    }

    #[test]
    fn sentinel_decodes_to_zero() {
        for format in [ColorFormat::RGBA8, ColorFormat::RGB10A2] {
            let codec = PatchIdentityCodec::new(77, format);
            assert_eq!(codec.decode_packed(format.write(codec.sentinel())), 0);
        }
    }

    #[test]
    fn overflow_caps_range() {
        let codec = PatchIdentityCodec::new(1 << 26, ColorFormat::RGB10A2);
        assert!(codec.overflowed());
        assert_eq!(codec.id_bits(), 24);
        assert_eq!(codec.range(), (1 << 24) - 1);
        let top = codec.range();
        let word = ColorFormat::RGB10A2.write(codec.encode_unorm(top));
        assert_eq!(codec.decode_packed(word), top);
    }
}

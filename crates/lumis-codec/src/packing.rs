//! Raw 10-10-10 words: red in bits 0-9, green 10-19, blue 20-29.

const MASK10: u32 = 0x3ff;

/// Packs unorm floats, truncating like a 10-bit float write.
#[inline]
pub fn pack_rgb10(rgb: [f32; 3]) -> u32 {
    let q = |v: f32| ((v.clamp(0.0, 1.0) * MASK10 as f32) as u32).min(MASK10);
    pack_rgb10_int([q(rgb[0]), q(rgb[1]), q(rgb[2])])
}

#[inline]
pub fn pack_rgb10_int(rgb: [u32; 3]) -> u32 {
    (rgb[0] & MASK10) | ((rgb[1] & MASK10) << 10) | ((rgb[2] & MASK10) << 20)
}

#[inline]
pub fn unpack_rgb10(word: u32) -> [u32; 3] {
    [word & MASK10, (word >> 10) & MASK10, (word >> 20) & MASK10]
}

#[inline]
pub fn unpack_rgb10_unorm(word: u32) -> [f32; 3] {
    unpack_rgb10(word).map(|c| c as f32 / MASK10 as f32)
}

//! Small deterministic helpers shared by the roster builder and the pattern engine.
//!
//! Everything here is a pure function of its arguments so that derived
//! identifiers and sub-seeds can be recomputed from a run seed alone.

/// Odd increment used to spread sequence numbers across the seed space.
pub const SEQUENCE_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finalizer.
///
/// A bijection on `u64`: distinct inputs always give distinct outputs, which
/// is what keeps derived building identifiers unique within a run.
pub fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(SEQUENCE_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Sub-seed for the `index`-th item of a run seeded with `seed`.
pub fn derive_seed(seed: u64, index: u64) -> u64 {
    mix64(seed.wrapping_add(index.wrapping_mul(SEQUENCE_GAMMA)))
}

/// Map 64 random bits onto `[0, 1)`.
pub fn unit_f64(bits: u64) -> f64 {
    (bits >> 11) as f64 / (1u64 << 53) as f64
}

/// FNV-1a over the UTF-8 bytes of `s`. Stable across processes and platforms.
pub fn stable_hash(s: &str) -> u64 {
    s.bytes().fold(0xcbf2_9ce4_8422_2325u64, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

/// Round to a fixed number of decimals.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

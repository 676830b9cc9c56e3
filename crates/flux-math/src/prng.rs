// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

/// Odd constant used both as the SplitMix64 increment and as the fallback
/// for the all-zero state, which `xoroshiro128+` can never leave.
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(GOLDEN_GAMMA);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Seeded `xoroshiro128+` generator for scattering bodies in test scenes and
/// benchmarks.
///
/// The physics step never draws from it: a world tick is a pure function of
/// the bodies passed in. A seed always lays out the same scene on every
/// target.
#[derive(Debug, Clone, Copy)]
pub struct Prng {
    state: [u64; 2],
}

impl Prng {
    /// Generator over the raw 128-bit state `(seed0, seed1)`.
    pub fn from_seed(seed0: u64, seed1: u64) -> Self {
        let state = if seed0 == 0 && seed1 == 0 {
            [GOLDEN_GAMMA, 0]
        } else {
            [seed0, seed1]
        };
        Self { state }
    }

    /// Generator for a scene number; the seed is spread over both state words
    /// with SplitMix64 so nearby seeds give unrelated scenes.
    pub fn from_seed_u64(seed: u64) -> Self {
        let mut mix = seed;
        let s0 = splitmix64(&mut mix);
        let s1 = splitmix64(&mut mix);
        Self::from_seed(s0, s1)
    }

    fn next_u64(&mut self) -> u64 {
        let [s0, s1] = self.state;
        let out = s0.wrapping_add(s1);
        let x = s1 ^ s0;
        self.state = [s0.rotate_left(55) ^ x ^ (x << 14), x.rotate_left(36)];
        out
    }

    /// Uniform `f32` in `[0, 1)` built from the top 23 output bits.
    pub fn next_f32(&mut self) -> f32 {
        let mantissa = (self.next_u64() >> 41) as u32;
        f32::from_bits(0x3f80_0000 | mantissa) - 1.0
    }

    /// Uniform `f32` in `[min, max)`, e.g. a body position along one axis.
    pub fn next_range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }
}

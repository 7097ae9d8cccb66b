// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::entropy::EntropyPool;
use crate::hash::read_u16_le;
use crate::hash::read_u32_le;
use crate::hash::Hash32;
use crate::hash::HashBytes;

/// Number of coefficients in the [`MultiplyShiftVec`] cyclic vector.
pub const LANE_COEFFS: usize = 8;

/// Multiply-shift hashing of 32-bit keys.
///
/// `hash(x)` is the high 32 bits of `a * x + b` computed mod `2^64`; `a` is
/// forced odd when the parameters are set.
///
/// # Examples
///
/// ```rust
/// use sketchmark::hash::Hash32;
/// use sketchmark::hash::MultiplyShift;
///
/// let h = MultiplyShift::new(2, 5); // `a` is stored as 3
/// assert_eq!(h.a(), 3);
/// assert_eq!(h.hash(0), 0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MultiplyShift {
    a: u64,
    b: u64,
}

impl MultiplyShift {
    pub fn new(a: u64, b: u64) -> Self {
        Self { a: a | 1, b }
    }

    /// Draws fresh `(a, b)` from the entropy pool.
    pub fn from_entropy(pool: &EntropyPool) -> Self {
        Self::new(pool.u64(), pool.u64())
    }

    pub fn set_params(&mut self, a: u64, b: u64) {
        self.a = a | 1;
        self.b = b;
    }

    pub fn a(&self) -> u64 {
        self.a
    }

    pub fn b(&self) -> u64 {
        self.b
    }
}

impl Hash32 for MultiplyShift {
    #[inline]
    fn hash(&self, x: u32) -> u32 {
        let y = self.a.wrapping_mul(u64::from(x)).wrapping_add(self.b);
        (y >> 32) as u32
    }
}

/// Multiply-vector-shift hashing of arbitrary-length keys.
///
/// The input splits into 32-bit little-endian lanes; lane `i` is multiplied
/// by coefficient `i mod LANE_COEFFS` and the products accumulate into a
/// 64-bit sum whose high 32 bits are the hash. A 1-3 byte tail is packed
/// into one partial lane (two-byte chunk first, then single byte) and uses
/// the coefficient indexed by the count of full lanes.
#[derive(Debug, Clone, Copy)]
pub struct MultiplyShiftVec {
    coeffs: [u64; LANE_COEFFS],
}

impl MultiplyShiftVec {
    /// Builds the hasher from explicit coefficients, each forced odd when
    /// `force_odd` is set (the default everywhere in the harness).
    pub fn new(mut coeffs: [u64; LANE_COEFFS], force_odd: bool) -> Self {
        if force_odd {
            for c in coeffs.iter_mut() {
                *c |= 1;
            }
        }
        Self { coeffs }
    }

    /// Draws all coefficients from the entropy pool, forced odd.
    pub fn from_entropy(pool: &EntropyPool) -> Self {
        Self::new(draw_coeffs(pool), true)
    }

    pub fn coeffs(&self) -> &[u64; LANE_COEFFS] {
        &self.coeffs
    }
}

/// Draws a coefficient vector for [`MultiplyShiftVec`]; drivers pre-draw
/// these per repetition so worker threads never race the pool.
pub fn draw_coeffs(pool: &EntropyPool) -> [u64; LANE_COEFFS] {
    let mut session = pool.session();
    let mut coeffs = [0u64; LANE_COEFFS];
    for c in coeffs.iter_mut() {
        *c = session.u64();
    }
    coeffs
}

impl HashBytes for MultiplyShiftVec {
    #[inline]
    fn hash_bytes(&self, data: &[u8]) -> u32 {
        let lanes = data.len() / 4;
        let mut h = 0u64;

        let mut chunks = data.chunks_exact(4);
        for (i, chunk) in (&mut chunks).enumerate() {
            let w = u64::from(read_u32_le(chunk));
            h = h.wrapping_add(w.wrapping_mul(self.coeffs[i % LANE_COEFFS]));
        }

        let tail = chunks.remainder();
        if !tail.is_empty() {
            let mut last = 0u64;
            let mut rest = tail;
            if rest.len() >= 2 {
                last = (last << 16) | u64::from(read_u16_le(rest));
                rest = &rest[2..];
            }
            if rest.len() == 1 {
                last = (last << 8) | u64::from(rest[0]);
            }
            h = h.wrapping_add(last.wrapping_mul(self.coeffs[lanes % LANE_COEFFS]));
        }

        (h >> 32) as u32
    }
}

/// Truncated 32-bit affine mixer `a * x + b (mod 2^32)` with odd `a`; the
/// per-row column hasher of the Count-Min drivers.
#[derive(Debug, Clone, Copy)]
pub struct Affine32 {
    a: u32,
    b: u32,
}

impl Affine32 {
    pub fn new(a: u32, b: u32) -> Self {
        Self { a: a | 1, b }
    }

    pub fn from_entropy(pool: &EntropyPool) -> Self {
        Self::new(pool.u64() as u32, pool.u64() as u32)
    }
}

impl Hash32 for Affine32 {
    #[inline]
    fn hash(&self, x: u32) -> u32 {
        self.a.wrapping_mul(x).wrapping_add(self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odd_enforcement() {
        let h = MultiplyShift::new(0x1234_5678_0000_0000, 0);
        assert_eq!(h.a(), 0x1234_5678_0000_0001);
        let mut h = MultiplyShift::new(1, 0);
        h.set_params(8, 9);
        assert_eq!(h.a(), 9);
        assert_eq!(h.b(), 9);
    }

    #[test]
    fn test_known_values() {
        // a=2 is stored as 3; (3*0 + 5) >> 32 == 0.
        assert_eq!(MultiplyShift::new(2, 5).hash(0), 0);
        // (3*1) >> 32 == 0.
        assert_eq!(MultiplyShift::new(3, 0).hash(1), 0);
        // Full-width wrap: (0xFFFFFFFF * 0xFFFFFFFFFFFFFFFF) mod 2^64 >> 32.
        let expected =
            ((0xFFFF_FFFF_FFFF_FFFFu64.wrapping_mul(0xFFFF_FFFF)) >> 32) as u32;
        assert_eq!(
            MultiplyShift::new(u64::MAX, 0).hash(0xFFFF_FFFF),
            expected
        );
    }

    #[test]
    fn test_vec_single_lane() {
        // One full lane: h = w * c0, hash = high 32 bits.
        let mut coeffs = [1u64; LANE_COEFFS];
        coeffs[0] = (5 << 32) | 1;
        let h = MultiplyShiftVec::new(coeffs, false);
        assert_eq!(h.hash_bytes(&[1, 0, 0, 0]), 5);
    }

    #[test]
    fn test_vec_tail_packing() {
        let mut coeffs = [1u64; LANE_COEFFS];
        coeffs[0] = 1 << 32;
        let h = MultiplyShiftVec::new(coeffs, false);
        // Two tail bytes load as one little-endian 16-bit chunk.
        assert_eq!(h.hash_bytes(&[0x34, 0x12]), 0x1234);
        // Three tail bytes: 16-bit chunk shifted up, low byte appended.
        assert_eq!(h.hash_bytes(&[0x34, 0x12, 0xAB]), 0x12_34AB);
        // One tail byte.
        assert_eq!(h.hash_bytes(&[0x7F]), 0x7F);
    }

    #[test]
    fn test_vec_tail_uses_lane_count_coefficient() {
        let mut coeffs = [0u64; LANE_COEFFS];
        coeffs[0] = 0; // full lane contributes nothing
        coeffs[1] = 1 << 32; // tail (one full lane seen) lands on index 1
        let h = MultiplyShiftVec::new(coeffs, false);
        assert_eq!(h.hash_bytes(&[0xFF, 0xFF, 0xFF, 0xFF, 0x02]), 0x02);
    }

    #[test]
    fn test_affine_wraps_mod_2_32() {
        let h = Affine32::new(0xFFFF_FFFF, 2);
        // 0xFFFFFFFF * 3 + 2 mod 2^32 == 0xFFFFFFFF.
        assert_eq!(h.hash(3), 0xFFFF_FFFF);
    }
}

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
use crate::hash::poly::PolyMersenne;
use crate::hash::Hash32;
use crate::hash::HashBytes;
use crate::hash::MultiplyShiftVec;
use crate::hash::DEFAULT_POLY_DEGREE;
use crate::hash::LANE_COEFFS;

/// Four-way simple tabulation on a 32-bit key.
///
/// The table holds 4 columns of 256 random 32-bit words; the hash XORs the
/// word selected by each input byte. Tables are populated from a
/// [`PolyMersenne`] stream whose coefficients come from the entropy pool, so
/// construction is "seedless" at the call site.
///
/// # Examples
///
/// ```rust
/// use sketchmark::entropy::EntropyPool;
/// use sketchmark::hash::Hash32;
/// use sketchmark::hash::SimpleTab32;
///
/// let pool = EntropyPool::from_bytes((0u32..4096).map(|i| i as u8).collect()).unwrap();
/// let tab = SimpleTab32::from_entropy(&pool);
/// assert_eq!(tab.hash(42), tab.hash(42));
/// ```
#[derive(Clone)]
pub struct SimpleTab32 {
    // table[column][byte]
    table: Box<[[u32; 256]; 4]>,
}

impl SimpleTab32 {
    /// Populates the table under the entropy pool lock so the draws of one
    /// instance stay contiguous.
    pub fn from_entropy(pool: &EntropyPool) -> Self {
        let mut session = pool.session();
        let mut poly = PolyMersenne::from_entropy(&mut session, DEFAULT_POLY_DEGREE);
        Self::from_poly(&mut poly)
    }

    /// Populates the table from an existing word stream, column-major.
    pub fn from_poly(poly: &mut PolyMersenne) -> Self {
        let mut table = Box::new([[0u32; 256]; 4]);
        for column in table.iter_mut() {
            for word in column.iter_mut() {
                *word = poly.next32();
            }
        }
        Self { table }
    }
}

impl Hash32 for SimpleTab32 {
    #[inline]
    fn hash(&self, x: u32) -> u32 {
        let mut h = 0u32;
        let mut x = x;
        for column in self.table.iter() {
            h ^= column[(x & 0xFF) as usize];
            x >>= 8;
        }
        h
    }
}

/// Simple tabulation over variable-length keys: a [`MultiplyShiftVec`]
/// prehash collapses the bytes to 32 bits, then [`SimpleTab32`] scrambles
/// the result.
pub struct TabOnVec {
    prehash: MultiplyShiftVec,
    tab: SimpleTab32,
}

impl TabOnVec {
    /// Shares the coefficient vector with the other prehash-composed
    /// families of a repetition; the table draws from the entropy pool.
    pub fn new(coeffs: [u64; LANE_COEFFS], pool: &EntropyPool) -> Self {
        Self {
            prehash: MultiplyShiftVec::new(coeffs, true),
            tab: SimpleTab32::from_entropy(pool),
        }
    }
}

impl HashBytes for TabOnVec {
    #[inline]
    fn hash_bytes(&self, data: &[u8]) -> u32 {
        self.tab.hash(self.prehash.hash_bytes(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_poly() -> PolyMersenne {
        PolyMersenne::from_coefficients(vec![0x1234_5678, 0xDEAD_BEEF, 17])
    }

    #[test]
    fn test_hash_is_xor_of_lookups() {
        let mut poly = test_poly();
        let tab = SimpleTab32::from_poly(&mut poly);
        let x: u32 = 0xA1B2_C3D4;
        let expected = tab.table[0][0xD4] ^ tab.table[1][0xC3] ^ tab.table[2][0xB2]
            ^ tab.table[3][0xA1];
        assert_eq!(tab.hash(x), expected);
    }

    #[test]
    fn test_population_order_is_column_major() {
        let mut poly = test_poly();
        let tab = SimpleTab32::from_poly(&mut poly);
        let mut replay = test_poly();
        assert_eq!(tab.table[0][0], replay.next32());
        assert_eq!(tab.table[0][1], replay.next32());
    }

    #[test]
    fn test_zero_key_hits_row_zero() {
        let mut poly = test_poly();
        let tab = SimpleTab32::from_poly(&mut poly);
        let expected =
            tab.table[0][0] ^ tab.table[1][0] ^ tab.table[2][0] ^ tab.table[3][0];
        assert_eq!(tab.hash(0), expected);
    }
}

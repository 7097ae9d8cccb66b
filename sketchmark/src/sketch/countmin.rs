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

//! Count-Min frequency sketch over 32-bit keys.
//!
//! A `depth x width` table of saturating 32-bit counters. Each row owns its
//! hash function; a key's column in row `d` is the Lemire reduction of that
//! row's hash value. The point estimate is the minimum counter across rows,
//! which never undershoots the true count.
//!
//! The sketch is generic over the row-hasher type so the per-key inner loop
//! monomorphises and inlines the hash call.
//!
//! # Usage
//!
//! ```rust
//! use sketchmark::hash::Affine32;
//! use sketchmark::sketch::CountMin;
//!
//! let mut cms = CountMin::new(32_768, 3);
//! for d in 0..3 {
//!     cms.set_row(d, Affine32::new(2 * d as u32 + 1, 17));
//! }
//! cms.add(123, 1);
//! cms.add(123, 1);
//! assert!(cms.estimate(123) >= 2);
//! ```

use crate::hash::Hash32;
use crate::sketch::fast_range32;

/// Count-Min sketch with per-row hashers of type `H`.
pub struct CountMin<H: Hash32> {
    width: usize,
    depth: usize,
    rows: Vec<Option<H>>,
    table: Vec<u32>,
}

impl<H: Hash32> CountMin<H> {
    /// # Panics
    ///
    /// Panics if `width` or `depth` is zero.
    pub fn new(width: usize, depth: usize) -> Self {
        assert!(width > 0 && depth > 0, "width and depth must be > 0");
        let mut rows = Vec::with_capacity(depth);
        rows.resize_with(depth, || None);
        Self {
            width,
            depth,
            rows,
            table: vec![0; width * depth],
        }
    }

    /// Installs the hash function of row `d`. Rows left unset fall back to
    /// the identity function.
    ///
    /// # Panics
    ///
    /// Panics if `d` is not a valid row index.
    pub fn set_row(&mut self, d: usize, hasher: H) {
        assert!(d < self.depth, "row index out of range");
        self.rows[d] = Some(hasher);
    }

    /// Adds `count` to the key's counter in every row, saturating at
    /// `u32::MAX`. Saturation is silent; all saturated cells clamp at the
    /// same ceiling, so the estimate stays one-sided.
    #[inline]
    pub fn add(&mut self, key: u32, count: u32) {
        let width = self.width as u32;
        for (d, row) in self.rows.iter().enumerate() {
            let hv = match row {
                Some(h) => h.hash(key),
                None => key,
            };
            let col = fast_range32(hv, width) as usize;
            let cell = &mut self.table[d * self.width + col];
            *cell = cell.saturating_add(count);
        }
    }

    /// Point estimate: the minimum counter of the key across all rows.
    #[inline]
    pub fn estimate(&self, key: u32) -> u32 {
        let width = self.width as u32;
        let mut ans = u32::MAX;
        for (d, row) in self.rows.iter().enumerate() {
            let hv = match row {
                Some(h) => h.hash(key),
                None => key,
            };
            let col = fast_range32(hv, width) as usize;
            ans = ans.min(self.table[d * self.width + col]);
        }
        ans
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Zeroes every counter, keeping the row hashers.
    pub fn clear(&mut self) {
        self.table.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Identity32;

    enum Row {
        Identity,
        Complement,
    }

    impl Hash32 for Row {
        fn hash(&self, x: u32) -> u32 {
            match self {
                Row::Identity => x,
                Row::Complement => x ^ 0xFFFF_FFFF,
            }
        }
    }

    #[test]
    fn test_exact_on_collision_free_input() {
        // High-bit-spread keys land in distinct columns under the Lemire
        // reduction, in both the identity and the complement row.
        let mut cms = CountMin::new(16, 2);
        cms.set_row(0, Row::Identity);
        cms.set_row(1, Row::Complement);

        let a = 0x1000_0000u32;
        let b = 0x7000_0000u32;
        cms.add(a, 1);
        cms.add(a, 1);
        cms.add(b, 1);

        assert_eq!(cms.estimate(a), 2);
        assert_eq!(cms.estimate(b), 1);
        assert_eq!(cms.estimate(0x3000_0000), 0);
    }

    #[test]
    fn test_one_sidedness() {
        let mut cms = CountMin::new(8, 2);
        cms.set_row(0, Identity32);
        cms.set_row(1, Identity32);
        let keys = [1u32, 2, 3, 0x8000_0001, 0x8000_0002, 1, 1];
        let mut truth = std::collections::HashMap::new();
        for &k in &keys {
            cms.add(k, 1);
            *truth.entry(k).or_insert(0u32) += 1;
        }
        for (&k, &t) in &truth {
            assert!(cms.estimate(k) >= t, "estimate undershoots for key {k}");
        }
    }

    #[test]
    fn test_saturation_clamps() {
        let mut cms = CountMin::new(4, 1);
        cms.set_row(0, Identity32);
        cms.add(0, u32::MAX);
        cms.add(0, 5);
        assert_eq!(cms.estimate(0), u32::MAX);
    }

    #[test]
    fn test_unset_row_is_identity() {
        let cms_key = 0x4000_0000u32;
        let mut cms = CountMin::<Identity32>::new(16, 1);
        cms.add(cms_key, 3);
        // Column 4 of 16 for the high-bit pattern; same key queries back.
        assert_eq!(cms.estimate(cms_key), 3);
    }

    #[test]
    #[should_panic(expected = "width and depth must be > 0")]
    fn test_zero_geometry_panics() {
        CountMin::<Identity32>::new(0, 3);
    }

    #[test]
    fn test_clear_keeps_rows() {
        let mut cms = CountMin::new(16, 1);
        cms.set_row(0, Identity32);
        cms.add(0x1000_0000, 7);
        cms.clear();
        assert_eq!(cms.estimate(0x1000_0000), 0);
    }
}

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

//! Deterministic dataset partitions for the Jaccard studies.

use crate::data::FixedRecords;
use crate::data::VarRecords;

/// The canonical stateless 64-bit mixer: golden-ratio increment, two
/// xor-shift-multiply rounds, final xor-shift.
#[inline]
pub fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Splits fixed-width records into two groups: item `i` goes to group
/// `splitmix64(seed + i) & 1`. Stateless in `(seed, i)`, so the same seed
/// reproduces the same partition, and the two groups together preserve
/// every occurrence of the base stream.
pub fn split_fixed(records: &FixedRecords, seed: u64) -> (FixedRecords, FixedRecords) {
    let n = records.len();
    let mut group_a = FixedRecords::with_capacity(records.width(), n / 2 + 1);
    let mut group_b = FixedRecords::with_capacity(records.width(), n / 2 + 1);
    for i in 0..n {
        let g = splitmix64(seed.wrapping_add(i as u64)) & 1;
        if g == 0 {
            group_a.push(records.get(i));
        } else {
            group_b.push(records.get(i));
        }
    }
    (group_a, group_b)
}

/// Splits variable-length records into their first and second halves by
/// position (the token datasets compare document halves, not random
/// subsets).
pub fn split_halves(records: &VarRecords) -> (VarRecords, VarRecords) {
    let mid = records.len() / 2;
    let mut first = VarRecords::new();
    let mut second = VarRecords::new();
    for i in 0..records.len() {
        if i < mid {
            first.push(records.get(i));
        } else {
            second.push(records.get(i));
        }
    }
    (first, second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::paired_skew;

    #[test]
    fn test_splitmix64_reference_vector() {
        // First output of the reference sequence seeded with 0.
        assert_eq!(splitmix64(0), 0xE220_A839_7B1D_CDAF);
    }

    #[test]
    fn test_split_preserves_occurrences() {
        let base = paired_skew(100);
        let (a, b) = split_fixed(&base, 123_456_789);
        assert_eq!(a.len() + b.len(), base.len());

        let mut merged: Vec<u32> = a.to_u32_keys();
        merged.extend(b.to_u32_keys());
        merged.sort_unstable();
        let mut expected = base.to_u32_keys();
        expected.sort_unstable();
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_split_is_reproducible() {
        let base = paired_skew(256);
        let (a1, b1) = split_fixed(&base, 42);
        let (a2, b2) = split_fixed(&base, 42);
        assert!(a1 == a2);
        assert!(b1 == b2);
        // A different seed gives a different partition of this many items.
        let (a3, _) = split_fixed(&base, 43);
        assert!(a1 != a3);
    }

    #[test]
    fn test_halves_split() {
        let mut rec = VarRecords::new();
        for word in ["a", "bb", "ccc", "dd", "e"] {
            rec.push(word.as_bytes());
        }
        let (first, second) = split_halves(&rec);
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 3);
        assert_eq!(second.get(0), b"ccc");
    }
}

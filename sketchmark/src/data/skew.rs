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

//! Generated integer streams with a mild frequency skew.
//!
//! Keys are 1-based 32-bit integers materialised as 4-byte little-endian
//! records. The skew rule repeats key `i` exactly `ceil(i / 100)` times
//! before advancing, so the first hundred keys are unique and later keys
//! grow steadily heavier.

use crate::data::FixedRecords;

/// How many times the skew rule emits `key` before advancing.
#[inline]
pub fn skew_repeats(key: u32) -> u32 {
    (key + 99) / 100
}

/// Walks the skew sequence starting at key 1.
struct SkewWalker {
    key: u32,
    rep: u32,
}

impl SkewWalker {
    fn new() -> Self {
        Self { key: 1, rep: 0 }
    }

    #[inline]
    fn next_key(&mut self) -> u32 {
        let key = self.key;
        self.rep += 1;
        if self.rep >= skew_repeats(self.key) {
            self.rep = 0;
            self.key += 1;
        }
        key
    }
}

/// Emits exactly `n` items of the skew rule starting at key 1.
///
/// # Examples
///
/// ```rust
/// use sketchmark::data::skewed;
///
/// // Keys 1..=100 each repeat once, so the first 100 items are unique.
/// let rec = skewed(100);
/// assert_eq!(rec.len(), 100);
/// assert_eq!(rec.get(0), &1u32.to_le_bytes());
/// assert_eq!(rec.get(99), &100u32.to_le_bytes());
/// ```
pub fn skewed(n: usize) -> FixedRecords {
    let mut records = FixedRecords::with_capacity(4, n);
    let mut walker = SkewWalker::new();
    for _ in 0..n {
        records.push(&walker.next_key().to_le_bytes());
    }
    records
}

/// Emits `n` items: the first `n / 2` are the unique keys `1..=n/2`, the
/// rest follow the skew rule restarted at key 1.
pub fn mixed_skew(n: usize) -> FixedRecords {
    let half = n / 2;
    let mut records = FixedRecords::with_capacity(4, n);
    for i in 0..half {
        records.push(&((i + 1) as u32).to_le_bytes());
    }
    let mut walker = SkewWalker::new();
    for _ in half..n {
        records.push(&walker.next_key().to_le_bytes());
    }
    records
}

/// Emits `n` items: the first half is the pair sequence
/// `(1, 1), (2, 2), ...` — two copies per key — and the second half follows
/// the skew rule restarted at key 1. The base stream of the Jaccard study:
/// splitting it 50/50 leaves substantial key overlap between the groups.
pub fn paired_skew(n: usize) -> FixedRecords {
    let half = n / 2;
    let mut records = FixedRecords::with_capacity(4, n);
    for i in 0..half {
        let key = (i / 2 + 1) as u32;
        records.push(&key.to_le_bytes());
    }
    let mut walker = SkewWalker::new();
    for _ in half..n {
        records.push(&walker.next_key().to_le_bytes());
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skew_repeats_rule() {
        assert_eq!(skew_repeats(1), 1);
        assert_eq!(skew_repeats(100), 1);
        assert_eq!(skew_repeats(101), 2);
        assert_eq!(skew_repeats(200), 2);
        assert_eq!(skew_repeats(201), 3);
    }

    #[test]
    fn test_skew_onset_above_one_hundred() {
        // 250 items: keys 1..=100 once each, then keys 101.. twice each.
        let rec = skewed(250);
        let keys = rec.to_u32_keys();
        assert_eq!(keys[99], 100);
        assert_eq!(keys[100], 101);
        assert_eq!(keys[101], 101);
        assert_eq!(keys[102], 102);
        // 150 doubled items cover keys 101..=175.
        assert_eq!(keys[249], 175);
    }

    #[test]
    fn test_mixed_halves() {
        let rec = mixed_skew(10);
        let keys = rec.to_u32_keys();
        assert_eq!(&keys[..5], &[1, 2, 3, 4, 5]);
        assert_eq!(&keys[5..], &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_paired_first_half() {
        let rec = paired_skew(12);
        let keys = rec.to_u32_keys();
        assert_eq!(&keys[..6], &[1, 1, 2, 2, 3, 3]);
        assert_eq!(&keys[6..], &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_determinism() {
        assert!(skewed(1000) == skewed(1000));
        assert!(paired_skew(999) == paired_skew(999));
    }
}

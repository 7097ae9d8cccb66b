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

//! Bottom-k distinct counting over 32-bit hash values.
//!
//! The sketch keeps the k smallest hashes in a max-heap; the heap top is the
//! k-th order statistic `t` of everything pushed, and the cardinality
//! estimate is `(k - 1) / (t / 2^32)`.
//!
//! Two variants are exposed and must not be substituted for one another:
//! [`BottomK`] de-duplicates hash values through a side set (the estimator
//! assumes distinct order statistics), while [`MultiBottomK`] admits
//! duplicate values and therefore reacts to heavy repeats in the stream.

use std::collections::BinaryHeap;
use std::collections::HashSet;

const TWO32: f64 = 4_294_967_296.0;

/// Bottom-k sketch that de-duplicates hash values.
///
/// # Examples
///
/// ```rust
/// use sketchmark::sketch::BottomK;
///
/// let mut bk = BottomK::new(16);
/// for h in [7u32, 3, 7, 11] {
///     bk.push(h);
/// }
/// // Fewer than k distinct hashes seen: the estimate is exact.
/// assert_eq!(bk.estimate(), 3.0);
/// ```
pub struct BottomK {
    k: usize,
    heap: BinaryHeap<u32>,
    in_heap: HashSet<u32>,
}

impl BottomK {
    /// # Panics
    ///
    /// Panics if `k` is zero.
    pub fn new(k: usize) -> Self {
        assert!(k > 0, "k must be at least 1");
        Self {
            k,
            heap: BinaryHeap::with_capacity(k + 1),
            in_heap: HashSet::with_capacity(k),
        }
    }

    /// Feeds one hash value, keeping the k smallest distinct values.
    #[inline]
    pub fn push(&mut self, h: u32) {
        if self.heap.len() < self.k {
            if self.in_heap.insert(h) {
                self.heap.push(h);
            }
            return;
        }
        let top = *self.heap.peek().expect("heap holds k values");
        if h < top && self.in_heap.insert(h) {
            self.heap.pop();
            self.in_heap.remove(&top);
            self.heap.push(h);
        }
    }

    /// Number of hashes currently retained (at most k).
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The largest retained hash: the k-th order statistic once the sketch
    /// holds k values, `u32::MAX` before any push.
    pub fn kth_hash(&self) -> u32 {
        self.heap.peek().copied().unwrap_or(u32::MAX)
    }

    /// Distinct-count estimate.
    ///
    /// Fewer than k retained hashes means the count is exact. Otherwise the
    /// k-th order statistic normalised into (0, 1) drives `(k - 1) / t`; a
    /// zero k-th hash degenerates to infinity and is surfaced as such.
    pub fn estimate(&self) -> f64 {
        if self.heap.len() < self.k {
            return self.heap.len() as f64;
        }
        let kth = *self.heap.peek().expect("heap holds k values");
        if kth == 0 {
            return f64::INFINITY;
        }
        let t = f64::from(kth) / TWO32;
        (self.k - 1) as f64 / t
    }

    /// Forgets everything pushed so far.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.in_heap.clear();
    }
}

/// Bottom-k sketch that admits duplicate hash values.
pub struct MultiBottomK {
    k: usize,
    heap: BinaryHeap<u32>,
}

impl MultiBottomK {
    /// # Panics
    ///
    /// Panics if `k` is zero.
    pub fn new(k: usize) -> Self {
        assert!(k > 0, "k must be at least 1");
        Self {
            k,
            heap: BinaryHeap::with_capacity(k + 1),
        }
    }

    #[inline]
    pub fn push(&mut self, h: u32) {
        if self.heap.len() < self.k {
            self.heap.push(h);
            return;
        }
        if h < *self.heap.peek().expect("heap holds k values") {
            self.heap.pop();
            self.heap.push(h);
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn kth_hash(&self) -> u32 {
        self.heap.peek().copied().unwrap_or(u32::MAX)
    }

    /// Same estimator as [`BottomK::estimate`], but over possibly repeated
    /// order statistics.
    pub fn estimate(&self) -> f64 {
        if self.heap.len() < self.k {
            return self.heap.len() as f64;
        }
        let kth = *self.heap.peek().expect("heap holds k values");
        if kth == 0 {
            return f64::INFINITY;
        }
        (self.k - 1) as f64 / (f64::from(kth) / TWO32)
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_k_smallest() {
        let mut bk = BottomK::new(4);
        for h in [7u32, 3, 11, 5, 2, 9] {
            bk.push(h);
        }
        assert_eq!(bk.len(), 4);
        assert_eq!(bk.kth_hash(), 7);
        let mut kept: Vec<u32> = bk.heap.iter().copied().collect();
        kept.sort_unstable();
        assert_eq!(kept, vec![2, 3, 5, 7]);
    }

    #[test]
    fn test_estimate_from_kth_order_statistic() {
        let mut bk = BottomK::new(4);
        for h in [7u32, 3, 11, 5, 2, 9] {
            bk.push(h);
        }
        let expected = 3.0 / (7.0 / 4_294_967_296.0);
        assert!((bk.estimate() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_dedup_ignores_repeats() {
        let mut bk = BottomK::new(4);
        for _ in 0..100 {
            bk.push(42);
        }
        assert_eq!(bk.len(), 1);
        assert_eq!(bk.estimate(), 1.0);
    }

    #[test]
    fn test_multi_admits_repeats() {
        let mut bk = MultiBottomK::new(4);
        for _ in 0..100 {
            bk.push(42);
        }
        assert_eq!(bk.len(), 4);
        assert_eq!(bk.kth_hash(), 42);
    }

    #[test]
    fn test_degenerate_zero_hash() {
        let mut bk = BottomK::new(1);
        bk.push(0);
        assert_eq!(bk.estimate(), f64::INFINITY);
    }

    #[test]
    #[should_panic(expected = "k must be at least 1")]
    fn test_zero_k_panics() {
        BottomK::new(0);
    }

    #[test]
    fn test_clear() {
        let mut bk = BottomK::new(3);
        bk.push(1);
        bk.push(2);
        bk.clear();
        assert!(bk.is_empty());
        assert_eq!(bk.kth_hash(), u32::MAX);
        bk.push(9);
        assert_eq!(bk.estimate(), 1.0);
    }
}

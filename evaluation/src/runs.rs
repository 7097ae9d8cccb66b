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

//! One-repetition measurement bodies shared by the accuracy drivers.
//!
//! All helpers are generic over the hash-family type so the per-key loops
//! monomorphise and the hash call inlines into the sketch update.

use std::collections::HashMap;

use sketchmark::hash::Affine32;
use sketchmark::hash::Hash32;
use sketchmark::hash::HashBytes;
use sketchmark::sketch::jaccard;
use sketchmark::sketch::BottomK;
use sketchmark::sketch::CountMin;
use sketchmark::sketch::Oph;

/// Bottom-k relative error on a 32-bit key stream.
pub fn bottomk_relerr_u32<H: Hash32>(h: &H, keys: &[u32], k: usize, d_true: f64) -> f64 {
    let mut bk = BottomK::new(k);
    for &x in keys {
        bk.push(h.hash(x));
    }
    (bk.estimate() - d_true) / d_true
}

/// Bottom-k relative error on a byte-record stream.
pub fn bottomk_relerr_bytes<H: HashBytes>(
    h: &H,
    items: &[&[u8]],
    k: usize,
    d_true: f64,
) -> f64 {
    let mut bk = BottomK::new(k);
    for item in items {
        bk.push(h.hash_bytes(item));
    }
    (bk.estimate() - d_true) / d_true
}

/// Count-Min mean relative error over the distinct keys of a 32-bit stream.
///
/// The family hash collapses each item to the 32-bit value fed to the
/// sketch; the same collapse is applied at query time.
pub fn countmin_mean_relerr_u32<H: Hash32>(
    family: &H,
    rows: &[Affine32],
    width: usize,
    keys: &[u32],
    truth: &HashMap<u32, u32>,
) -> f64 {
    let mut cms = CountMin::new(width, rows.len());
    for (d, row) in rows.iter().enumerate() {
        cms.set_row(d, *row);
    }
    for &x in keys {
        cms.add(family.hash(x), 1);
    }

    let mut sum = 0.0f64;
    for (&key, &true_count) in truth {
        let est = cms.estimate(family.hash(key));
        sum += (f64::from(est) - f64::from(true_count)) / f64::from(true_count);
    }
    if truth.is_empty() {
        0.0
    } else {
        sum / truth.len() as f64
    }
}

/// Count-Min mean relative error over the distinct records of a byte
/// stream.
pub fn countmin_mean_relerr_bytes<H: HashBytes>(
    family: &H,
    rows: &[Affine32],
    width: usize,
    items: &[&[u8]],
    truth: &HashMap<&[u8], u32>,
) -> f64 {
    let mut cms = CountMin::new(width, rows.len());
    for (d, row) in rows.iter().enumerate() {
        cms.set_row(d, *row);
    }
    for item in items {
        cms.add(family.hash_bytes(item), 1);
    }

    let mut sum = 0.0f64;
    for (&key, &true_count) in truth {
        let est = cms.estimate(family.hash_bytes(key));
        sum += (f64::from(est) - f64::from(true_count)) / f64::from(true_count);
    }
    if truth.is_empty() {
        0.0
    } else {
        sum / truth.len() as f64
    }
}

/// OPH Jaccard estimate between two 32-bit key groups hashed by the same
/// family instance.
pub fn oph_jaccard_u32<H: Hash32>(h: &H, a_keys: &[u32], b_keys: &[u32], m: u32) -> f64 {
    let mut a = Oph::new(m);
    let mut b = Oph::new(m);
    for &x in a_keys {
        a.push(h.hash(x));
    }
    for &x in b_keys {
        b.push(h.hash(x));
    }
    jaccard(&a, &b)
}

/// OPH Jaccard estimate between two byte-record groups.
pub fn oph_jaccard_bytes<H: HashBytes>(h: &H, a_items: &[&[u8]], b_items: &[&[u8]], m: u32) -> f64 {
    let mut a = Oph::new(m);
    let mut b = Oph::new(m);
    for item in a_items {
        a.push(h.hash_bytes(item));
    }
    for item in b_items {
        b.push(h.hash_bytes(item));
    }
    jaccard(&a, &b)
}

/// OPH relative error; a zero true Jaccard clamps the denominator to 1 so
/// the row degrades to the absolute error.
pub fn oph_relerr(j_est: f64, j_true: f64) -> f64 {
    let denom = if j_true > 0.0 { j_true } else { 1.0 };
    (j_est - j_true) / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchmark::hash::Identity32;

    #[test]
    fn test_bottomk_exact_below_k() {
        let keys = [10u32, 20, 30, 20];
        // 3 distinct keys, k far larger: estimator is exact, relerr 0.
        let relerr = bottomk_relerr_u32(&Identity32, &keys, 100, 3.0);
        assert_eq!(relerr, 0.0);
    }

    #[test]
    fn test_oph_relerr_clamps_zero_truth() {
        assert_eq!(oph_relerr(0.25, 0.0), 0.25);
        assert!((oph_relerr(0.25, 0.5) - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_countmin_zero_overestimate_without_collisions() {
        let keys = [0x1000_0000u32, 0x1000_0000, 0x9000_0000];
        let truth = crate::truth::frequencies_u32(&keys);
        let rows = [Affine32::new(1, 0), Affine32::new(3, 0)];
        let relerr = countmin_mean_relerr_u32(&Identity32, &rows, 1 << 16, &keys, &truth);
        assert_eq!(relerr, 0.0);
    }
}

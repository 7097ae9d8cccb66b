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

mod common;

use std::collections::HashMap;
use std::collections::HashSet;

use common::fixture_pool;
use sketchmark::data::paired_skew;
use sketchmark::data::skewed;
use sketchmark::data::split_fixed;
use sketchmark::hash::Affine32;
use sketchmark::hash::Hash32;
use sketchmark::hash::MultiplyShift;
use sketchmark::sketch::jaccard;
use sketchmark::sketch::BottomK;
use sketchmark::sketch::CountMin;
use sketchmark::sketch::MultiBottomK;
use sketchmark::sketch::Oph;

#[test]
fn test_bottomk_boundedness() {
    let pool = fixture_pool();
    let h = MultiplyShift::from_entropy(&pool);
    let mut bk = BottomK::new(128);
    for (n, key) in skewed(10_000).to_u32_keys().into_iter().enumerate() {
        bk.push(h.hash(key));
        assert!(bk.len() <= 128);
        if n + 1 < 128 {
            assert!(bk.estimate() <= (n + 1) as f64);
        }
    }
}

#[test]
fn test_bottomk_estimate_tracks_true_cardinality() {
    let pool = fixture_pool();
    let h = MultiplyShift::from_entropy(&pool);

    let keys = skewed(50_000).to_u32_keys();
    let truth = keys.iter().collect::<HashSet<_>>().len() as f64;

    let mut bk = BottomK::new(1_024);
    for &key in &keys {
        bk.push(h.hash(key));
    }
    let est = bk.estimate();
    let relerr = (est - truth) / truth;
    // k = 1024 gives roughly 1/sqrt(k) ~ 3% standard error; 25% is far out
    // in the tail and only catches implementation mistakes.
    assert!(
        relerr.abs() < 0.25,
        "relative error {relerr} too large (est {est}, true {truth})"
    );
}

#[test]
fn test_multi_bottomk_overestimates_on_duplicates() {
    // Feeding duplicated hashes: the multiset sketch lets repeats push the
    // k-th order statistic down, inflating the estimate; the dedup sketch
    // is unaffected.
    let mut dedup = BottomK::new(64);
    let mut multi = MultiBottomK::new(64);
    for i in 0..500u32 {
        let h = i.wrapping_mul(0x0808_0808);
        for _ in 0..4 {
            dedup.push(h);
            multi.push(h);
        }
    }
    assert!(multi.kth_hash() <= dedup.kth_hash());
    assert!(multi.estimate() >= dedup.estimate());
}

#[test]
fn test_countmin_one_sidedness_on_skewed_stream() {
    let pool = fixture_pool();
    let keys = skewed(20_000).to_u32_keys();
    let mut truth: HashMap<u32, u32> = HashMap::new();
    for &k in &keys {
        *truth.entry(k).or_insert(0) += 1;
    }

    let mut cms = CountMin::new(1 << 12, 3);
    for d in 0..3 {
        cms.set_row(d, Affine32::from_entropy(&pool));
    }
    for &k in &keys {
        cms.add(k, 1);
    }
    for (&k, &t) in &truth {
        assert!(cms.estimate(k) >= t, "undershoot at key {k}");
    }
}

#[test]
fn test_countmin_estimate_close_on_wide_table() {
    let pool = fixture_pool();
    let keys = skewed(5_000).to_u32_keys();
    let mut truth: HashMap<u32, u32> = HashMap::new();
    for &k in &keys {
        *truth.entry(k).or_insert(0) += 1;
    }

    // Width far beyond the distinct count: collisions are rare, the mean
    // overestimate stays tiny.
    let mut cms = CountMin::new(1 << 16, 3);
    for d in 0..3 {
        cms.set_row(d, Affine32::from_entropy(&pool));
    }
    for &k in &keys {
        cms.add(k, 1);
    }

    let mut total_over = 0.0f64;
    for (&k, &t) in &truth {
        total_over += f64::from(cms.estimate(k) - t) / f64::from(t);
    }
    let mean_over = total_over / truth.len() as f64;
    assert!(mean_over >= 0.0);
    assert!(mean_over < 0.05, "mean overestimate {mean_over} too large");
}

#[test]
fn test_oph_identical_multisets_match_exactly() {
    let pool = fixture_pool();
    let h = MultiplyShift::from_entropy(&pool);
    let keys = skewed(2_000).to_u32_keys();

    let mut a = Oph::new(64);
    let mut b = Oph::new(64);
    for &k in &keys {
        a.push(h.hash(k));
        b.push(h.hash(k));
    }
    assert_eq!(jaccard(&a, &b), 1.0);
}

#[test]
fn test_oph_estimate_tracks_true_jaccard() {
    let pool = fixture_pool();
    let h = MultiplyShift::from_entropy(&pool);

    let base = paired_skew(100_000);
    let (left, right) = split_fixed(&base, 0xC0FFEE);
    let left_keys = left.to_u32_keys();
    let right_keys = right.to_u32_keys();

    let left_set: HashSet<u32> = left_keys.iter().copied().collect();
    let right_set: HashSet<u32> = right_keys.iter().copied().collect();
    let inter = left_set.intersection(&right_set).count();
    let union = left_set.len() + right_set.len() - inter;
    let truth = inter as f64 / union as f64;

    let mut a = Oph::new(512);
    let mut b = Oph::new(512);
    for &k in &left_keys {
        a.push(h.hash(k));
    }
    for &k in &right_keys {
        b.push(h.hash(k));
    }
    let est = jaccard(&a, &b);
    assert!(
        (est - truth).abs() < 0.15,
        "estimate {est} far from true Jaccard {truth}"
    );
}

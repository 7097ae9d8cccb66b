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

use common::test_data;
use sketchmark::data::mixed_skew;
use sketchmark::data::paired_skew;
use sketchmark::data::sample_binary;
use sketchmark::data::sample_sha1;
use sketchmark::data::skew_repeats;
use sketchmark::data::skewed;
use sketchmark::data::split_fixed;
use sketchmark::data::split_halves;
use sketchmark::data::word_tokens;

#[test]
fn test_skewed_first_hundred_items_are_unique() {
    let rec = skewed(100);
    assert_eq!(rec.len(), 100);
    assert_eq!(rec.width(), 4);
    let keys = rec.to_u32_keys();
    assert_eq!(keys, (1..=100).collect::<Vec<u32>>());
}

#[test]
fn test_skewed_repeats_follow_the_rule() {
    let rec = skewed(5_000);
    let mut counts: HashMap<u32, u32> = HashMap::new();
    let keys = rec.to_u32_keys();
    for &k in &keys {
        *counts.entry(k).or_insert(0) += 1;
    }
    let max_key = *keys.last().unwrap();
    // Every fully emitted key appears exactly ceil(key / 100) times.
    for (&key, &count) in counts.iter() {
        if key == max_key {
            assert!(count <= skew_repeats(key));
        } else {
            assert_eq!(count, skew_repeats(key), "key {key}");
        }
    }
}

#[test]
fn test_stream_emits_advertised_count_and_width() {
    let rec = skewed(1_234);
    let mut n = 0usize;
    let mut stream = rec.stream();
    while let Some(record) = stream.next() {
        assert_eq!(record.len(), 4);
        n += 1;
    }
    assert_eq!(n, 1_234);
    assert!(stream.next().is_none());
}

#[test]
fn test_provider_determinism() {
    assert!(skewed(10_000) == skewed(10_000));
    assert!(mixed_skew(10_001) == mixed_skew(10_001));
    assert!(paired_skew(9_999) == paired_skew(9_999));
}

#[test]
fn test_mixed_skew_shapes() {
    let rec = mixed_skew(1_000);
    let keys = rec.to_u32_keys();
    // Unique half 1..=500, then the skew restarts at 1.
    assert_eq!(&keys[..500], (1..=500).collect::<Vec<u32>>().as_slice());
    assert_eq!(keys[500], 1);
    let unique_half: HashSet<u32> = keys[..500].iter().copied().collect();
    assert_eq!(unique_half.len(), 500);
}

#[test]
fn test_split_partitions_every_occurrence() {
    let base = paired_skew(100);
    let (a, b) = split_fixed(&base, 123_456_789);
    assert_eq!(a.len() + b.len(), 100);

    let mut merged: Vec<u32> = a.to_u32_keys();
    merged.extend(b.to_u32_keys());
    merged.sort_unstable();
    let mut expected = base.to_u32_keys();
    expected.sort_unstable();
    assert_eq!(merged, expected);
}

#[test]
fn test_split_same_seed_same_partition() {
    let base = skewed(2_048);
    let (a1, b1) = split_fixed(&base, 0xC0FFEE);
    let (a2, b2) = split_fixed(&base, 0xC0FFEE);
    assert!(a1 == a2);
    assert!(b1 == b2);
}

#[test]
fn test_binary_sample_fixture() {
    let path = test_data("block_small.rng");
    let rec = sample_binary(&path, 250_000, 1_000).unwrap();
    assert_eq!(rec.len(), 1_000);
    assert_eq!(rec.width(), 4);

    // Pool holds the 64 fixture keys; every sample must be one of them.
    let pool: HashSet<u32> = (0u32..64).map(|i| i.wrapping_mul(2_654_435_761)).collect();
    for key in rec.to_u32_keys() {
        assert!(pool.contains(&key), "sampled key {key:#x} not in pool");
    }

    // Reload equivalence.
    let again = sample_binary(&path, 250_000, 1_000).unwrap();
    assert!(rec == again);
}

#[test]
fn test_binary_sample_missing_file_is_config_error() {
    let err = sample_binary(&test_data("does_not_exist.rng"), 10, 10).unwrap_err();
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_sha1_sample_fixture() {
    let path = test_data("sha1_small.txt");
    let rec = sample_sha1(&path, 250_000, 500).unwrap();
    assert_eq!(rec.len(), 500);
    assert_eq!(rec.width(), 20);

    // 13 valid digests in the fixture (junk lines skipped, trailing
    // whitespace tolerated); sampling must only ever produce those.
    let mut seen: HashSet<Vec<u8>> = HashSet::new();
    for i in 0..rec.len() {
        seen.insert(rec.get(i).to_vec());
    }
    assert!(seen.len() <= 13);
    assert!(seen.len() > 1);

    let again = sample_sha1(&path, 250_000, 500).unwrap();
    assert!(rec == again);
}

#[test]
fn test_sha1_pool_bound_respected() {
    let path = test_data("sha1_small.txt");
    // Restricting the pool to the first 2 valid lines restricts the stream.
    let rec = sample_sha1(&path, 2, 200).unwrap();
    let mut seen: HashSet<Vec<u8>> = HashSet::new();
    for i in 0..rec.len() {
        seen.insert(rec.get(i).to_vec());
    }
    assert!(seen.len() <= 2);
}

#[test]
fn test_word_tokens_fixture() {
    let path = test_data("words_small.txt");
    let rec = word_tokens(&path, 500_000).unwrap();
    assert_eq!(rec.len(), 14);
    assert_eq!(rec.get(0), b"the");
    assert_eq!(rec.get(8), b"dog");
    assert_eq!(rec.get(13), b"again");

    let take4 = word_tokens(&path, 4).unwrap();
    assert_eq!(take4.len(), 4);
    assert_eq!(take4.get(3), b"fox");
}

#[test]
fn test_token_halves_cover_the_stream() {
    let path = test_data("words_small.txt");
    let rec = word_tokens(&path, 500_000).unwrap();
    let (first, second) = split_halves(&rec);
    assert_eq!(first.len() + second.len(), rec.len());
    assert_eq!(first.get(0), rec.get(0));
    assert_eq!(second.get(0), rec.get(first.len()));
}

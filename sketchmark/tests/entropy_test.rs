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

use std::fs;
use std::sync::Arc;
use std::thread;

use common::test_data;
use googletest::assert_that;
use googletest::prelude::contains_substring;
use sketchmark::entropy::EntropyPool;

#[test]
fn test_pool_concatenates_files_in_name_order() {
    let pool = EntropyPool::from_dir(&test_data("seed")).unwrap();
    let mut expected = fs::read(test_data("seed/pool_a.bin")).unwrap();
    expected.extend(fs::read(test_data("seed/pool_b.bin")).unwrap());

    for &byte in expected.iter().take(256) {
        assert_eq!(pool.u8(), byte);
    }
}

#[test]
fn test_u32_is_big_endian_of_four_bytes() {
    let pool = EntropyPool::from_dir(&test_data("seed")).unwrap();
    let raw = fs::read(test_data("seed/pool_a.bin")).unwrap();
    let expected = u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]);
    assert_eq!(pool.u32(), expected);
}

#[test]
fn test_missing_dir_is_fatal_config_error() {
    let err = EntropyPool::from_dir(&test_data("no_such_seed_dir")).unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert_that!(err.to_string(), contains_substring("seed directory"));
}

#[test]
fn test_dir_without_bin_files_is_rejected() {
    let dir = std::env::temp_dir().join("sketchmark_empty_seed");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("notes.txt"), "not entropy").unwrap();
    let err = EntropyPool::from_dir(&dir).unwrap_err();
    fs::remove_dir_all(&dir).ok();
    assert_that!(err.to_string(), contains_substring(".bin"));
}

#[test]
fn test_concurrent_draws_never_overlap() {
    // 4 threads draw u64s concurrently; each draw consumes 8 exclusive
    // bytes, so no value can appear twice until the pool wraps, and the
    // multiset of all draws must equal a serial replay of the same count.
    let pool = Arc::new(EntropyPool::from_dir(&test_data("seed")).unwrap());
    let per_thread = 64usize;

    let mut handles = Vec::new();
    for _ in 0..4 {
        let pool = Arc::clone(&pool);
        handles.push(thread::spawn(move || {
            (0..per_thread).map(|_| pool.u64()).collect::<Vec<u64>>()
        }));
    }
    let mut drawn: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    let replay_pool = EntropyPool::from_dir(&test_data("seed")).unwrap();
    let mut expected: Vec<u64> = (0..4 * per_thread).map(|_| replay_pool.u64()).collect();

    drawn.sort_unstable();
    expected.sort_unstable();
    assert_eq!(drawn, expected);
}

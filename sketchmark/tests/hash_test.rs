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

use common::fixture_pool;
use sketchmark::hash::Hash32;
use sketchmark::hash::HashBytes;
use sketchmark::hash::MultiplyShift;
use sketchmark::hash::MultiplyShiftVec;
use sketchmark::hash::Rapid32;
use sketchmark::hash::SimpleTab32;
use sketchmark::hash::TabOnVec;
use sketchmark::hash::TornadoOnVecD2;
use sketchmark::hash::TornadoTab32D1;
use sketchmark::hash::TornadoTab32D4;

#[test]
fn test_multiply_shift_is_pure() {
    let h = MultiplyShift::new(0xDEAD_BEEF_CAFE_F00D, 42);
    for x in [0u32, 1, 77, u32::MAX] {
        assert_eq!(h.hash(x), h.hash(x));
    }
    // A copy with the same parameters agrees everywhere.
    let h2 = MultiplyShift::new(h.a(), h.b());
    for x in 0..1_000u32 {
        assert_eq!(h.hash(x), h2.hash(x));
    }
}

#[test]
fn test_multiply_shift_odd_enforcement() {
    let h = MultiplyShift::new(0x4000, 9);
    assert_eq!(h.a(), 0x4001);
}

#[test]
fn test_tabulation_instances_are_self_contained() {
    // Identical pool content must yield identical tables, however the
    // instance is moved or cloned afterwards.
    let pool_a = fixture_pool();
    let pool_b = fixture_pool();
    let tab_a = SimpleTab32::from_entropy(&pool_a);
    let tab_b = SimpleTab32::from_entropy(&pool_b);
    for x in [0u32, 1, 0x8000_0000, 0xFFFF_FFFF, 123_456_789] {
        assert_eq!(tab_a.hash(x), tab_b.hash(x));
    }
    let moved = tab_a;
    assert_eq!(moved.hash(7), tab_b.hash(7));
}

#[test]
fn test_tornado_depths_disagree() {
    // Different derived-character depths are genuinely different functions
    // even when parameterised from identical pool content.
    let d1 = TornadoTab32D1::from_entropy(&fixture_pool());
    let d4 = TornadoTab32D4::from_entropy(&fixture_pool());
    let disagreements = (0u32..256).filter(|&x| d1.hash(x) != d4.hash(x)).count();
    assert!(disagreements > 200);
}

#[test]
fn test_composed_family_is_prehash_then_tabulation() {
    // Two pools with identical content: the composed family built from one
    // must equal tabulating the prehash output of the family built from
    // the other, byte for byte.
    let coeffs = [3u64, 5, 7, 9, 11, 13, 15, 17];
    let composed = TabOnVec::new(coeffs, &fixture_pool());
    let prehash = MultiplyShiftVec::new(coeffs, true);
    let tab = SimpleTab32::from_entropy(&fixture_pool());

    for key in [&b"x"[..], &b"variable length key"[..], &[0u8; 20][..]] {
        assert_eq!(composed.hash_bytes(key), tab.hash(prehash.hash_bytes(key)));
    }
}

#[test]
fn test_composed_tornado_matches_manual_composition() {
    let coeffs = [3u64, 5, 7, 9, 11, 13, 15, 17];
    let composed = TornadoOnVecD2::new(coeffs, &fixture_pool());
    let prehash = MultiplyShiftVec::new(coeffs, true);
    let tornado = sketchmark::hash::TornadoTab32::<2>::from_entropy(&fixture_pool());

    for key in [&b"abc"[..], &b"another token"[..]] {
        assert_eq!(
            composed.hash_bytes(key),
            tornado.hash(prehash.hash_bytes(key))
        );
    }
}

#[test]
fn test_msvec_lane_split_matches_fixed_hash_width() {
    let pool = fixture_pool();
    let msvec = MultiplyShiftVec::from_entropy(&pool);
    // A 4-byte buffer is one little-endian lane.
    let x: u32 = 0x1122_3344;
    let via_bytes = msvec.hash_bytes(&x.to_le_bytes());
    let c0 = msvec.coeffs()[0];
    let expected = ((u64::from(x).wrapping_mul(c0)) >> 32) as u32;
    assert_eq!(via_bytes, expected);
}

#[test]
fn test_rapid_determinism_across_instances() {
    let a = Rapid32::new(0x1234);
    let b = Rapid32::new(0x1234);
    for data in [&b"x"[..], &b"hello world"[..], &[0u8; 40][..]] {
        assert_eq!(a.hash_bytes(data), b.hash_bytes(data));
        assert_eq!(a.hash64(data), b.hash64(data));
    }
}

#[test]
fn test_entropy_parameterised_families_diverge_between_draws() {
    // Two consecutive draws from the same pool consume different bytes, so
    // the instances should be distinct functions.
    let pool = fixture_pool();
    let first = MultiplyShift::from_entropy(&pool);
    let second = MultiplyShift::from_entropy(&pool);
    assert!(first.a() != second.a() || first.b() != second.b());
}

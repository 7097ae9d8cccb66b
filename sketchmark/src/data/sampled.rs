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

//! File-backed pools sampled with replacement.
//!
//! Both providers read a bounded pool of keys from an external file and then
//! materialise a longer stream of uniform picks from it, using a
//! Mersenne-Twister seeded with a fixed constant so every run samples the
//! same stream.

use std::fs;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use byteorder::ByteOrder;
use byteorder::LittleEndian;
use rand_mt::Mt19937GenRand64;

use crate::data::FixedRecords;
use crate::error::Error;

/// Pool size of the binary-integer provider: first 250k items of the file.
pub const BINARY_POOL_ITEMS: usize = 250_000;
/// Stream length of the binary-integer provider.
pub const BINARY_STREAM_ITEMS: usize = 500_000;
/// Fixed sampling seed of the binary-integer provider.
pub const BINARY_SAMPLE_SEED: u64 = 0xA2A2_A2A2_DEAD_BEEF;

/// Pool size of the SHA-1 provider: first 250k valid lines.
pub const SHA1_POOL_ITEMS: usize = 250_000;
/// Stream length of the SHA-1 provider.
pub const SHA1_STREAM_ITEMS: usize = 500_000;
/// Fixed sampling seed of the SHA-1 provider.
pub const SHA1_SAMPLE_SEED: u64 = 0x0000_A55A_5A55_BEEF;

/// Uniform index into `[0, n)` from one Mersenne-Twister draw, via the
/// 128-bit multiply reduction.
#[inline]
fn pick(mt: &mut Mt19937GenRand64, n: usize) -> usize {
    ((u128::from(mt.next_u64()) * n as u128) >> 64) as usize
}

fn sample_pool(pool: &FixedRecords, stream_items: usize, seed: u64) -> FixedRecords {
    let mut mt = Mt19937GenRand64::new(seed);
    let mut stream = FixedRecords::with_capacity(pool.width(), stream_items);
    for _ in 0..stream_items {
        stream.push(pool.get(pick(&mut mt, pool.len())));
    }
    stream
}

/// Reads the first `pool_items` raw little-endian u32 keys of `path` (fewer
/// is permitted, at least one is required) and samples `stream_items` picks
/// with replacement.
pub fn sample_binary(
    path: &Path,
    pool_items: usize,
    stream_items: usize,
) -> Result<FixedRecords, Error> {
    let raw = fs::read(path).map_err(|e| {
        Error::config("cannot open binary key file")
            .with_context("path", path.display())
            .set_source(e)
    })?;
    let available = raw.len() / 4;
    if available == 0 {
        return Err(Error::format("binary key file holds fewer than 4 bytes")
            .with_context("path", path.display()));
    }

    let take = available.min(pool_items);
    let mut pool = FixedRecords::with_capacity(4, take);
    for chunk in raw.chunks_exact(4).take(take) {
        let key = LittleEndian::read_u32(chunk);
        pool.push(&key.to_le_bytes());
    }

    Ok(sample_pool(&pool, stream_items, BINARY_SAMPLE_SEED))
}

/// Reads the first `pool_items` valid 40-hex SHA-1 lines of `path`
/// (surrounding whitespace tolerated, non-conforming lines skipped) and
/// samples `stream_items` 20-byte records with replacement.
pub fn sample_sha1(
    path: &Path,
    pool_items: usize,
    stream_items: usize,
) -> Result<FixedRecords, Error> {
    let file = File::open(path).map_err(|e| {
        Error::config("cannot open SHA-1 file")
            .with_context("path", path.display())
            .set_source(e)
    })?;

    let mut pool = FixedRecords::with_capacity(20, pool_items);
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| {
            Error::format("cannot read SHA-1 file")
                .with_context("path", path.display())
                .set_source(e)
        })?;
        let trimmed = line.trim();
        if trimmed.len() < 40 {
            continue;
        }
        if let Some(digest) = decode_hex40(&trimmed[..40]) {
            pool.push(&digest);
            if pool.len() == pool_items {
                break;
            }
        }
    }
    if pool.is_empty() {
        return Err(Error::format("no valid SHA-1 lines found")
            .with_context("path", path.display()));
    }

    Ok(sample_pool(&pool, stream_items, SHA1_SAMPLE_SEED))
}

/// Decodes exactly 40 hex characters into 20 bytes.
fn decode_hex40(hex: &str) -> Option<[u8; 20]> {
    let bytes = hex.as_bytes();
    if bytes.len() != 40 {
        return None;
    }
    let mut out = [0u8; 20];
    for (i, pair) in bytes.chunks_exact(2).enumerate() {
        let hi = (pair[0] as char).to_digit(16)?;
        let lo = (pair[1] as char).to_digit(16)?;
        out[i] = ((hi << 4) | lo) as u8;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex40() {
        let digest = decode_hex40("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();
        assert_eq!(digest[0], 0xDA);
        assert_eq!(digest[19], 0x09);
        assert!(decode_hex40("zz39a3ee5e6b4b0d3255bfef95601890afd80709").is_none());
    }

    #[test]
    fn test_pick_stays_in_range() {
        let mut mt = Mt19937GenRand64::new(1);
        for _ in 0..1000 {
            assert!(pick(&mut mt, 7) < 7);
        }
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let mut pool = FixedRecords::with_capacity(4, 8);
        for i in 0u32..8 {
            pool.push(&i.to_le_bytes());
        }
        let a = sample_pool(&pool, 64, 99);
        let b = sample_pool(&pool, 64, 99);
        assert!(a == b);
        assert_eq!(a.len(), 64);
        // All sampled records come from the pool.
        assert!(a.to_u32_keys().iter().all(|&k| k < 8));
    }
}

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

//! Deterministic entropy pool backed by on-disk binary files.
//!
//! All hash-family parameters in the harness are drawn from one shared pool
//! so that a whole experiment is reproducible bit-for-bit: the pool is the
//! concatenation of every `*.bin` file in the seed directory (sorted by file
//! name), consumed byte-by-byte under a mutex, wrapping around at the end.
//!
//! # Usage
//!
//! ```rust
//! use sketchmark::entropy::EntropyPool;
//!
//! let pool = EntropyPool::from_bytes(vec![0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
//! assert_eq!(pool.u32(), 0xDEADBEEF);
//! ```

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::OnceLock;

use crate::error::Error;

/// Environment variable overriding the built-in seed directory.
pub const SEED_DIR_ENV: &str = "SKETCHMARK_SEED_DIR";

/// Built-in seed directory, relative to the working directory.
pub const DEFAULT_SEED_DIR: &str = "./seed";

#[derive(Debug)]
struct PoolState {
    bytes: Vec<u8>,
    pos: usize,
    bit_bucket: u8,
    bits_left: u8,
}

impl PoolState {
    fn u8(&mut self) -> u8 {
        let v = self.bytes[self.pos];
        self.pos += 1;
        if self.pos >= self.bytes.len() {
            self.pos = 0;
        }
        v
    }

    fn boolean(&mut self) -> bool {
        if self.bits_left == 0 {
            self.bit_bucket = self.u8();
            self.bits_left = 8;
        }
        let b = (self.bit_bucket & 0x01) != 0;
        self.bit_bucket >>= 1;
        self.bits_left -= 1;
        b
    }

    fn u32(&mut self) -> u32 {
        let mut a = 0u32;
        for _ in 0..4 {
            a = (a << 8) | u32::from(self.u8());
        }
        a
    }

    fn u64(&mut self) -> u64 {
        let mut a = 0u64;
        for _ in 0..8 {
            a = (a << 8) | u64::from(self.u8());
        }
        a
    }
}

/// Shared deterministic byte source.
///
/// Every draw is serialised through an internal mutex, so two consumers never
/// observe overlapping bytes. For batches that must stay contiguous (e.g.
/// populating a tabulation table) take a [`session`](EntropyPool::session)
/// and draw through the guard.
#[derive(Debug)]
pub struct EntropyPool {
    state: Mutex<PoolState>,
}

impl EntropyPool {
    /// Builds a pool from the concatenated `*.bin` files of `dir`, sorted by
    /// file name. A missing directory or zero total bytes is a configuration
    /// error.
    pub fn from_dir(dir: &Path) -> Result<Self, Error> {
        if !dir.is_dir() {
            return Err(Error::config("seed directory not found")
                .with_context("dir", dir.display()));
        }
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| {
                Error::config("cannot list seed directory")
                    .with_context("dir", dir.display())
                    .set_source(e)
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "bin"))
            .collect();
        files.sort();
        if files.is_empty() {
            return Err(Error::config("no .bin files in seed directory")
                .with_context("dir", dir.display()));
        }

        let mut bytes = Vec::new();
        for path in &files {
            let mut chunk = fs::read(path).map_err(|e| {
                Error::config("cannot read seed file")
                    .with_context("path", path.display())
                    .set_source(e)
            })?;
            bytes.append(&mut chunk);
        }
        Self::from_bytes(bytes)
    }

    /// Builds a pool directly from a byte buffer. Empty input is a
    /// configuration error.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Error> {
        if bytes.is_empty() {
            return Err(Error::config("entropy pool has zero bytes"));
        }
        Ok(Self {
            state: Mutex::new(PoolState {
                bytes,
                pos: 0,
                bit_bucket: 0,
                bits_left: 0,
            }),
        })
    }

    /// Returns the process-wide pool, initialising it on first use from
    /// [`SEED_DIR_ENV`] or [`DEFAULT_SEED_DIR`].
    pub fn global() -> Result<&'static EntropyPool, Error> {
        static POOL: OnceLock<EntropyPool> = OnceLock::new();
        if let Some(pool) = POOL.get() {
            return Ok(pool);
        }
        let dir = env::var(SEED_DIR_ENV).unwrap_or_else(|_| DEFAULT_SEED_DIR.to_string());
        let pool = EntropyPool::from_dir(Path::new(&dir))?;
        // A concurrent first use may have won the race; both pools were built
        // from the same files, so either instance is equivalent.
        Ok(POOL.get_or_init(|| pool))
    }

    /// Draws one byte.
    pub fn u8(&self) -> u8 {
        self.lock().u8()
    }

    /// Draws one boolean from the bit bucket, LSB first. The bucket refills
    /// from the next pool byte when exhausted.
    pub fn boolean(&self) -> bool {
        self.lock().boolean()
    }

    /// Draws four fresh bytes and assembles them big-endian.
    pub fn u32(&self) -> u32 {
        self.lock().u32()
    }

    /// Draws eight fresh bytes and assembles them big-endian.
    pub fn u64(&self) -> u64 {
        self.lock().u64()
    }

    /// Acquires the pool for a contiguous batch of draws.
    pub fn session(&self) -> EntropySession<'_> {
        EntropySession { state: self.lock() }
    }

    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().expect("entropy pool mutex poisoned")
    }
}

/// Exclusive batch access to the pool; draws through the session are
/// guaranteed to be consecutive pool bytes.
pub struct EntropySession<'a> {
    state: MutexGuard<'a, PoolState>,
}

impl EntropySession<'_> {
    pub fn u8(&mut self) -> u8 {
        self.state.u8()
    }

    pub fn boolean(&mut self) -> bool {
        self.state.boolean()
    }

    pub fn u32(&mut self) -> u32 {
        self.state.u32()
    }

    pub fn u64(&mut self) -> u64 {
        self.state.u64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_assembly() {
        let pool = EntropyPool::from_bytes(vec![0x01, 0x02, 0x03, 0x04, 0xAA, 0xBB]).unwrap();
        assert_eq!(pool.u32(), 0x01020304);
        assert_eq!(pool.u8(), 0xAA);
        assert_eq!(pool.u8(), 0xBB);
    }

    #[test]
    fn test_wraparound() {
        let pool = EntropyPool::from_bytes(vec![0x11, 0x22]).unwrap();
        assert_eq!(pool.u8(), 0x11);
        assert_eq!(pool.u8(), 0x22);
        assert_eq!(pool.u8(), 0x11);
    }

    #[test]
    fn test_u64_equals_eight_bytes() {
        let bytes: Vec<u8> = (1..=8).collect();
        let pool = EntropyPool::from_bytes(bytes).unwrap();
        assert_eq!(pool.u64(), 0x0102030405060708);
    }

    #[test]
    fn test_boolean_lsb_first() {
        // 0b1011_0101: booleans come out 1,0,1,0,1,1,0,1.
        let pool = EntropyPool::from_bytes(vec![0b1011_0101, 0xFF]).unwrap();
        let bits: Vec<bool> = (0..8).map(|_| pool.boolean()).collect();
        assert_eq!(
            bits,
            vec![true, false, true, false, true, true, false, true]
        );
        // Bucket exhausted: the next boolean consumes the second byte.
        assert!(pool.boolean());
        // Both bytes consumed, so the cursor has wrapped to the start.
        assert_eq!(pool.u8(), 0b1011_0101);
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert!(EntropyPool::from_bytes(Vec::new()).is_err());
    }

    #[test]
    fn test_session_draws_are_contiguous() {
        let bytes: Vec<u8> = (0..=15).collect();
        let pool = EntropyPool::from_bytes(bytes).unwrap();
        let mut session = pool.session();
        assert_eq!(session.u32(), 0x00010203);
        assert_eq!(session.u32(), 0x04050607);
        drop(session);
        assert_eq!(pool.u8(), 0x08);
    }
}

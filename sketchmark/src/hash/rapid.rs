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

use crate::entropy::EntropyPool;
use crate::hash::Hash32;
use crate::hash::HashBytes;

/// Seeded wrapper over the published rapidhash construction.
///
/// The cryptographic-strength reference point of the family matrix: the
/// `rapidhash` crate carries the published secret constants, so the digest
/// is byte-exact to the reference for any seed. The 32-bit variant keeps the
/// high half of the 64-bit digest.
#[derive(Debug, Clone, Copy)]
pub struct Rapid32 {
    seed: u64,
}

impl Rapid32 {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_entropy(pool: &EntropyPool) -> Self {
        Self::new(pool.u64())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Full 64-bit digest.
    #[inline]
    pub fn hash64(&self, data: &[u8]) -> u64 {
        rapidhash::rapidhash_seeded(data, self.seed)
    }
}

impl HashBytes for Rapid32 {
    #[inline]
    fn hash_bytes(&self, data: &[u8]) -> u32 {
        (self.hash64(data) >> 32) as u32
    }
}

impl Hash32 for Rapid32 {
    #[inline]
    fn hash(&self, x: u32) -> u32 {
        self.hash_bytes(&x.to_le_bytes())
    }
}

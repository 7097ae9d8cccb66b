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

//! Probabilistic streaming sketches.
//!
//! Three estimators, each fed 32-bit hash values produced by one of the
//! [hash families](crate::hash):
//!
//! - [`BottomK`] / [`MultiBottomK`]: distinct-count estimation from the
//!   k smallest hashes.
//! - [`CountMin`]: one-sided point-frequency estimation.
//! - [`Oph`]: one-permutation min-hash bins with a [`jaccard`] comparison.

mod bottomk;
mod countmin;
mod oph;

pub use self::bottomk::BottomK;
pub use self::bottomk::MultiBottomK;
pub use self::countmin::CountMin;
pub use self::oph::jaccard;
pub use self::oph::Oph;
pub use self::oph::EMPTY_BIN;

/// Lemire's fast unbiased reduction of a 32-bit hash into `[0, n)`.
#[inline]
pub(crate) fn fast_range32(x: u32, n: u32) -> u32 {
    ((u64::from(x) * u64::from(n)) >> 32) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_range_bounds() {
        for n in [1u32, 2, 7, 16, 200, 32_768] {
            assert_eq!(fast_range32(0, n), 0);
            assert!(fast_range32(u32::MAX, n) < n);
            assert_eq!(fast_range32(0x8000_0000, n), n / 2);
        }
    }
}

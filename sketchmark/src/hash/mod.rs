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

//! Hash families measured by the harness.
//!
//! Every family follows the same two-step contract: parameterise first
//! (explicit values or draws from the [entropy pool](crate::entropy)), then
//! hash. Hashing is pure and deterministic; an instance carries all of its
//! tables and scalars, and identical parameters give identical outputs on
//! every platform.
//!
//! Fixed 32-bit keys go through [`Hash32`]; variable-length byte keys go
//! through [`HashBytes`]. The tabulation families only accept 32-bit keys,
//! so [`TabOnVec`] and [`TornadoOnVec`] compose them behind a
//! [`MultiplyShiftVec`] prehash.

mod multiply_shift;
mod poly;
mod rapid;
mod tabulation;
mod tornado;

pub use self::multiply_shift::draw_coeffs;
pub use self::multiply_shift::Affine32;
pub use self::multiply_shift::MultiplyShift;
pub use self::multiply_shift::MultiplyShiftVec;
pub use self::multiply_shift::LANE_COEFFS;
pub use self::poly::PolyMersenne;
pub use self::poly::DEFAULT_POLY_DEGREE;
pub use self::rapid::Rapid32;
pub use self::tabulation::SimpleTab32;
pub use self::tabulation::TabOnVec;
pub use self::tornado::TornadoOnVec;
pub use self::tornado::TornadoOnVecD1;
pub use self::tornado::TornadoOnVecD2;
pub use self::tornado::TornadoOnVecD3;
pub use self::tornado::TornadoOnVecD4;
pub use self::tornado::TornadoTab32;
pub use self::tornado::TornadoTab32D1;
pub use self::tornado::TornadoTab32D2;
pub use self::tornado::TornadoTab32D3;
pub use self::tornado::TornadoTab32D4;

/// A parameterised hash over fixed 32-bit keys.
pub trait Hash32 {
    fn hash(&self, x: u32) -> u32;
}

/// A parameterised hash over arbitrary byte strings.
pub trait HashBytes {
    fn hash_bytes(&self, data: &[u8]) -> u32;
}

/// Identity "hash"; the fallback row function of an unconfigured Count-Min
/// row and a handy building block in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity32;

impl Hash32 for Identity32 {
    #[inline]
    fn hash(&self, x: u32) -> u32 {
        x
    }
}

#[inline]
pub(crate) fn read_u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes(bytes[..4].try_into().expect("4-byte slice"))
}

#[inline]
pub(crate) fn read_u16_le(bytes: &[u8]) -> u16 {
    u16::from_le_bytes(bytes[..2].try_into().expect("2-byte slice"))
}

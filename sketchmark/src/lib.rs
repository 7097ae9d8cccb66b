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

//! Probabilistic streaming sketches and the hash families they are measured
//! with.
//!
//! The crate has four pillars:
//!
//! - [`entropy`]: a process-wide deterministic byte pool that seeds every
//!   hash-family parameter, so whole experiments reproduce bit-for-bit.
//! - [`data`]: dataset providers that materialise key buffers up front
//!   (skewed integer generators, file-backed sampled pools, text tokens)
//!   plus deterministic partitions for similarity studies.
//! - [`hash`]: the measured families — multiply-shift, multiply-vector-
//!   shift, simple and tornado tabulation, and a rapidhash reference —
//!   behind a uniform parameterise-then-hash contract.
//! - [`sketch`]: Bottom-k distinct counters, a Count-Min frequency sketch,
//!   and one-permutation hashing with a Jaccard estimator.
//!
//! The accuracy and throughput drivers built on top of this crate live in
//! the sibling `evaluation` crate.
//!
//! # Example
//!
//! ```rust
//! use sketchmark::data::skewed;
//! use sketchmark::hash::Hash32;
//! use sketchmark::hash::MultiplyShift;
//! use sketchmark::sketch::BottomK;
//!
//! let records = skewed(10_000);
//! let h = MultiplyShift::new(0x9E37_79B9_7F4A_7C15, 0xA5A5_A5A5_A5A5_A5A5);
//!
//! let mut bk = BottomK::new(64);
//! for key in records.to_u32_keys() {
//!     bk.push(h.hash(key));
//! }
//! assert!(bk.estimate() > 0.0);
//! ```

pub mod data;
pub mod entropy;
pub mod error;
pub mod hash;
pub mod sketch;

pub use error::Error;
pub use error::ErrorKind;

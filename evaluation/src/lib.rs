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

//! Shared machinery of the accuracy and throughput drivers.
//!
//! Each binary under `src/bin` wires a dataset, a sketch, and a hash-family
//! set into the repetition engine ([`driver`]) or the timed-loop protocol
//! ([`speed`]), computes exact ground truths ([`truth`]) once, and streams
//! CSV rows to disk.

pub mod driver;
pub mod runs;
pub mod speed;
pub mod truth;

use std::process;
use std::thread;

use sketchmark::Error;

/// Prints the fatal message and exits with the error's mapped code.
pub fn fatal_exit(err: Error) -> ! {
    eprintln!("FATAL: {err}");
    process::exit(err.exit_code());
}

/// Default worker count: hardware parallelism, falling back to 4 when it
/// cannot be determined.
pub fn default_threads() -> usize {
    thread::available_parallelism().map_or(4, |n| n.get())
}

/// Parses a `--split-seed`-style integer that may be decimal or `0x`-hex.
pub fn parse_u64_flag(s: &str) -> Result<u64, String> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|e| format!("invalid integer {s:?}: {e}"))
}

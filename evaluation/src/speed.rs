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

//! Throughput measurement protocol.
//!
//! Each job takes one untimed warm-up pass, then integrates a monotonic
//! clock over `loops` passes of the key buffer, XOR-folding every hash into
//! a sink kept alive with `black_box`. The whole job list repeats `rounds`
//! times in freshly shuffled order to wash out cache and frequency-scaling
//! ordering effects; per function, both metrics collapse to their medians
//! and the checksums XOR together so no round's work can be elided.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use sketchmark::Error;

/// One timed measurement (or the per-function collapse of several).
#[derive(Clone)]
pub struct SpeedRow {
    pub name: &'static str,
    pub mhash_s: f64,
    pub ns_per_hash: f64,
    pub checksum: u32,
}

/// Runs `body` once untimed, then `loops` times under the clock. The body
/// XORs its hashes into the sink; callers wrap outputs in
/// [`std::hint::black_box`] so the loop cannot be dead-code-eliminated.
pub fn time_loops<F>(loops: usize, mut body: F) -> (f64, u32)
where
    F: FnMut(&mut u32),
{
    let mut sink = 0u32;
    body(&mut sink);
    let start = Instant::now();
    for _ in 0..loops {
        body(&mut sink);
    }
    (start.elapsed().as_secs_f64(), sink)
}

/// Converts a timed run over `total` hash calls into a row.
pub fn speed_row(name: &'static str, total: usize, seconds: f64, sink: u32) -> SpeedRow {
    SpeedRow {
        name,
        mhash_s: (total as f64 / seconds) / 1e6,
        ns_per_hash: (seconds * 1e9) / total as f64,
        checksum: sink,
    }
}

/// A named measurement closure, re-runnable once per round.
pub struct SpeedJob<'a> {
    pub name: &'static str,
    pub run: Box<dyn FnMut() -> SpeedRow + 'a>,
}

/// Executes every job `rounds` times, shuffling the execution order with a
/// freshly seeded PRNG before each round.
pub fn run_shuffled_rounds(jobs: &mut [SpeedJob<'_>], rounds: usize) -> Vec<SpeedRow> {
    let mut rows = Vec::with_capacity(jobs.len() * rounds);
    let mut order: Vec<usize> = (0..jobs.len()).collect();
    for _ in 0..rounds {
        let mut rng = rand::rngs::StdRng::from_entropy();
        order.shuffle(&mut rng);
        for &i in &order {
            rows.push((jobs[i].run)());
        }
    }
    rows
}

/// Collapses the per-round rows to one row per function: median of each
/// metric, XOR of the checksums. Function order follows first appearance.
pub fn collapse_by_median(rows: &[SpeedRow]) -> Vec<SpeedRow> {
    let mut names: Vec<&'static str> = Vec::new();
    for row in rows {
        if !names.contains(&row.name) {
            names.push(row.name);
        }
    }

    names
        .into_iter()
        .map(|name| {
            let group: Vec<&SpeedRow> = rows.iter().filter(|r| r.name == name).collect();
            let mhash = median(group.iter().map(|r| r.mhash_s).collect());
            let ns = median(group.iter().map(|r| r.ns_per_hash).collect());
            let checksum = group.iter().fold(0u32, |acc, r| acc ^ r.checksum);
            SpeedRow {
                name,
                mhash_s: mhash,
                ns_per_hash: ns,
                checksum,
            }
        })
        .collect()
}

fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).expect("finite metric"));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        0.5 * (values[mid - 1] + values[mid])
    }
}

/// Writes the throughput CSV: the fixed columns, then any sketch-specific
/// context columns. Numeric formatting is fixed at 6 decimal places;
/// checksums print as hex.
pub fn write_speed_csv(
    path: &Path,
    rows: &[SpeedRow],
    loops: usize,
    n: usize,
    extra: &[(&str, String)],
) -> Result<(), Error> {
    let mut text = String::from("function,Mhash_s,ns_per_hash,checksum_hex,loops,N");
    for (name, _) in extra {
        text.push(',');
        text.push_str(name);
    }
    text.push('\n');

    for row in rows {
        write!(
            text,
            "{},{:.6},{:.6},0x{:x},{loops},{n}",
            row.name, row.mhash_s, row.ns_per_hash, row.checksum
        )
        .expect("string write");
        for (_, value) in extra {
            text.push(',');
            text.push_str(value);
        }
        text.push('\n');
    }

    fs::write(path, text).map_err(|e| {
        Error::output("cannot write throughput CSV")
            .with_context("path", path.display())
            .set_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(vec![3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(vec![4.0, 1.0, 2.0, 3.0]), 2.5);
    }

    #[test]
    fn test_collapse_xors_checksums() {
        let rows = vec![
            SpeedRow { name: "f", mhash_s: 1.0, ns_per_hash: 10.0, checksum: 0b1100 },
            SpeedRow { name: "f", mhash_s: 3.0, ns_per_hash: 30.0, checksum: 0b1010 },
            SpeedRow { name: "g", mhash_s: 2.0, ns_per_hash: 20.0, checksum: 7 },
        ];
        let collapsed = collapse_by_median(&rows);
        assert_eq!(collapsed.len(), 2);
        assert_eq!(collapsed[0].name, "f");
        assert_eq!(collapsed[0].mhash_s, 2.0);
        assert_eq!(collapsed[0].checksum, 0b0110);
        assert_eq!(collapsed[1].name, "g");
    }

    #[test]
    fn test_time_loops_runs_warmup_plus_loops() {
        let mut calls = 0usize;
        let (_, sink) = time_loops(5, |sink| {
            calls += 1;
            *sink ^= 1;
        });
        assert_eq!(calls, 6);
        // Warm-up plus five timed passes flip the sink six times.
        assert_eq!(sink, 0);
    }
}

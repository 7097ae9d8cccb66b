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

//! Count-Min accuracy on the sampled binary-integer stream (A2).
//!
//! Each repetition draws fresh per-row affine column hashers shared by all
//! families, so rows differ only in the family hash that collapses the item
//! to the sketched 32-bit value. `relerr` is the mean over distinct keys of
//! `(estimate - truecount) / truecount`.

use std::path::PathBuf;

use clap::Parser;

use evaluation::default_threads;
use evaluation::driver::run_accuracy;
use evaluation::driver::RunConfig;
use evaluation::fatal_exit;
use evaluation::runs::countmin_mean_relerr_u32;
use evaluation::truth;
use sketchmark::data::data_path;
use sketchmark::data::sample_binary;
use sketchmark::data::BINARY_POOL_ITEMS;
use sketchmark::data::BINARY_STREAM_ITEMS;
use sketchmark::data::DEFAULT_BINARY_FILE;
use sketchmark::entropy::EntropyPool;
use sketchmark::hash::Affine32;
use sketchmark::hash::MultiplyShift;
use sketchmark::hash::Rapid32;
use sketchmark::hash::SimpleTab32;
use sketchmark::hash::TornadoTab32D1;
use sketchmark::hash::TornadoTab32D2;
use sketchmark::hash::TornadoTab32D3;
use sketchmark::hash::TornadoTab32D4;
use sketchmark::Error;

#[derive(Parser)]
#[command(about = "Count-Min accuracy on the A2 sampled binary stream")]
struct Args {
    /// Raw little-endian u32 input file.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Counter columns per row.
    #[arg(long, default_value_t = 32_768)]
    width: usize,

    /// Rows (independent column hashers).
    #[arg(long, default_value_t = 3)]
    depth: usize,

    /// Repetitions.
    #[arg(long = "R", default_value_t = 1_000)]
    reps: usize,

    /// Output CSV path.
    #[arg(long, default_value = "cms_a2_relerr.csv")]
    out: PathBuf,

    /// Worker threads (default: hardware concurrency).
    #[arg(long)]
    threads: Option<usize>,
}

struct RepSeeds {
    ms_a: u64,
    ms_b: u64,
    rapid_seed: u64,
    rows: Vec<Affine32>,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        fatal_exit(err);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let threads = args.threads.unwrap_or_else(default_threads);
    let file = args
        .file
        .unwrap_or_else(|| data_path(DEFAULT_BINARY_FILE));
    println!("Count-Min accuracy on A2");
    println!(
        "  file={}  width={}  depth={}  R={}  threads={threads}",
        file.display(),
        args.width,
        args.depth,
        args.reps
    );
    println!("Writing: {}", args.out.display());

    let keys = sample_binary(&file, BINARY_POOL_ITEMS, BINARY_STREAM_ITEMS)?.to_u32_keys();
    let freq = truth::frequencies_u32(&keys);

    let pool = EntropyPool::global()?;
    let params: Vec<RepSeeds> = (0..args.reps)
        .map(|_| RepSeeds {
            ms_a: pool.u64(),
            ms_b: pool.u64(),
            rapid_seed: pool.u64(),
            rows: (0..args.depth).map(|_| Affine32::from_entropy(pool)).collect(),
        })
        .collect();

    let cfg = RunConfig {
        reps: args.reps,
        threads,
        out: args.out.clone(),
    };
    run_accuracy(&cfg, &params, |r, seeds: &RepSeeds, buf| {
        let ms = MultiplyShift::new(seeds.ms_a, seeds.ms_b);
        let rapid = Rapid32::new(seeds.rapid_seed);
        let stab = SimpleTab32::from_entropy(pool);
        let tor1 = TornadoTab32D1::from_entropy(pool);
        let tor2 = TornadoTab32D2::from_entropy(pool);
        let tor3 = TornadoTab32D3::from_entropy(pool);
        let tor4 = TornadoTab32D4::from_entropy(pool);

        let rep = r + 1;
        let width = args.width;
        buf.row(
            "MultShift",
            rep,
            countmin_mean_relerr_u32(&ms, &seeds.rows, width, &keys, &freq),
        );
        buf.row(
            "SimpleTab",
            rep,
            countmin_mean_relerr_u32(&stab, &seeds.rows, width, &keys, &freq),
        );
        buf.row(
            "TornadoD1",
            rep,
            countmin_mean_relerr_u32(&tor1, &seeds.rows, width, &keys, &freq),
        );
        buf.row(
            "TornadoD2",
            rep,
            countmin_mean_relerr_u32(&tor2, &seeds.rows, width, &keys, &freq),
        );
        buf.row(
            "TornadoD3",
            rep,
            countmin_mean_relerr_u32(&tor3, &seeds.rows, width, &keys, &freq),
        );
        buf.row(
            "TornadoD4",
            rep,
            countmin_mean_relerr_u32(&tor4, &seeds.rows, width, &keys, &freq),
        );
        buf.row(
            "RapidHash32",
            rep,
            countmin_mean_relerr_u32(&rapid, &seeds.rows, width, &keys, &freq),
        );
    })?;

    println!("Done.");
    Ok(())
}

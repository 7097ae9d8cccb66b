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

//! Bottom-k accuracy on the sampled SHA-1 stream (R1, 20-byte keys).
//!
//! Variable-length families: the tabulation hashers run behind the shared
//! multiply-vector-shift prehash, re-parameterised every repetition.

use std::path::PathBuf;

use clap::Parser;

use evaluation::default_threads;
use evaluation::driver::run_accuracy;
use evaluation::driver::RunConfig;
use evaluation::fatal_exit;
use evaluation::runs::bottomk_relerr_bytes;
use evaluation::truth;
use sketchmark::data::data_path;
use sketchmark::data::sample_sha1;
use sketchmark::data::DEFAULT_SHA1_FILE;
use sketchmark::data::SHA1_POOL_ITEMS;
use sketchmark::data::SHA1_STREAM_ITEMS;
use sketchmark::entropy::EntropyPool;
use sketchmark::hash::draw_coeffs;
use sketchmark::hash::MultiplyShiftVec;
use sketchmark::hash::Rapid32;
use sketchmark::hash::TabOnVec;
use sketchmark::hash::TornadoOnVecD1;
use sketchmark::hash::TornadoOnVecD2;
use sketchmark::hash::TornadoOnVecD3;
use sketchmark::hash::TornadoOnVecD4;
use sketchmark::hash::LANE_COEFFS;
use sketchmark::Error;

#[derive(Parser)]
#[command(about = "Bottom-k accuracy on the R1 sampled SHA-1 stream")]
struct Args {
    /// SHA-1 input file (one 40-hex digest per line).
    #[arg(long)]
    file: Option<PathBuf>,

    /// Bottom-k size.
    #[arg(long, default_value_t = 24_500)]
    k: usize,

    /// Repetitions.
    #[arg(long = "R", default_value_t = 1_000)]
    reps: usize,

    /// Output CSV path.
    #[arg(long, default_value = "bottomk_r1_relerr.csv")]
    out: PathBuf,

    /// Worker threads (default: hardware concurrency).
    #[arg(long)]
    threads: Option<usize>,
}

struct RepSeeds {
    coeffs: [u64; LANE_COEFFS],
    rapid_seed: u64,
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
        .unwrap_or_else(|| data_path(DEFAULT_SHA1_FILE));
    println!("Bottom-k accuracy on R1 (20-byte SHA-1 keys)");
    println!("  file={}  k={}  R={}  threads={threads}", file.display(), args.k, args.reps);
    println!("Writing: {}", args.out.display());

    let records = sample_sha1(&file, SHA1_POOL_ITEMS, SHA1_STREAM_ITEMS)?;
    let items: Vec<&[u8]> = records.stream().collect();
    let d_true = truth::distinct_bytes(&items) as f64;

    let pool = EntropyPool::global()?;
    let params: Vec<RepSeeds> = (0..args.reps)
        .map(|_| RepSeeds {
            coeffs: draw_coeffs(pool),
            rapid_seed: pool.u64(),
        })
        .collect();

    let cfg = RunConfig {
        reps: args.reps,
        threads,
        out: args.out.clone(),
    };
    run_accuracy(&cfg, &params, |r, seeds: &RepSeeds, buf| {
        let msvec = MultiplyShiftVec::new(seeds.coeffs, true);
        let rapid = Rapid32::new(seeds.rapid_seed);
        let tab = TabOnVec::new(seeds.coeffs, pool);
        let tor1 = TornadoOnVecD1::new(seeds.coeffs, pool);
        let tor2 = TornadoOnVecD2::new(seeds.coeffs, pool);
        let tor3 = TornadoOnVecD3::new(seeds.coeffs, pool);
        let tor4 = TornadoOnVecD4::new(seeds.coeffs, pool);

        let rep = r + 1;
        buf.row("MSVec", rep, bottomk_relerr_bytes(&msvec, &items, args.k, d_true));
        buf.row("TabOnMSVec", rep, bottomk_relerr_bytes(&tab, &items, args.k, d_true));
        buf.row("TornadoOnMSVecD1", rep, bottomk_relerr_bytes(&tor1, &items, args.k, d_true));
        buf.row("TornadoOnMSVecD2", rep, bottomk_relerr_bytes(&tor2, &items, args.k, d_true));
        buf.row("TornadoOnMSVecD3", rep, bottomk_relerr_bytes(&tor3, &items, args.k, d_true));
        buf.row("TornadoOnMSVecD4", rep, bottomk_relerr_bytes(&tor4, &items, args.k, d_true));
        buf.row("RapidHash32", rep, bottomk_relerr_bytes(&rapid, &items, args.k, d_true));
    })?;

    println!("Done.");
    Ok(())
}

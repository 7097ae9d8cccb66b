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

//! Bottom-k accuracy on the skewed integer stream (A1).
//!
//! One CSV row per (family, repetition): `function,rep,relerr` with
//! `relerr = (estimate - D_true) / D_true` against the exact distinct count.

use std::path::PathBuf;

use clap::Parser;

use evaluation::default_threads;
use evaluation::driver::run_accuracy;
use evaluation::driver::RunConfig;
use evaluation::fatal_exit;
use evaluation::parse_u64_flag;
use evaluation::runs::bottomk_relerr_u32;
use evaluation::truth;
use sketchmark::data::mixed_skew;
use sketchmark::data::skewed;
use sketchmark::entropy::EntropyPool;
use sketchmark::hash::MultiplyShift;
use sketchmark::hash::Rapid32;
use sketchmark::hash::SimpleTab32;
use sketchmark::hash::TornadoTab32D1;
use sketchmark::hash::TornadoTab32D2;
use sketchmark::hash::TornadoTab32D3;
use sketchmark::hash::TornadoTab32D4;
use sketchmark::Error;

#[derive(Parser)]
#[command(about = "Bottom-k accuracy on the A1 skewed integer stream")]
struct Args {
    /// Total items in the generated stream.
    #[arg(long, visible_alias = "D", default_value_t = 500_000)]
    items: usize,

    /// Use the mixed variant: a unique first half before the skew tail.
    #[arg(long)]
    mixed: bool,

    /// Bottom-k size.
    #[arg(long, default_value_t = 24_500)]
    k: usize,

    /// Repetitions.
    #[arg(long = "R", default_value_t = 1_000)]
    reps: usize,

    /// Output CSV path.
    #[arg(long, default_value = "bottomk_a1_relerr.csv")]
    out: PathBuf,

    /// Worker threads (default: hardware concurrency).
    #[arg(long)]
    threads: Option<usize>,

    /// Fixed multiply-shift `a` starting seed; repetition r uses `a0 + r`.
    #[arg(long, value_parser = parse_u64_flag)]
    a0: Option<u64>,

    /// Fixed multiply-shift `b` starting seed; repetition r uses `b0 + r`.
    #[arg(long, value_parser = parse_u64_flag)]
    b0: Option<u64>,
}

struct RepSeeds {
    ms_a: u64,
    ms_b: u64,
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
    let variant = if args.mixed { "A1 mixed" } else { "A1" };
    println!("Bottom-k accuracy on {variant}");
    println!(
        "  items={}  k={}  R={}  threads={threads}",
        args.items, args.k, args.reps
    );
    println!("Writing: {}", args.out.display());

    let records = if args.mixed {
        mixed_skew(args.items)
    } else {
        skewed(args.items)
    };
    let keys = records.to_u32_keys();
    let d_true = truth::distinct_u32(&keys) as f64;

    let pool = EntropyPool::global()?;
    let params: Vec<RepSeeds> = (0..args.reps)
        .map(|r| RepSeeds {
            ms_a: args.a0.map_or_else(|| pool.u64(), |a0| a0.wrapping_add(r as u64)),
            ms_b: args.b0.map_or_else(|| pool.u64(), |b0| b0.wrapping_add(r as u64)),
            rapid_seed: pool.u64(),
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
        buf.row("MultShift", rep, bottomk_relerr_u32(&ms, &keys, args.k, d_true));
        buf.row("SimpleTab", rep, bottomk_relerr_u32(&stab, &keys, args.k, d_true));
        buf.row("TornadoD1", rep, bottomk_relerr_u32(&tor1, &keys, args.k, d_true));
        buf.row("TornadoD2", rep, bottomk_relerr_u32(&tor2, &keys, args.k, d_true));
        buf.row("TornadoD3", rep, bottomk_relerr_u32(&tor3, &keys, args.k, d_true));
        buf.row("TornadoD4", rep, bottomk_relerr_u32(&tor4, &keys, args.k, d_true));
        buf.row("RapidHash32", rep, bottomk_relerr_u32(&rapid, &keys, args.k, d_true));
    })?;

    println!("Done.");
    Ok(())
}

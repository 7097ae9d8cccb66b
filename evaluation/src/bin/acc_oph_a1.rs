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

//! OPH Jaccard accuracy on the 50/50 split of the paired-skew stream (A1).
//!
//! The same split — hence the same pair of key groups and the same true
//! Jaccard — is reused by every repetition; only the hash parameters vary.

use std::path::PathBuf;

use clap::Parser;

use evaluation::default_threads;
use evaluation::driver::run_accuracy;
use evaluation::driver::RunConfig;
use evaluation::fatal_exit;
use evaluation::parse_u64_flag;
use evaluation::runs::oph_jaccard_u32;
use evaluation::runs::oph_relerr;
use evaluation::truth;
use sketchmark::data::paired_skew;
use sketchmark::data::split_fixed;
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
#[command(about = "OPH Jaccard accuracy on the split A1 paired-skew stream")]
struct Args {
    /// Total items in the base stream before splitting.
    #[arg(long, visible_alias = "D", default_value_t = 500_000)]
    items: usize,

    /// OPH bin count.
    #[arg(long = "K", default_value_t = 200)]
    bins: u32,

    /// Repetitions.
    #[arg(long = "R", default_value_t = 1_000)]
    reps: usize,

    /// Split seed (decimal or 0x-hex).
    #[arg(long = "split-seed", value_parser = parse_u64_flag, default_value = "0xC0FFEE")]
    split_seed: u64,

    /// Output CSV path.
    #[arg(long, default_value = "oph_a1_relerr.csv")]
    out: PathBuf,

    /// Worker threads (default: hardware concurrency).
    #[arg(long)]
    threads: Option<usize>,
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
    println!("OPH accuracy on the A1 50/50 split");
    println!(
        "  items={}  K={}  R={}  threads={threads}  split-seed=0x{:x}",
        args.items, args.bins, args.reps, args.split_seed
    );
    println!("Writing: {}", args.out.display());

    let base = paired_skew(args.items);
    let (group_a, group_b) = split_fixed(&base, args.split_seed);
    let a_keys = group_a.to_u32_keys();
    let b_keys = group_b.to_u32_keys();
    let j_true = truth::jaccard_u32(&a_keys, &b_keys);

    let pool = EntropyPool::global()?;
    let params: Vec<RepSeeds> = (0..args.reps)
        .map(|_| RepSeeds {
            ms_a: pool.u64(),
            ms_b: pool.u64(),
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
        let m = args.bins;
        let mut emit = |name: &str, j_est: f64| {
            buf.row(name, rep, oph_relerr(j_est, j_true));
        };
        emit("MultShift", oph_jaccard_u32(&ms, &a_keys, &b_keys, m));
        emit("SimpleTab", oph_jaccard_u32(&stab, &a_keys, &b_keys, m));
        emit("TornadoD1", oph_jaccard_u32(&tor1, &a_keys, &b_keys, m));
        emit("TornadoD2", oph_jaccard_u32(&tor2, &a_keys, &b_keys, m));
        emit("TornadoD3", oph_jaccard_u32(&tor3, &a_keys, &b_keys, m));
        emit("TornadoD4", oph_jaccard_u32(&tor4, &a_keys, &b_keys, m));
        emit("RapidHash32", oph_jaccard_u32(&rapid, &a_keys, &b_keys, m));
    })?;

    println!("Done.");
    Ok(())
}
